use serde::{Deserialize, Serialize};

/// The different phases of a game, in the order they happen.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Players are joining, and getting ready.
    InLobby,
    /// Starting hands are dealt, and every player selects their initial tickets.
    Starting,
    Playing,
    /// A player is low on trains: everyone plays one last turn.
    LastTurn,
    Done,
}

impl GamePhase {
    /// Whether players take turns during this phase.
    #[inline]
    pub fn is_taking_turns(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::LastTurn)
    }

    /// Whether the game has left the lobby.
    #[inline]
    pub fn has_started(&self) -> bool {
        !matches!(self, GamePhase::InLobby)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_phase_to_json() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&GamePhase::InLobby)?, r#""in_lobby""#);
        assert_eq!(serde_json::to_string(&GamePhase::Playing)?, r#""playing""#);
        Ok(())
    }

    #[test]
    fn json_to_game_phase() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::from_str::<GamePhase>(r#""last_turn""#)?,
            GamePhase::LastTurn
        );
        assert_eq!(
            serde_json::from_str::<GamePhase>(r#""done""#)?,
            GamePhase::Done
        );

        Ok(())
    }

    #[test]
    fn invalid_json_to_game_phase() {
        assert!(serde_json::from_str::<GamePhase>(r#""not_started""#).is_err());
    }

    #[test]
    fn taking_turns() {
        assert!(!GamePhase::InLobby.is_taking_turns());
        assert!(!GamePhase::Starting.is_taking_turns());
        assert!(GamePhase::Playing.is_taking_turns());
        assert!(GamePhase::LastTurn.is_taking_turns());
        assert!(!GamePhase::Done.is_taking_turns());

        assert!(!GamePhase::InLobby.has_started());
        assert!(GamePhase::Done.has_started());
    }
}
