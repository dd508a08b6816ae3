use crate::card::CardDealerState;
use crate::game_phase::GamePhase;
use crate::map::RouteInfo;
use crate::player::PlayerState;
use crate::scoring::FinalScores;

use serde::Serialize;
use smallvec::SmallVec;

/// Games rarely have more players than this; more players spill onto the heap.
pub const INLINE_PLAYERS: usize = 5;

/// All the information about a game's current state, returned by
/// [`crate::manager::Manager::get_state`].
///
/// # JSON
/// Serializes to a single object, see [`GameState::to_json`].
#[derive(Debug, Serialize)]
pub struct GameState<'a> {
    /// The phase of the game.
    pub phase: GamePhase,
    /// Initially, this is `None`. This denotes the initial selection of tickets that happens
    /// for all players, before turns have started.
    ///
    /// When turns start, `turn` is set to 0, and increments after each turn.
    pub turn: Option<usize>,
    /// Whose turn it is. `None` outside of [`GamePhase::Playing`] and [`GamePhase::LastTurn`].
    pub current_player_id: Option<usize>,
    /// Public information about the train cards.
    ///
    /// Until the game has started, this is `None`.
    pub card_dealer_state: Option<CardDealerState>,
    /// Tickets that can still be drawn, counting the discarded ones.
    pub num_tickets_left: usize,
    /// Information about all the players in the game, in turn order.
    ///
    /// This only contains public information about them, except for the player who requested
    /// the state, whose private information is included too.
    pub players_state: SmallVec<[PlayerState<'a>; INLINE_PLAYERS]>,
    /// Routes still claimable on the board.
    pub routes: Vec<RouteInfo>,
    /// Only populated once the game is [`GamePhase::Done`].
    pub final_scores: Option<&'a FinalScores>,
}

impl GameState<'_> {
    /// Serializes the snapshot, for the display collaborator.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::player::Player;

    #[test]
    fn game_state_to_json() -> serde_json::Result<()> {
        let config = GameConfig::default();
        let player = Player::new(0, String::from("Ada"), &config);
        let game_state = GameState {
            phase: GamePhase::InLobby,
            turn: None,
            current_player_id: None,
            card_dealer_state: None,
            num_tickets_left: 30,
            players_state: smallvec![player.get_player_state(1)],
            routes: Vec::new(),
            final_scores: None,
        };

        let json: serde_json::Value = serde_json::from_str(&game_state.to_json()?)?;

        assert_eq!(json["phase"], "in_lobby");
        assert_eq!(json["turn"], serde_json::Value::Null);
        assert_eq!(json["num_tickets_left"], 30);
        assert_eq!(json["players_state"][0]["name"], "Ada");
        assert_eq!(json["players_state"][0]["trains"], 45);
        assert_eq!(json["players_state"][0]["private"], serde_json::Value::Null);
        Ok(())
    }

    #[test]
    fn game_state_to_json_with_private_state() -> serde_json::Result<()> {
        let config = GameConfig::default();
        let player = Player::new(0, String::from("Ada"), &config);
        let game_state = GameState {
            phase: GamePhase::Starting,
            turn: None,
            current_player_id: None,
            card_dealer_state: None,
            num_tickets_left: 27,
            players_state: smallvec![player.get_player_state(0)],
            routes: Vec::new(),
            final_scores: None,
        };

        let json: serde_json::Value = serde_json::from_str(&game_state.to_json()?)?;

        assert_eq!(json["players_state"][0]["private"]["hand"]["wild"], 0);
        assert!(json["players_state"][0]["private"]["tickets"]
            .as_array()
            .map_or(false, Vec::is_empty));
        Ok(())
    }
}
