use crate::card::CardDealer;
use crate::claim::ClaimRequest;
use crate::config::GameConfig;
use crate::error::{DataError, GameError, GameResult};
use crate::game_phase::GamePhase;
use crate::game_state::{GameState, INLINE_PLAYERS};
use crate::map::{RouteGraph, RouteInfo};
use crate::player::{ActionOutcome, ActionResult, Player};
use crate::player_graph::ClaimedRoute;
use crate::scoring::{self, FinalScores, PlayerScore};
use crate::ticket::{OwnedTicket, TicketDealer, TicketOffer};
use crate::train_color::TrainColor;

use smallvec::SmallVec;
use std::collections::HashSet;
use tracing::info;

/// In charge of holding all the state of the game, managing player actions, and transitions
/// amongst players.
///
/// This overall acts as a finite-state machine, whose states are the [`GamePhase`]s.
/// Players are identified by their seat, which is also the order in which they play.
#[derive(Debug)]
pub struct Manager {
    config: GameConfig,
    /// The current phase of the game, which marks nodes (states) in this finite-state machine.
    phase: GamePhase,
    /// Keeps track of the current turn, which is incremented every time
    /// a player finishes their turn.
    ///
    /// This is `None` as long as we are either in [`GamePhase::InLobby`],
    /// or in [`GamePhase::Starting`].
    turn: Option<usize>,
    map: RouteGraph,
    card_dealer: CardDealer,
    ticket_dealer: TicketDealer,
    /// List of all players. A player's id is their index in this list.
    players: SmallVec<[Player; INLINE_PLAYERS]>,
    /// Decided when the game starts, from the number of players.
    parallel_routes_allowed: bool,
    final_scores: Option<FinalScores>,
}

impl Manager {
    /// Creates a new [`Manager`] in the [`GamePhase::InLobby`], for a game on the standard US map.
    pub fn new(config: GameConfig) -> Result<Self, DataError> {
        let map = RouteGraph::us_map()?;
        let ticket_dealer = TicketDealer::us_tickets(&map.cities().cloned().collect(), &config)?;

        Ok(Self::with_board(config, map, ticket_dealer))
    }

    /// Creates a new [`Manager`] in the [`GamePhase::InLobby`], for a game on any board.
    pub fn with_board(config: GameConfig, map: RouteGraph, ticket_dealer: TicketDealer) -> Self {
        Self {
            card_dealer: CardDealer::new(&config),
            config,
            phase: GamePhase::InLobby,
            turn: None,
            map,
            ticket_dealer,
            players: SmallVec::new(),
            parallel_routes_allowed: true,
            final_scores: None,
        }
    }

    /// Returns the game's state, from the perspective of a given player.
    ///
    /// This said perspective is important, because a given player should only be
    /// able to know about the public information of other players, but should know
    /// private information about themselves (e.g. which train cards they have).
    pub fn get_state(&self, player_id: usize) -> GameState {
        GameState {
            phase: self.phase,
            turn: self.turn,
            current_player_id: self.current_player_id(),
            card_dealer_state: if self.phase.has_started() {
                Some(self.card_dealer.get_state())
            } else {
                None
            },
            num_tickets_left: self.ticket_dealer.num_tickets_left_to_deal(),
            players_state: self
                .players
                .iter()
                .map(|player| player.get_player_state(player_id))
                .collect(),
            routes: self.map.routes().collect(),
            final_scores: self.final_scores.as_ref(),
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn turn(&self) -> Option<usize> {
        self.turn
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn map(&self) -> &RouteGraph {
        &self.map
    }

    #[inline]
    pub fn card_dealer(&self) -> &CardDealer {
        &self.card_dealer
    }

    #[inline]
    pub fn ticket_dealer(&self) -> &TicketDealer {
        &self.ticket_dealer
    }

    /// Returns the number of players in the current game.
    #[inline]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, player_id: usize) -> GameResult<&Player> {
        self.players
            .get(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))
    }

    fn player_mut(&mut self, player_id: usize) -> GameResult<&mut Player> {
        self.players
            .get_mut(player_id)
            .ok_or(GameError::PlayerNotFound(player_id))
    }

    /// The player whose turn it is, if turns have started and the game is not over.
    pub fn current_player_id(&self) -> Option<usize> {
        match self.turn {
            Some(turn) if self.phase.is_taking_turns() && !self.players.is_empty() => {
                Some(turn % self.num_players())
            }
            _ => None,
        }
    }

    /// The final results, once the game is [`GamePhase::Done`].
    #[inline]
    pub fn final_scores(&self) -> Option<&FinalScores> {
        self.final_scores.as_ref()
    }

    /// Creates a new [`Player`], and adds it to the list of players for the current game.
    ///
    /// The player is named `name` if it is valid: not blank, not too long, and not already
    /// taken. Otherwise, it gets a default name based on its seat.
    ///
    /// Returns `None` if we are not in [`GamePhase::InLobby`], or if we have reached the maximum
    /// of allowed players.
    ///
    /// Otherwise, returns the ID of the new player.
    pub fn add_player(&mut self, name: &str) -> Option<usize> {
        if self.phase != GamePhase::InLobby || self.num_players() >= self.config.max_players {
            return None;
        }

        let player_id = self.num_players();
        let name = match self.validate_player_name(name) {
            Ok(name) => name,
            Err(_) => self.generate_default_player_name(player_id),
        };

        info!(player = player_id, %name, "Player joined the lobby");
        self.players.push(Player::new(player_id, name, &self.config));

        Some(player_id)
    }

    fn validate_player_name(&self, name: &str) -> GameResult<String> {
        let name = name.trim();

        if name.is_empty() {
            return Err(GameError::ActionNotAllowed(String::from(
                "A player's name cannot be empty.",
            )));
        }

        if name.chars().count() > self.config.max_name_length {
            return Err(GameError::ActionNotAllowed(format!(
                "A player's name cannot be longer than {} characters.",
                self.config.max_name_length
            )));
        }

        if self.players.iter().any(|player| player.name() == name) {
            return Err(GameError::ActionNotAllowed(format!(
                "Cannot change name to already existing `{}`.",
                name
            )));
        }

        Ok(name.to_owned())
    }

    /// Names the player after their seat, padding it with zeros until it is unique.
    fn generate_default_player_name(&self, player_id: usize) -> String {
        let used_player_names: HashSet<&str> =
            self.players.iter().map(|player| player.name()).collect();

        let mut id_length = 1;
        loop {
            let player_name = format!("Player {:01$}", player_id + 1, id_length);
            if !used_player_names.contains(&*player_name) {
                return player_name;
            }
            id_length += 1;
        }
    }

    /// Changes the given player's name.
    ///
    /// Returns an `Err` if either:
    ///   * We are not in [`GamePhase::InLobby`].
    ///   * The player does not exist.
    ///   * The name is blank, too long, or another player already has the same name.
    pub fn change_player_name(&mut self, player_id: usize, new_name: &str) -> GameResult<()> {
        if self.phase != GamePhase::InLobby {
            return Err(GameError::ActionNotAllowed(String::from(
                "Cannot change player's name outside of the lobby phase.",
            )));
        }

        self.player(player_id)?;
        let new_name = self.validate_player_name(new_name)?;
        self.player_mut(player_id)?.change_name(new_name);

        Ok(())
    }

    /// Changes the given player's _ready_ status (to `true` or `false`).
    ///
    /// Returns an `Err` if either:
    ///   * We are not in [`GamePhase::InLobby`].
    ///   * The player does not exist.
    ///   * This would start the game, but there are not enough train cards left to deal every
    ///     starting hand. The player then stays as they were.
    ///
    /// If and only if enough players joined, and all of them are ready, then we start the game,
    /// which entails:
    ///   * Transitioning to [`GamePhase::Starting`].
    ///   * Dealing the starting hand and the initial ticket offer of each player.
    ///   * Selecting nothing on behalf of players who were offered no ticket, since no ticket was
    ///     left. If that is every player, we transition to [`GamePhase::Playing`] right away.
    pub fn set_ready(&mut self, player_id: usize, is_ready: bool) -> GameResult<()> {
        if self.phase != GamePhase::InLobby {
            return Err(GameError::ActionNotAllowed(String::from(
                "Cannot change ready status outside of the lobby phase.",
            )));
        }

        self.player(player_id)?;

        let starts_game = is_ready
            && self.num_players() >= self.config.min_players
            && self
                .players
                .iter()
                .filter(|player| player.id() != player_id)
                .all(Player::ready);
        if starts_game {
            self.check_enough_train_cards()?;
        }

        self.player_mut(player_id)?.set_ready(is_ready);

        if starts_game {
            self.start_game()?;
        }

        Ok(())
    }

    /// Checks that every player can be dealt their starting hand.
    fn check_enough_train_cards(&self) -> GameResult<()> {
        let num_cards_needed = self.config.size_starting_hand * self.num_players();
        if self.card_dealer.deck_size() + self.card_dealer.discarded_size() < num_cards_needed {
            return Err(GameError::DeckExhausted);
        }

        Ok(())
    }

    fn start_game(&mut self) -> GameResult<()> {
        self.phase = GamePhase::Starting;
        self.parallel_routes_allowed = self.config.parallel_routes_allowed(self.num_players());

        for player in self.players.iter_mut() {
            player.initialize_when_game_starts(
                &mut self.card_dealer,
                &mut self.ticket_dealer,
                &self.config,
            )?;

            if player.pending_tickets().is_empty() {
                player.select_tickets(&[], None, &mut self.ticket_dealer, &self.config)?;
            }
        }

        info!(
            num_players = self.num_players(),
            parallel_routes_allowed = self.parallel_routes_allowed,
            "Game started"
        );

        self.start_turns_if_tickets_selected();
        Ok(())
    }

    /// Transitions to [`GamePhase::Playing`] once every player has selected their initial tickets.
    fn start_turns_if_tickets_selected(&mut self) {
        if self.phase == GamePhase::Starting
            && self
                .players
                .iter()
                .all(Player::has_selected_initial_tickets)
        {
            self.phase = GamePhase::Playing;
            self.turn = Some(0);
            info!("All initial tickets selected, turns begin");
        }
    }

    /// Whether the game is past the lobby, and not over.
    #[inline]
    fn game_started(&self) -> bool {
        self.phase == GamePhase::Starting || self.turn_based_game_started()
    }

    #[inline]
    fn turn_based_game_started(&self) -> bool {
        self.phase.is_taking_turns()
    }

    /// Checks that the player exists, and that it is their turn.
    ///
    /// Returns the current turn.
    fn check_turn(&self, player_id: usize) -> GameResult<usize> {
        let turn = match self.turn {
            Some(turn) if self.turn_based_game_started() => turn,
            _ => {
                return Err(GameError::ActionNotAllowed(String::from(
                    "Cannot take a turn if the game is not started, or if it is ended.",
                )))
            }
        };

        self.player(player_id)?;
        if self.current_player_id() != Some(player_id) {
            return Err(GameError::NotPlayerTurn { player_id });
        }

        Ok(turn)
    }

    /// Allows a given player to select from their pending tickets, which they will try to fulfill.
    ///
    /// `selection` holds indices into the tickets offered.
    ///
    /// Returns an `Err` if either:
    ///   * We are not in [`GamePhase::Starting`], [`GamePhase::Playing`], nor [`GamePhase::LastTurn`].
    ///   * This is the turn-based game, and it is not the player's turn.
    ///   * [`Player::select_tickets`] failed.
    ///
    /// If this selection happens during [`GamePhase::Starting`], we check whether all players have
    /// selected their tickets. If that is the case, then we:
    ///   * Transition to [`GamePhase::Playing`].
    ///   * Set the turn to 0.
    ///
    /// A player who was offered no ticket at all selects nothing, which is done for them when the
    /// game starts.
    pub fn select_tickets(
        &mut self,
        player_id: usize,
        selection: &[usize],
    ) -> ActionResult<Vec<OwnedTicket>> {
        if !self.game_started() {
            return Err(GameError::ActionNotAllowed(String::from(
                "Cannot select tickets if the game is not started, or if it is ended.",
            )));
        }

        if self.phase == GamePhase::Starting {
            let player = self
                .players
                .get_mut(player_id)
                .ok_or(GameError::PlayerNotFound(player_id))?;
            let outcome =
                player.select_tickets(selection, None, &mut self.ticket_dealer, &self.config)?;

            self.start_turns_if_tickets_selected();
            return Ok(outcome);
        }

        let turn = self.check_turn(player_id)?;
        let outcome = self.players[player_id].select_tickets(
            selection,
            Some(turn),
            &mut self.ticket_dealer,
            &self.config,
        )?;

        Ok(self.after_action(outcome))
    }

    /// The current player draws a face-up train card. See [`Player::draw_open_train_card`].
    pub fn draw_open_train_card(
        &mut self,
        player_id: usize,
        card: TrainColor,
    ) -> ActionResult<TrainColor> {
        let turn = self.check_turn(player_id)?;
        let outcome =
            self.players[player_id].draw_open_train_card(card, turn, &mut self.card_dealer)?;

        Ok(self.after_action(outcome))
    }

    /// The current player draws the top train card of the deck. See [`Player::draw_close_train_card`].
    pub fn draw_close_train_card(&mut self, player_id: usize) -> ActionResult<TrainColor> {
        let turn = self.check_turn(player_id)?;
        let outcome = self.players[player_id].draw_close_train_card(turn, &mut self.card_dealer)?;

        Ok(self.after_action(outcome))
    }

    /// The current player claims a route. See [`Player::claim_route`].
    pub fn claim_route(
        &mut self,
        player_id: usize,
        request: &ClaimRequest,
    ) -> ActionResult<ClaimedRoute> {
        let turn = self.check_turn(player_id)?;
        let outcome = self.players[player_id].claim_route(
            request,
            turn,
            &mut self.map,
            &mut self.card_dealer,
            &self.config,
            self.parallel_routes_allowed,
        )?;

        Ok(self.after_action(outcome))
    }

    /// The current player draws tickets. See [`Player::draw_tickets`].
    pub fn draw_tickets(&mut self, player_id: usize) -> ActionResult<TicketOffer> {
        let turn = self.check_turn(player_id)?;
        let outcome = self.players[player_id].draw_tickets(turn, &mut self.ticket_dealer)?;

        Ok(self.after_action(outcome))
    }

    /// Routes the given player could claim with their current hand and trains.
    pub fn legal_routes(&self, player_id: usize) -> GameResult<Vec<RouteInfo>> {
        Ok(self.player(player_id)?.claimable_routes(&self.map))
    }

    fn after_action<T>(&mut self, outcome: ActionOutcome<T>) -> ActionOutcome<T> {
        if outcome.is_turn_over {
            self.end_turn();
        }

        outcome
    }

    /// Moves on to the next player, unless the game is over.
    ///
    /// The final round starts once the player who just played has fewer than
    /// [`GameConfig::ending_train_count`] trains: from then on, every player (including them)
    /// plays exactly one more turn.
    fn end_turn(&mut self) {
        let (turn, player_id) = match (self.turn, self.current_player_id()) {
            (Some(turn), Some(player_id)) => (turn, player_id),
            _ => return,
        };

        match self.phase {
            GamePhase::Playing
                if self.players[player_id].trains() < self.config.ending_train_count =>
            {
                self.phase = GamePhase::LastTurn;
                info!(
                    player = player_id,
                    trains = self.players[player_id].trains(),
                    "Final round started"
                );
            }
            GamePhase::LastTurn => self.players[player_id].set_done_playing(),
            _ => {}
        }

        if self.players.iter().all(Player::is_done_playing) {
            self.finish_game();
        } else {
            self.turn = Some(turn + 1);
        }
    }

    /// Scores every player's tickets, then awards the longest route bonus.
    fn finish_game(&mut self) {
        let mut scores: Vec<PlayerScore> = self
            .players
            .iter_mut()
            .map(|player| {
                let route_points = player.points();
                let tickets = player.score_tickets();
                let ticket_points = tickets.iter().map(|outcome| outcome.points).sum();

                PlayerScore {
                    player_id: player.id(),
                    name: player.name().to_owned(),
                    route_points,
                    tickets,
                    ticket_points,
                    longest_route_weight: 0,
                    longest_route_bonus: 0,
                    total: 0,
                }
            })
            .collect();

        let longest_route = scoring::score_longest_path(
            self.players.iter().map(|player| (player.id(), player.graph())),
            self.config.points_for_longest_route,
        );

        for (player, score) in self.players.iter_mut().zip(scores.iter_mut()) {
            score.longest_route_weight = longest_route
                .weights
                .get(&player.id())
                .copied()
                .unwrap_or_default();
            if longest_route.player_ids.contains(&player.id()) {
                player.add_points(longest_route.bonus);
                score.longest_route_bonus = longest_route.bonus;
            }
            score.total = player.points();
        }

        let final_scores = FinalScores::new(scores, longest_route);
        info!(winners = ?final_scores.winners, "Game over");

        self.final_scores = Some(final_scores);
        self.phase = GamePhase::Done;
    }
}
