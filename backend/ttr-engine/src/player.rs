use crate::card::{CardDealer, Hand};
use crate::city::CityToCity;
use crate::claim::{self, ClaimRequest};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::map::{RouteGraph, RouteInfo};
use crate::player_graph::{ClaimedRoute, PlayerGraph};
use crate::scoring::{self, TicketOutcome};
use crate::ticket::{OwnedTicket, Ticket, TicketDealer, TicketOffer};
use crate::train_color::{RouteColor, TrainColor};

use serde::Serialize;
use smallvec::SmallVec;
use tracing::{info, warn};

/// What a successful action returns: its result, and whether the player's turn is over.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionOutcome<T> {
    pub result: T,
    pub is_turn_over: bool,
}

impl<T> ActionOutcome<T> {
    fn new(result: T, is_turn_over: bool) -> Self {
        Self {
            result,
            is_turn_over,
        }
    }
}

/// All actions taken by a player have the same `Result`:
/// either it succeeded, which includes whether the player's turn is over,
/// or it failed with a [`GameError`], in which case nothing changed.
pub type ActionResult<T = ()> = GameResult<ActionOutcome<T>>;

/// Represents all the actions that a player can take.
/// Used to keep track of whether an action is allowed, based on other actions taken by the
/// player in a given turn, and to share with other players what happened.
///
/// Only public information is held: a card drawn face down is not revealed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    /// The first and only player action per turn.
    ClaimedRoute {
        route: CityToCity,
        color: RouteColor,
        length: u8,
        points: i32,
    },
    /// The first and only player action per turn.
    DrewOpenWildTrainCard,
    /// The first or second of two player actions per turn.
    DrewOpenNonWildTrainCard { color: TrainColor },
    /// The first or second of two player actions per turn.
    DrewCloseTrainCard,
    /// The first action of two player actions per turn.
    /// Must be followed by [`PlayerAction::SelectedTickets`].
    DrewTickets { num_drawn: usize },
    /// Ends the turn started with [`PlayerAction::DrewTickets`], or the initial selection
    /// which happens before turns have started.
    SelectedTickets { num_selected: usize, num_drawn: usize },
}

impl PlayerAction {
    #[inline]
    fn is_train_card_draw(&self) -> bool {
        matches!(
            self,
            PlayerAction::DrewOpenNonWildTrainCard { .. } | PlayerAction::DrewCloseTrainCard
        )
    }
}

/// Keeps track of actions taken at a given turn.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TurnActions {
    /// Initially, `turn` is None. This denotes the initial selection of tickets that happens for
    /// all players before turns have started.
    pub turn: Option<usize>,
    /// For a given turn, a player can take at most two actions.
    pub actions: SmallVec<[PlayerAction; 2]>,
}

/// All the information about a player's current state, returned by [`Player::get_player_state`].
#[derive(Debug, PartialEq, Serialize)]
pub struct PlayerState<'a> {
    /// Encapsulates information that is visible to all players. Always populated!
    #[serde(flatten)]
    pub public: &'a PublicPlayerState,
    pub claimed_routes: &'a [ClaimedRoute],
    /// Encapsulates information that is *only* visible to the player themselves.
    pub private: Option<&'a PrivatePlayerState>,
}

/// Information about a player's state that is visible to all players.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicPlayerState {
    /// The seat of the player, which is also their position in the turn order.
    pub id: usize,
    /// Unique to each player in the game.
    pub name: String,
    /// Denotes whether the player is ready to leave the lobby and start the game.
    pub is_ready: bool,
    /// Denotes whether the player has played their last turn.
    pub is_done_playing: bool,
    /// The number of trains the player has left to claim routes with.
    pub trains: u8,
    /// Points gained by claiming routes, then at the end of the game by tickets and the longest
    /// route bonus. Failed tickets can bring this below zero.
    pub points: i32,
    /// Actions taken by the player during the last turn they played.
    pub turn_actions: TurnActions,
    /// Derived from [`PrivatePlayerState::hand`].
    pub num_train_cards: usize,
    /// Derived from [`PrivatePlayerState::tickets`].
    pub num_tickets: usize,
}

/// Information about a player's state that is only visible to that player.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PrivatePlayerState {
    pub hand: Hand,
    /// Tickets drawn but not selected yet.
    pub pending_tickets: TicketOffer,
    /// Tickets the player has kept.
    pub tickets: Vec<OwnedTicket>,
}

/// Encapsulates all the player information and actions.
///
/// The [`Player`] assumes, if called to do an action, that this is their turn.
/// It will nonetheless verify that it is allowed to do that action this turn,
/// e.g. it will refuse to claim a route if it has already drawn one train card this turn.
///
/// A [`Player`] is not aware of other players in this game: management of inter-player
/// state (e.g. ensuring unique names, deciding when the game ends) is taken care of by the
/// [`crate::manager::Manager`].
#[derive(Debug)]
pub struct Player {
    public: PublicPlayerState,
    private: PrivatePlayerState,
    graph: PlayerGraph,
}

impl Player {
    /// Creates a new player.
    pub fn new(id: usize, name: String, config: &GameConfig) -> Self {
        Self {
            public: PublicPlayerState {
                id,
                name,
                is_ready: false,
                is_done_playing: false,
                trains: config.starting_num_of_trains,
                points: 0,
                turn_actions: TurnActions::default(),
                num_train_cards: 0,
                num_tickets: 0,
            },
            private: PrivatePlayerState::default(),
            graph: PlayerGraph::new(),
        }
    }

    /// Deals the starting hand and the initial ticket offer.
    ///
    /// The [`crate::manager::Manager`] must call this once the game has started.
    pub fn initialize_when_game_starts(
        &mut self,
        card_dealer: &mut CardDealer,
        ticket_dealer: &mut TicketDealer,
        config: &GameConfig,
    ) -> GameResult<()> {
        for card in card_dealer.deal_cards(config.size_starting_hand)? {
            self.private.hand.add(card);
        }
        self.private.pending_tickets = ticket_dealer.offer_tickets();
        self.update_counts();

        Ok(())
    }

    /// Access the player's id.
    #[inline]
    pub fn id(&self) -> usize {
        self.public.id
    }

    /// Change the player's name.
    /// This should be unique across players of the game.
    #[inline]
    pub fn change_name(&mut self, name: String) {
        self.public.name = name;
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.public.name
    }

    /// Set whether a player is ready to start the game.
    #[inline]
    pub fn set_ready(&mut self, is_ready: bool) {
        self.public.is_ready = is_ready;
    }

    #[inline]
    pub fn ready(&self) -> bool {
        self.public.is_ready
    }

    /// Access how many trains a player has left.
    #[inline]
    pub fn trains(&self) -> u8 {
        self.public.trains
    }

    #[inline]
    pub fn points(&self) -> i32 {
        self.public.points
    }

    #[inline]
    pub fn add_points(&mut self, points: i32) {
        self.public.points += points;
    }

    /// Set that the player has taken their last turn of the game.
    #[inline]
    pub fn set_done_playing(&mut self) {
        self.public.is_done_playing = true;
    }

    #[inline]
    pub fn is_done_playing(&self) -> bool {
        self.public.is_done_playing
    }

    #[inline]
    pub fn hand(&self) -> &Hand {
        &self.private.hand
    }

    #[inline]
    pub fn tickets(&self) -> &[OwnedTicket] {
        &self.private.tickets
    }

    #[inline]
    pub fn pending_tickets(&self) -> &[Ticket] {
        &self.private.pending_tickets
    }

    #[inline]
    pub fn graph(&self) -> &PlayerGraph {
        &self.graph
    }

    /// Mutable accessor to the hand.
    ///
    /// Should only be used for testing!
    pub fn get_mut_hand(&mut self) -> &mut Hand {
        &mut self.private.hand
    }

    /// Overrides how many trains are left.
    ///
    /// Should only be used for testing!
    pub fn set_trains(&mut self, trains: u8) {
        self.public.trains = trains;
    }

    #[inline]
    fn update_counts(&mut self) {
        self.public.num_train_cards = self.private.hand.total();
        self.public.num_tickets = self.private.tickets.len();
    }

    /// Clears the turn's actions, and overrides it with the given action.
    #[inline]
    fn replace_turn_action(&mut self, turn: Option<usize>, action: PlayerAction) {
        self.public.turn_actions.turn = turn;
        self.public.turn_actions.actions.clear();
        self.public.turn_actions.actions.push(action);
    }

    #[inline]
    fn append_turn_action(&mut self, action: PlayerAction) {
        self.public.turn_actions.actions.push(action);
    }

    #[inline]
    fn has_acted_this_turn(&self, turn: usize) -> bool {
        self.public.turn_actions.turn == Some(turn)
    }

    /// Whether drawing a train card now would be the second draw of the turn.
    fn is_second_draw(&self, turn: usize) -> GameResult<bool> {
        if !self.has_acted_this_turn(turn) {
            return Ok(false);
        }

        match self.public.turn_actions.actions.as_slice() {
            [first_draw] if first_draw.is_train_card_draw() => Ok(true),
            [PlayerAction::DrewTickets { .. }] => Err(GameError::ActionNotAllowed(String::from(
                "Cannot draw a train card after having already drawn tickets this turn.",
            ))),
            _ => Err(GameError::ActionNotAllowed(String::from(
                "Cannot draw another train card this turn.",
            ))),
        }
    }

    /// Try to claim a route for the player.
    ///
    /// Returns an `Err`, leaving everything untouched, if either:
    ///   * There was already an action taken this turn.
    ///   * The route or its color option is not on the map.
    ///   * The player already owns a route between these two cities.
    ///   * There are not enough trains left to claim this route.
    ///   * The hand cannot pay for this color option at all, see [`claim::can_claim_color`].
    ///   * The cards played do not pay for the route, see [`claim::resolve_cost`].
    ///
    /// Otherwise, claims the route, and returns it, marking the end of the player's turn.
    /// The cards played are discarded, the color option is removed from the map (along with
    /// the whole route, unless `parallel_routes_allowed`), and points are granted.
    pub fn claim_route(
        &mut self,
        request: &ClaimRequest,
        turn: usize,
        map: &mut RouteGraph,
        card_dealer: &mut CardDealer,
        config: &GameConfig,
        parallel_routes_allowed: bool,
    ) -> ActionResult<ClaimedRoute> {
        if self.has_acted_this_turn(turn) {
            return Err(GameError::ActionNotAllowed(String::from(
                "Cannot claim a route after having drawn a train card or tickets this turn.",
            )));
        }

        let (start, end) = &request.route;
        let route = map.route(start, end)?;
        if !route.colors.contains(&request.route_color) {
            return Err(GameError::ColorNotOnRoute {
                start: start.clone(),
                end: end.clone(),
                color: request.route_color,
            });
        }

        if self.graph.has_route(start, end) {
            return Err(GameError::RouteAlreadyOwned {
                start: start.clone(),
                end: end.clone(),
            });
        }

        let length = route.length;
        if length > self.public.trains {
            return Err(GameError::NotEnoughTrains {
                needed: length,
                available: self.public.trains,
            });
        }

        if !claim::can_claim_color(&self.private.hand, request.route_color, length) {
            return Err(GameError::CannotAffordRoute {
                start: start.clone(),
                end: end.clone(),
            });
        }

        let cost = claim::resolve_cost(
            &self.private.hand,
            request.route_color,
            request.played_color,
            request.num_color_cards,
            request.num_wild_cards,
            length,
        )?;

        // At this point, the claim is valid: nothing below is expected to fail.

        map.remove_color(start, end, request.route_color)?;
        if !parallel_routes_allowed && map.has_route(start, end) {
            map.remove_route(start, end)?;
        }

        card_dealer.discard(cost.pay(&mut self.private.hand)?);

        let points = config.points_for_route(length).unwrap_or_else(|| {
            warn!(length, "No points configured for this route length");
            0
        });
        self.public.points += points;
        self.public.trains -= length;
        self.graph.add_route(start, end, length, request.route_color);
        self.refresh_ticket_completion();
        self.update_counts();

        self.replace_turn_action(
            Some(turn),
            PlayerAction::ClaimedRoute {
                route: request.route.clone(),
                color: request.route_color,
                length,
                points,
            },
        );

        info!(
            player = self.public.id,
            %start,
            %end,
            length,
            points,
            trains = self.public.trains,
            "Route claimed"
        );

        Ok(ActionOutcome::new(
            ClaimedRoute {
                route: request.route.clone(),
                length,
                color: request.route_color,
            },
            true,
        ))
    }

    /// Try to draw the given face-up train card.
    ///
    /// Returns an `Err` if either:
    ///   * They have drawn tickets, or already two train cards, this turn.
    ///   * There is no such card face up.
    ///   * This is their second draw, and the card is a wild card.
    ///
    /// Otherwise, draws the card and stores it. The turn is over if the card is wild, if this
    /// was the second draw, or if there is nothing left that could be drawn.
    pub fn draw_open_train_card(
        &mut self,
        card: TrainColor,
        turn: usize,
        card_dealer: &mut CardDealer,
    ) -> ActionResult<TrainColor> {
        let turn_second_draw = self.is_second_draw(turn)?;

        if turn_second_draw && card.is_wild() {
            return Err(GameError::ActionNotAllowed(String::from(
                "Cannot draw a face-up wild card after having already drawn a train card this turn.",
            )));
        }

        let card = card_dealer.pick_face_up_card(card)?;
        self.private.hand.add(card);
        self.update_counts();

        if card.is_wild() {
            self.replace_turn_action(Some(turn), PlayerAction::DrewOpenWildTrainCard);

            // Turn is over after drawing a face-up wild card.
            Ok(ActionOutcome::new(card, true))
        } else if turn_second_draw {
            self.append_turn_action(PlayerAction::DrewOpenNonWildTrainCard { color: card });

            Ok(ActionOutcome::new(card, true))
        } else {
            self.replace_turn_action(
                Some(turn),
                PlayerAction::DrewOpenNonWildTrainCard { color: card },
            );

            Ok(ActionOutcome::new(card, !card_dealer.can_draw_again()))
        }
    }

    /// Try to draw the top train card of the deck.
    ///
    /// Returns an `Err` if either:
    ///  * They have drawn tickets, or already two train cards, this turn.
    ///  * There are no cards left in the deck nor the discard pile.
    ///
    /// Otherwise, draws the top card and stores it. The turn is over if this was the second draw,
    /// or if there is nothing left that could be drawn.
    pub fn draw_close_train_card(
        &mut self,
        turn: usize,
        card_dealer: &mut CardDealer,
    ) -> ActionResult<TrainColor> {
        let turn_second_draw = self.is_second_draw(turn)?;

        let card = card_dealer.pick_face_down_card()?;
        self.private.hand.add(card);
        self.update_counts();

        if turn_second_draw {
            self.append_turn_action(PlayerAction::DrewCloseTrainCard);

            Ok(ActionOutcome::new(card, true))
        } else {
            self.replace_turn_action(Some(turn), PlayerAction::DrewCloseTrainCard);

            Ok(ActionOutcome::new(card, !card_dealer.can_draw_again()))
        }
    }

    /// Try to draw tickets.
    ///
    /// Returns an `Err` if there was already an action taken this turn.
    ///
    /// Otherwise, draws up to three tickets and stores them as *pending*. The turn is not over:
    /// the player must then select which tickets to keep, via [`Player::select_tickets`].
    ///
    /// If there are no tickets left at all, nothing happens and an empty offer is returned.
    pub fn draw_tickets(
        &mut self,
        turn: usize,
        ticket_dealer: &mut TicketDealer,
    ) -> ActionResult<TicketOffer> {
        if self.has_acted_this_turn(turn) {
            return Err(GameError::ActionNotAllowed(String::from(
                "Cannot draw tickets after having drawn a train card this turn.",
            )));
        }

        let offer = ticket_dealer.offer_tickets();
        if offer.is_empty() {
            return Ok(ActionOutcome::new(offer, false));
        }

        self.private.pending_tickets = offer.clone();
        self.replace_turn_action(
            Some(turn),
            PlayerAction::DrewTickets {
                num_drawn: offer.len(),
            },
        );

        Ok(ActionOutcome::new(offer, false))
    }

    /// Try to select from the pending tickets, drawn either when the game started (`turn` is
    /// `None`) or earlier this turn via [`Player::draw_tickets`].
    ///
    /// `selection` holds indices into the pending tickets. At least
    /// [`GameConfig::min_initial_tickets`] must be kept on the initial selection, and
    /// [`GameConfig::min_tickets`] otherwise. The other tickets are discarded.
    ///
    /// If no ticket was left to offer when the game started, the initial selection is empty, and
    /// may be repeated.
    ///
    /// Returns the tickets kept. Selecting tickets always ends the turn.
    pub fn select_tickets(
        &mut self,
        selection: &[usize],
        turn: Option<usize>,
        ticket_dealer: &mut TicketDealer,
        config: &GameConfig,
    ) -> ActionResult<Vec<OwnedTicket>> {
        let min_to_select = match (self.public.turn_actions.turn, turn) {
            (Some(last_turn), Some(turn)) if last_turn == turn => {
                if !matches!(
                    self.public.turn_actions.actions.as_slice(),
                    [PlayerAction::DrewTickets { .. }]
                ) {
                    return Err(GameError::ActionNotAllowed(String::from(
                        "Cannot select tickets after having drawn a train card this turn.",
                    )));
                }

                config.min_tickets
            }
            (None, None) if self.public.turn_actions.actions.is_empty() => {
                config.min_initial_tickets
            }
            (None, None)
                if selection.is_empty()
                    && matches!(
                        self.public.turn_actions.actions.as_slice(),
                        [PlayerAction::SelectedTickets { num_drawn: 0, .. }]
                    ) =>
            {
                return Ok(ActionOutcome::new(Vec::new(), true));
            }
            (_, None) => {
                return Err(GameError::ActionNotAllowed(String::from(
                    "The initial tickets were already selected.",
                )))
            }
            (_, Some(_)) => {
                return Err(GameError::ActionNotAllowed(String::from(
                    "Cannot select tickets before having drawn tickets first.",
                )))
            }
        };

        let num_drawn = self.private.pending_tickets.len();
        let kept = if num_drawn == 0 && turn.is_none() {
            if let Some(&index) = selection.first() {
                return Err(GameError::TicketNotOffered {
                    index,
                    offered: num_drawn,
                });
            }
            Vec::new()
        } else {
            ticket_dealer.resolve_selection(
                &self.private.pending_tickets,
                selection,
                min_to_select,
            )?
        };
        self.private.pending_tickets.clear();

        let kept: Vec<OwnedTicket> = kept
            .into_iter()
            .map(|ticket| {
                let (start, end) = &ticket.destination;
                OwnedTicket {
                    completed: self.graph.has_path(start, end),
                    ticket,
                }
            })
            .collect();
        self.private.tickets.extend(kept.iter().cloned());
        self.update_counts();

        let action = PlayerAction::SelectedTickets {
            num_selected: kept.len(),
            num_drawn,
        };
        if turn.is_some() {
            self.append_turn_action(action);
        } else {
            self.replace_turn_action(None, action);
        }

        Ok(ActionOutcome::new(kept, true))
    }

    /// Whether the initial selection of tickets is done. Only meaningful before turns have started.
    pub fn has_selected_initial_tickets(&self) -> bool {
        self.public.turn_actions.turn.is_none()
            && matches!(
                self.public.turn_actions.actions.as_slice(),
                [PlayerAction::SelectedTickets { .. }]
            )
    }

    /// Recomputes which tickets are fulfilled by the claimed routes.
    pub fn refresh_ticket_completion(&mut self) {
        for owned_ticket in &mut self.private.tickets {
            let (start, end) = &owned_ticket.ticket.destination;
            owned_ticket.completed = self.graph.has_path(start, end);
        }
    }

    /// Scores every ticket kept, and adds (or substracts) their points.
    pub fn score_tickets(&mut self) -> Vec<TicketOutcome> {
        let outcomes = scoring::score_player_tickets(
            &self.graph,
            self.private.tickets.iter().map(|owned_ticket| &owned_ticket.ticket),
        );

        self.public.points += outcomes.iter().map(|outcome| outcome.points).sum::<i32>();
        outcomes
    }

    /// Routes of the map the player could claim right now: not already owned, short enough for
    /// the trains left, and with at least one color option the hand can pay for.
    pub fn claimable_routes(&self, map: &RouteGraph) -> Vec<RouteInfo> {
        map.routes()
            .filter(|info| {
                let (start, end) = &info.route;
                info.length <= self.public.trains && !self.graph.has_route(start, end)
            })
            .filter_map(|info| {
                let colors = claim::claimable_colors(&self.private.hand, &info.colors, info.length);
                if colors.is_empty() {
                    None
                } else {
                    Some(RouteInfo { colors, ..info })
                }
            })
            .collect()
    }

    /// Retrieve the player's state, which encapsulates both [`PublicPlayerState`] and [`PrivatePlayerState`].
    ///
    /// If the given `player_id` is not the same as the current player, only the public state will be populated;
    /// the private state will be left to `None`.
    pub fn get_player_state(&self, player_id: usize) -> PlayerState {
        let private = if self.public.id == player_id {
            Some(&self.private)
        } else {
            None
        };

        PlayerState {
            public: &self.public,
            claimed_routes: self.graph.claimed_routes(),
            private,
        }
    }
}
