//! Error types of the engine.
//!
//! Every rule violation a player can commit is a [`GameError`]. These are all recoverable:
//! validation always happens before any mutation, so the turn driver can report the error
//! and prompt again. Malformed static data ([`DataError`]) and configuration
//! ([`ConfigError`]) only surface while building a game.

use crate::city::City;
use crate::train_color::{RouteColor, TrainColor};

use serde::Serialize;

/// Coarse classification of a [`GameError`], for callers that only branch on the category.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Query on an absent city, route or player.
    NotFound,
    /// Color not on the route, or not usable for it.
    InvalidColor,
    /// Card or ticket not in the offered set, or a malformed selection.
    InvalidSelection,
    /// Not enough cards, wild cards or trains.
    InsufficientResource,
    /// Both the train card deck and its discard pile are empty.
    DeckExhausted,
    /// The action is not allowed at this point of the game or of the turn.
    InvalidAction,
}

/// Errors that can occur while playing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("{0} is not a city on the map.")]
    CityNotFound(City),

    #[error("No routes exist between {start} and {end}.")]
    RouteNotFound { start: City, end: City },

    #[error("No player has the id {0}.")]
    PlayerNotFound(usize),

    #[error("The route between {start} and {end} cannot be claimed in {color}.")]
    ColorNotOnRoute {
        start: City,
        end: City,
        color: RouteColor,
    },

    #[error("Cannot claim a {route_color} route with {played} cards.")]
    ColorMismatch {
        route_color: RouteColor,
        played: TrainColor,
    },

    #[error("There is no {0} card in the open deck.")]
    CardNotInDrawPile(TrainColor),

    #[error("Ticket #{index} was not offered; only {offered} were drawn.")]
    TicketNotOffered { index: usize, offered: usize },

    #[error("Ticket #{0} was selected more than once.")]
    DuplicateTicketSelection(usize),

    #[error("Cannot select only {selected} tickets, whilst the minimum is {min}.")]
    TooFewTicketsSelected { selected: usize, min: usize },

    #[error("There are no pending tickets to select from.")]
    NoPendingTickets,

    #[error("Cannot claim more than one route between {start} and {end}.")]
    RouteAlreadyOwned { start: City, end: City },

    #[error("A route of length {length} needs {length} cards, but {provided} were provided.")]
    WrongNumberOfCards { length: u8, provided: u8 },

    #[error("Cannot play {requested} {color} cards, whilst having only {available} left.")]
    NotEnoughCards {
        color: TrainColor,
        requested: u8,
        available: u8,
    },

    #[error("The cards in hand cannot pay for the route between {start} and {end}.")]
    CannotAffordRoute { start: City, end: City },

    #[error("Cannot claim a route of length {needed}, whilst having only {available} trains left.")]
    NotEnoughTrains { needed: u8, available: u8 },

    #[error("There are no cards left in the deck nor in the discard pile.")]
    DeckExhausted,

    #[error("It is not player {player_id}'s turn.")]
    NotPlayerTurn { player_id: usize },

    #[error("{0}")]
    ActionNotAllowed(String),
}

impl GameError {
    /// Maps the error to its category.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::error::{ErrorKind, GameError};
    ///
    /// assert_eq!(GameError::DeckExhausted.kind(), ErrorKind::DeckExhausted);
    /// assert_eq!(GameError::PlayerNotFound(3).kind(), ErrorKind::NotFound);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::CityNotFound(_)
            | GameError::RouteNotFound { .. }
            | GameError::PlayerNotFound(_) => ErrorKind::NotFound,
            GameError::ColorNotOnRoute { .. }
            | GameError::ColorMismatch { .. } => ErrorKind::InvalidColor,
            GameError::CardNotInDrawPile(_)
            | GameError::TicketNotOffered { .. }
            | GameError::DuplicateTicketSelection(_)
            | GameError::TooFewTicketsSelected { .. }
            | GameError::NoPendingTickets
            | GameError::RouteAlreadyOwned { .. }
            | GameError::WrongNumberOfCards { .. } => ErrorKind::InvalidSelection,
            GameError::NotEnoughCards { .. }
            | GameError::CannotAffordRoute { .. }
            | GameError::NotEnoughTrains { .. } => ErrorKind::InsufficientResource,
            GameError::DeckExhausted => ErrorKind::DeckExhausted,
            GameError::NotPlayerTurn { .. } | GameError::ActionNotAllowed(_) => {
                ErrorKind::InvalidAction
            }
        }
    }
}

/// Errors found while reading the static city, route and ticket data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected at least {expected} comma-separated fields, found {found}")]
    MissingFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: `{value}` is not a known route color")]
    InvalidColor { line: usize, value: String },

    #[error("line {line}: unknown city `{city}`")]
    UnknownCity { line: usize, city: City },

    #[error("line {line}: a route cannot connect {city} to itself")]
    SelfLoop { line: usize, city: City },

    #[error("line {line}: duplicate route between {start} and {end}")]
    DuplicateRoute { line: usize, start: City, end: City },

    #[error("line {line}: duplicate city `{city}`")]
    DuplicateCity { line: usize, city: City },
}

/// Errors that can occur when loading or validating a [`crate::config::GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {source}")]
    Yaml { source: serde_yml::Error },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// All engine operations share this `Result`.
pub type GameResult<T> = Result<T, GameError>;
