//! Rules engine for a Ticket to Ride game.
//!
//! The [`manager::Manager`] drives a whole game: the lobby, turns, the final round and scoring.
//! Every other module can also be used on its own.

pub mod card;
pub mod city;
pub mod claim;
pub mod config;
pub mod data;
pub mod error;
pub mod game_phase;
pub mod game_state;
pub mod manager;
pub mod map;
pub mod player;
pub mod player_graph;
pub mod scoring;
pub mod ticket;
pub mod train_color;

pub use config::GameConfig;
pub use error::{ErrorKind, GameError, GameResult};
pub use manager::Manager;

#[macro_use]
extern crate smallvec;
#[macro_use]
extern crate lazy_static;
