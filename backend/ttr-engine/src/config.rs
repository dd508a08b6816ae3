//! Tunable rules of the game.
//!
//! Every field has a default matching the standard rules, so an empty YAML document (or
//! [`GameConfig::default`]) describes a regular game.

use crate::error::ConfigError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// All the numbers that shape a game.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// How many train cards are displayed face up.
    pub size_draw_pile: usize,
    /// Once this many wild cards are face up, the whole face-up window is discarded and redealt.
    pub max_wilds: usize,
    /// How many train cards each player starts with.
    pub size_starting_hand: usize,
    /// The final round starts once a player has fewer trains than this.
    pub ending_train_count: u8,
    /// Bonus granted to every player holding the longest continuous path.
    pub points_for_longest_route: i32,
    pub starting_num_of_trains: u8,
    /// Points granted when claiming a route, keyed by route length.
    pub route_values: BTreeMap<u8, i32>,
    /// How many destination tickets are offered per draw.
    pub num_tickets_dealt: usize,
    /// How many of the initial tickets a player must keep.
    pub min_initial_tickets: usize,
    /// How many tickets a player must keep after drawing during the game.
    pub min_tickets: usize,
    pub num_wild_cards: usize,
    pub num_cards_per_color: usize,
    pub min_players: usize,
    pub max_players: usize,
    pub max_name_length: usize,
    /// Parallel routes between two cities can only be claimed by different players when
    /// at least this many players are in the game. Otherwise, claiming one closes the others.
    pub parallel_routes_min_players: usize,
    /// Seed for the card and ticket shuffles. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size_draw_pile: 5,
            max_wilds: 3,
            size_starting_hand: 4,
            ending_train_count: 3,
            points_for_longest_route: 10,
            starting_num_of_trains: 45,
            route_values: BTreeMap::from([(1, 1), (2, 2), (3, 4), (4, 7), (5, 10), (6, 15)]),
            num_tickets_dealt: 3,
            min_initial_tickets: 2,
            min_tickets: 1,
            num_wild_cards: 14,
            num_cards_per_color: 12,
            min_players: 2,
            max_players: 5,
            max_name_length: 50,
            parallel_routes_min_players: 4,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parses a configuration from YAML, then validates it.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::config::GameConfig;
    ///
    /// let config = GameConfig::from_yaml_str("max_wilds: 4\nseed: 7\n").unwrap();
    /// assert_eq!(config.max_wilds, 4);
    /// assert_eq!(config.seed, Some(7));
    /// assert_eq!(config.size_draw_pile, 5);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Checks that the values describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size_draw_pile == 0 {
            return Err(ConfigError::Invalid(String::from(
                "size_draw_pile must be at least 1",
            )));
        }

        if self.max_wilds == 0 {
            return Err(ConfigError::Invalid(String::from(
                "max_wilds must be at least 1",
            )));
        }

        if self.num_tickets_dealt == 0 {
            return Err(ConfigError::Invalid(String::from(
                "num_tickets_dealt must be at least 1",
            )));
        }

        for (name, min) in [
            ("min_initial_tickets", self.min_initial_tickets),
            ("min_tickets", self.min_tickets),
        ] {
            if min > self.num_tickets_dealt {
                return Err(ConfigError::Invalid(format!(
                    "{name} ({min}) cannot exceed num_tickets_dealt ({})",
                    self.num_tickets_dealt
                )));
            }
        }

        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(ConfigError::Invalid(format!(
                "player bounds {}..={} are empty",
                self.min_players, self.max_players
            )));
        }

        let num_cards_needed = self.size_draw_pile + self.size_starting_hand * self.max_players;
        if num_cards_needed > self.total_train_cards() {
            return Err(ConfigError::Invalid(format!(
                "the draw pile and {} starting hands need {num_cards_needed} train cards, but there are only {}",
                self.max_players,
                self.total_train_cards()
            )));
        }

        if self.route_values.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "route_values must not be empty",
            )));
        }

        Ok(())
    }

    /// Total number of train cards in the game.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::config::GameConfig;
    ///
    /// assert_eq!(GameConfig::default().total_train_cards(), 110);
    /// ```
    pub fn total_train_cards(&self) -> usize {
        self.num_wild_cards + crate::train_color::NUM_NON_WILD_COLORS * self.num_cards_per_color
    }

    /// Points granted for claiming a route of the given length, if that length is scored.
    #[inline]
    pub fn points_for_route(&self, length: u8) -> Option<i32> {
        self.route_values.get(&length).copied()
    }

    /// Whether parallel routes stay open to other players, given the number of players.
    #[inline]
    pub fn parallel_routes_allowed(&self, num_players: usize) -> bool {
        num_players >= self.parallel_routes_min_players
    }
}
