//! End of game scoring: destination tickets, then the longest route bonus.

use crate::player_graph::PlayerGraph;
use crate::ticket::Ticket;

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// How a ticket fared at the end of the game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Both cities are connected by the player's routes. The ticket's points are granted.
    Completed,
    /// At least one of the cities is not touched by the player's routes. The ticket's points
    /// are substracted.
    Failed,
    /// Both cities are touched by the player's routes, but not connected. No points change.
    Disconnected,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TicketOutcome {
    pub ticket: Ticket,
    pub status: TicketStatus,
    /// Points granted (or substracted, if negative) for this ticket.
    pub points: i32,
}

/// Who gets the longest route bonus.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LongestRouteAward {
    /// The weight of the longest route, across all players.
    pub weight: u32,
    /// Every player holding a route of that weight. They all get the full bonus.
    pub player_ids: Vec<usize>,
    pub bonus: i32,
    /// The weight of each player's longest route.
    pub weights: BTreeMap<usize, u32>,
}

/// A player's score breakdown at the end of the game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerScore {
    pub player_id: usize,
    pub name: String,
    /// Points gained by claiming routes during the game.
    pub route_points: i32,
    pub tickets: Vec<TicketOutcome>,
    pub ticket_points: i32,
    pub longest_route_weight: u32,
    /// Either zero, or the full longest route bonus.
    pub longest_route_bonus: i32,
    pub total: i32,
}

/// Final results of a game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FinalScores {
    /// In turn order.
    pub players: Vec<PlayerScore>,
    pub longest_route: LongestRouteAward,
    /// Every player sharing the highest total.
    pub winners: Vec<usize>,
}

impl FinalScores {
    /// Gathers the breakdowns, and picks the winners.
    pub fn new(players: Vec<PlayerScore>, longest_route: LongestRouteAward) -> Self {
        let best_total = players.iter().map(|player| player.total).max();
        let winners = players
            .iter()
            .filter(|player| Some(player.total) == best_total)
            .map(|player| player.player_id)
            .collect();

        Self {
            players,
            longest_route,
            winners,
        }
    }
}

/// Scores a single ticket against a player's routes.
///
/// # Example
/// ```
/// use ttr_engine::city::City;
/// use ttr_engine::player_graph::PlayerGraph;
/// use ttr_engine::scoring::{score_ticket, TicketStatus};
/// use ttr_engine::ticket::Ticket;
/// use ttr_engine::train_color::RouteColor;
///
/// let (x, y) = (City::new("X"), City::new("Y"));
/// let ticket = Ticket::new(x.clone(), y.clone(), 10);
/// let mut player_graph = PlayerGraph::new();
///
/// player_graph.add_route(&x, &City::new("W"), 2, RouteColor::Grey);
/// assert_eq!(score_ticket(&player_graph, &ticket).points, -10);
///
/// player_graph.add_route(&City::new("W"), &y, 2, RouteColor::Grey);
/// let outcome = score_ticket(&player_graph, &ticket);
/// assert_eq!(outcome.status, TicketStatus::Completed);
/// assert_eq!(outcome.points, 10);
/// ```
pub fn score_ticket(player_graph: &PlayerGraph, ticket: &Ticket) -> TicketOutcome {
    let (start, end) = &ticket.destination;
    let points = i32::from(ticket.points);

    let (status, points) = if !player_graph.has_city(start) || !player_graph.has_city(end) {
        (TicketStatus::Failed, -points)
    } else if player_graph.has_path(start, end) {
        (TicketStatus::Completed, points)
    } else {
        (TicketStatus::Disconnected, 0)
    };

    TicketOutcome {
        ticket: ticket.clone(),
        status,
        points,
    }
}

/// Scores every ticket held by a player.
pub fn score_player_tickets<'a>(
    player_graph: &PlayerGraph,
    tickets: impl IntoIterator<Item = &'a Ticket>,
) -> Vec<TicketOutcome> {
    tickets
        .into_iter()
        .map(|ticket| score_ticket(player_graph, ticket))
        .collect()
}

/// Finds the players holding the longest route, each player's longest route being searched from
/// every city of their graph.
///
/// Ties all get the full `bonus`. If nobody claimed anything, everyone ties at zero.
pub fn score_longest_path<'a>(
    player_graphs: impl IntoIterator<Item = (usize, &'a PlayerGraph)>,
    bonus: i32,
) -> LongestRouteAward {
    let weights: BTreeMap<usize, u32> = player_graphs
        .into_iter()
        .map(|(player_id, player_graph)| (player_id, player_graph.longest_route().weight))
        .collect();

    let weight = weights.values().copied().max().unwrap_or_default();
    let player_ids: Vec<usize> = weights
        .iter()
        .filter(|(_, player_weight)| **player_weight == weight)
        .map(|(player_id, _)| *player_id)
        .collect();

    info!(weight, ?player_ids, bonus, "Longest route bonus awarded");

    LongestRouteAward {
        weight,
        player_ids,
        bonus,
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;
    use crate::ticket::ticket;
    use crate::train_color::RouteColor;
    use pretty_assertions::assert_eq;

    fn player_graph(routes: &[(&str, &str, u8)]) -> PlayerGraph {
        let mut player_graph = PlayerGraph::new();
        for (start, end, length) in routes {
            player_graph.add_route(&City::new(start), &City::new(end), *length, RouteColor::Grey);
        }
        player_graph
    }

    #[test]
    fn score_tickets_of_player() {
        let player_graph = player_graph(&[("X", "A", 1), ("A", "Y", 1), ("B", "C", 2)]);
        let tickets = [
            ticket!("X", "Y", 10),
            ticket!("X", "Z", 7),
            ticket!("Y", "B", 4),
        ];

        let outcomes = score_player_tickets(&player_graph, &tickets);

        assert_eq!(
            outcomes
                .iter()
                .map(|outcome| (outcome.status, outcome.points))
                .collect::<Vec<_>>(),
            vec![
                (TicketStatus::Completed, 10),
                (TicketStatus::Failed, -7),
                (TicketStatus::Disconnected, 0),
            ]
        );
    }

    #[test]
    fn score_tickets_without_routes() {
        let outcomes = score_player_tickets(&PlayerGraph::new(), &[ticket!("X", "Y", 10)]);

        assert_eq!(outcomes[0].points, -10);
        assert_eq!(outcomes[0].status, TicketStatus::Failed);
    }

    #[test]
    fn longest_path_single_winner() {
        let first = player_graph(&[("a", "b", 3), ("b", "c", 4)]);
        let second = player_graph(&[("x", "y", 6)]);

        let award = score_longest_path([(0, &first), (1, &second)], 10);

        assert_eq!(award.weight, 7);
        assert_eq!(award.player_ids, vec![0]);
        assert_eq!(award.weights, BTreeMap::from([(0, 7), (1, 6)]));
    }

    #[test]
    fn longest_path_ties_share_full_bonus() {
        let first = player_graph(&[("a", "b", 3), ("b", "c", 3)]);
        let second = player_graph(&[("x", "y", 6)]);
        let third = player_graph(&[("m", "n", 1)]);

        let award = score_longest_path([(0, &first), (1, &second), (2, &third)], 10);

        assert_eq!(award.weight, 6);
        assert_eq!(award.player_ids, vec![0, 1]);
        assert_eq!(award.bonus, 10);
    }

    fn player_score(player_id: usize, total: i32) -> PlayerScore {
        PlayerScore {
            player_id,
            name: format!("Player {}", player_id + 1),
            route_points: total,
            tickets: Vec::new(),
            ticket_points: 0,
            longest_route_weight: 0,
            longest_route_bonus: 0,
            total,
        }
    }

    #[test]
    fn final_scores_winners() {
        let scores = FinalScores::new(
            vec![player_score(0, 40), player_score(1, 52), player_score(2, 52)],
            LongestRouteAward::default(),
        );
        assert_eq!(scores.winners, vec![1, 2]);

        let scores = FinalScores::new(
            vec![player_score(0, -3), player_score(1, -8)],
            LongestRouteAward::default(),
        );
        assert_eq!(scores.winners, vec![0]);
    }

    #[test]
    fn longest_path_nobody_claimed_anything() {
        let empty = PlayerGraph::new();

        let award = score_longest_path([(0, &empty), (1, &empty)], 10);

        assert_eq!(award.weight, 0);
        assert_eq!(award.player_ids, vec![0, 1]);
    }
}
