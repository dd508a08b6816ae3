use crate::city::{self, City, CityToCity};
use crate::error::{GameError, GameResult};
use crate::map::{self, Adjacency};
use crate::train_color::RouteColor;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use threadpool::ThreadPool;
use tracing::warn;

lazy_static! {
    static ref THREAD_POOL: Mutex<ThreadPool> = Mutex::new(ThreadPool::default());
}

/// A route claimed by a player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ClaimedRoute {
    pub route: CityToCity,
    pub length: u8,
    /// The color option of the route that was claimed.
    pub color: RouteColor,
}

/// The longest continuous path found in a [`PlayerGraph`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LongestPath {
    /// Sum of the lengths of the routes taken.
    pub weight: u32,
    /// Cities in the order they are visited. A city may appear more than once.
    pub cities: Vec<City>,
    /// Routes taken, each with its cities in ascending order.
    pub routes: BTreeSet<CityToCity>,
}

/// The routes claimed by one player.
///
/// Only grows during a game. A player can hold at most one route between two cities.
#[derive(Clone, Debug, Default)]
pub struct PlayerGraph {
    claimed_routes: Vec<ClaimedRoute>,
    adjacency: Adjacency<u8>,
}

impl PlayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a claimed route to the graph, and returns whether it was added.
    ///
    /// If the player already holds a route between these two cities, nothing changes.
    pub fn add_route(&mut self, start: &City, end: &City, length: u8, color: RouteColor) -> bool {
        if self.has_route(start, end) {
            warn!(%start, %end, "Route already in the player's graph, skipping");
            return false;
        }

        self.adjacency
            .entry(start.clone())
            .or_default()
            .insert(end.clone(), length);
        self.adjacency
            .entry(end.clone())
            .or_default()
            .insert(start.clone(), length);
        self.claimed_routes.push(ClaimedRoute {
            route: (start.clone(), end.clone()),
            length,
            color,
        });

        true
    }

    #[inline]
    pub fn has_route(&self, start: &City, end: &City) -> bool {
        self.adjacency
            .get(start)
            .map_or(false, |neighbors| neighbors.contains_key(end))
    }

    /// Cities touched by at least one claimed route.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.adjacency.keys()
    }

    #[inline]
    pub fn has_city(&self, city: &City) -> bool {
        self.adjacency.contains_key(city)
    }

    /// Claimed routes, in the order they were claimed.
    pub fn claimed_routes(&self) -> &[ClaimedRoute] {
        &self.claimed_routes
    }

    /// Whether the claimed routes connect both cities.
    pub fn has_path(&self, start: &City, end: &City) -> bool {
        self.has_city(start) && self.has_city(end) && map::has_path(&self.adjacency, start, end)
    }

    /// Returns the longest continuous path starting at `start`.
    ///
    /// A continuous path may visit a city multiple times, but may not go through a route twice.
    /// Every such path is explored. Among paths of equal weight, the first one found is kept.
    ///
    /// # Example
    /// ```
    /// use std::collections::BTreeSet;
    /// use ttr_engine::city::City;
    /// use ttr_engine::player_graph::PlayerGraph;
    /// use ttr_engine::train_color::RouteColor;
    ///
    /// let mut player_graph = PlayerGraph::new();
    /// for (start, end, length) in [
    ///     ("a", "b", 1),
    ///     ("b", "d", 1),
    ///     ("d", "e", 1),
    ///     ("e", "f", 98),
    ///     ("e", "b", 1),
    ///     ("b", "c", 1),
    ///     ("a", "z", 1),
    /// ] {
    ///     player_graph.add_route(&City::new(start), &City::new(end), length, RouteColor::Red);
    /// }
    ///
    /// let longest_path = player_graph.longest_path(&City::new("b")).unwrap();
    /// assert_eq!(longest_path.weight, 100);
    /// assert_eq!(
    ///     longest_path.cities,
    ///     ["b", "d", "e", "f"].map(City::new).to_vec()
    /// );
    /// assert_eq!(
    ///     longest_path.routes,
    ///     BTreeSet::from([("b", "d"), ("d", "e"), ("e", "f")].map(|(start, end)| (City::new(start), City::new(end))))
    /// );
    /// ```
    pub fn longest_path(&self, start: &City) -> GameResult<LongestPath> {
        if !self.has_city(start) {
            return Err(GameError::CityNotFound(start.clone()));
        }

        Ok(longest_path_from_city(&self.adjacency, start))
    }

    /// Returns the longest continuous path of the whole graph, trying every city as a start.
    ///
    /// Each start city is explored on a shared thread pool. Among paths of equal weight, the
    /// one starting at the smallest city wins.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::city::City;
    /// use ttr_engine::player_graph::PlayerGraph;
    /// use ttr_engine::train_color::RouteColor;
    ///
    /// let mut player_graph = PlayerGraph::new();
    /// player_graph.add_route(&City::new("El Paso"), &City::new("Phoenix"), 3, RouteColor::Grey);
    /// player_graph.add_route(&City::new("Denver"), &City::new("Phoenix"), 5, RouteColor::White);
    ///
    /// // Route El Paso -> Phoenix is of length 3.
    /// // Route Phoenix -> Denver is of length 5.
    /// assert_eq!(player_graph.longest_route().weight, 8);
    /// ```
    pub fn longest_route(&self) -> LongestPath {
        let cities: Vec<City> = self.adjacency.keys().cloned().collect();
        if cities.is_empty() {
            return LongestPath::default();
        }

        let adjacency = Arc::new(self.adjacency.clone());
        let (tx, rx) = mpsc::channel();

        {
            let thread_pool = THREAD_POOL.lock().unwrap_or_else(PoisonError::into_inner);

            // Each city is explored by a separate job of the pool.
            for (index, city) in cities.iter().cloned().enumerate() {
                let adjacency = adjacency.clone();
                let tx = tx.clone();

                thread_pool.execute(move || {
                    // The receiver only hangs up once it stopped listening.
                    let _ = tx.send((index, longest_path_from_city(&adjacency, &city)));
                });
            }
        }
        drop(tx);

        let mut paths: BTreeMap<usize, LongestPath> = rx.iter().take(cities.len()).collect();
        if paths.len() < cities.len() {
            warn!(
                missing = cities.len() - paths.len(),
                "Some longest route searches did not complete, computing them inline"
            );
            for (index, city) in cities.iter().enumerate() {
                paths
                    .entry(index)
                    .or_insert_with(|| longest_path_from_city(&self.adjacency, city));
            }
        }

        paths
            .into_values()
            .fold(LongestPath::default(), |longest, path| {
                if path.weight > longest.weight {
                    path
                } else {
                    longest
                }
            })
    }
}

/// Stack-based exhaustive search of the heaviest trail starting at `start`.
fn longest_path_from_city(adjacency: &Adjacency<u8>, start: &City) -> LongestPath {
    let mut longest = LongestPath {
        weight: 0,
        cities: vec![start.clone()],
        routes: BTreeSet::new(),
    };
    let mut to_visit = vec![longest.clone()];

    while let Some(path) = to_visit.pop() {
        if path.weight > longest.weight {
            longest = path.clone();
        }

        let Some(city) = path.cities.last() else {
            continue;
        };

        for (neighbor, length) in adjacency.get(city).into_iter().flatten() {
            let route = city::undirected(city, neighbor);
            if path.routes.contains(&route) {
                continue;
            }

            let mut next = path.clone();
            next.weight += u32::from(*length);
            next.cities.push(neighbor.clone());
            next.routes.insert(route);
            to_visit.push(next);
        }
    }

    longest
}
