use crate::city::{City, CityToCity};
use crate::data::{self, RouteSpec};
use crate::error::{DataError, GameError, GameResult};
use crate::train_color::RouteColor;

use serde::Serialize;
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashSet, VecDeque};
use std::path::Path;
use tracing::{debug, info};

/// The colors still claimable on a route, one entry per parallel track.
/// There is at most two "parallel" tracks between two cities on the standard map.
pub type ParallelColors = SmallVec<[RouteColor; 2]>;

/// Maps each city to its adjacent cities, and whatever is stored on the edge between the two.
/// Every edge is stored twice, once per direction.
pub(crate) type Adjacency<E> = BTreeMap<City, BTreeMap<City, E>>;

/// An unclaimed connection between two adjacent cities.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    /// The distance between two cities. This is analogous to the number of train cards needed to claim the route.
    pub length: u8,
    /// The remaining color options. A route with no colors left no longer exists on the board.
    pub colors: ParallelColors,
}

/// A route as listed by [`RouteGraph::routes`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteInfo {
    pub route: CityToCity,
    pub length: u8,
    pub colors: ParallelColors,
}

/// The authoritative state of the board, per game.
///
/// Built once from static data, then routes shrink (and eventually disappear) as players claim
/// them. Routes are never restored.
#[derive(Clone, Debug)]
pub struct RouteGraph {
    cities: BTreeSet<City>,
    routes: Adjacency<Route>,
}

impl RouteGraph {
    /// Builds a board from already parsed cities and routes.
    pub fn new(cities: impl IntoIterator<Item = City>, routes: Vec<RouteSpec>) -> Self {
        let mut graph = Self {
            cities: cities.into_iter().collect(),
            routes: BTreeMap::new(),
        };

        for spec in routes {
            if spec.colors.is_empty() {
                continue;
            }

            graph.cities.insert(spec.start.clone());
            graph.cities.insert(spec.end.clone());

            let route = Route {
                length: spec.length,
                colors: spec.colors,
            };
            graph
                .routes
                .entry(spec.end.clone())
                .or_default()
                .insert(spec.start.clone(), route.clone());
            graph
                .routes
                .entry(spec.start)
                .or_default()
                .insert(spec.end, route);
        }

        graph
    }

    /// Parses a board from the city and route data formats described in [`crate::data`].
    pub fn from_sources(cities: &str, routes: &str) -> Result<Self, DataError> {
        let cities = data::parse_cities(cities)?;
        let known_cities: BTreeSet<City> = cities.iter().cloned().collect();
        let routes = data::parse_routes(routes, &known_cities)?;

        Ok(Self::new(cities, routes))
    }

    /// Reads a board from a cities file and a routes file.
    pub fn from_files(
        cities_path: impl AsRef<Path>,
        routes_path: impl AsRef<Path>,
    ) -> Result<Self, DataError> {
        Self::from_sources(
            &data::read_source(cities_path)?,
            &data::read_source(routes_path)?,
        )
    }

    /// The standard board: 36 cities across the US.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::city::City;
    /// use ttr_engine::map::RouteGraph;
    ///
    /// let map = RouteGraph::us_map().unwrap();
    /// assert!(map.has_route(&City::new("Seattle"), &City::new("Portland")));
    /// assert!(!map.has_route(&City::new("Seattle"), &City::new("Miami")));
    /// ```
    pub fn us_map() -> Result<Self, DataError> {
        Self::from_sources(data::US_CITIES, data::US_ROUTES)
    }

    /// All the cities of the board, including those whose routes were all claimed.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    #[inline]
    pub fn has_city(&self, city: &City) -> bool {
        self.cities.contains(city)
    }

    /// Whether there is still a claimable route between two cities.
    #[inline]
    pub fn has_route(&self, start: &City, end: &City) -> bool {
        self.routes
            .get(start)
            .map_or(false, |neighbors| neighbors.contains_key(end))
    }

    /// The route between two cities, or a [`GameError::RouteNotFound`].
    pub fn route(&self, start: &City, end: &City) -> GameResult<&Route> {
        self.routes
            .get(start)
            .and_then(|neighbors| neighbors.get(end))
            .ok_or_else(|| GameError::RouteNotFound {
                start: start.clone(),
                end: end.clone(),
            })
    }

    /// The length (weight) of the route between two cities.
    pub fn route_length(&self, start: &City, end: &City) -> GameResult<u8> {
        Ok(self.route(start, end)?.length)
    }

    /// The color options still claimable on the route between two cities.
    pub fn route_colors(&self, start: &City, end: &City) -> GameResult<&ParallelColors> {
        Ok(&self.route(start, end)?.colors)
    }

    /// Cities adjacent to `city` through a route that is still claimable.
    pub fn neighbors(&self, city: &City) -> GameResult<Vec<City>> {
        if !self.has_city(city) {
            return Err(GameError::CityNotFound(city.clone()));
        }

        Ok(self
            .routes
            .get(city)
            .map(|neighbors| neighbors.keys().cloned().collect())
            .unwrap_or_default())
    }

    /// Every remaining route, listed once with its cities in ascending order.
    pub fn routes(&self) -> impl Iterator<Item = RouteInfo> + '_ {
        self.routes.iter().flat_map(|(start, neighbors)| {
            neighbors
                .range::<City, _>((
                    std::ops::Bound::Excluded(start),
                    std::ops::Bound::Unbounded,
                ))
                .map(move |(end, route)| RouteInfo {
                    route: (start.clone(), end.clone()),
                    length: route.length,
                    colors: route.colors.clone(),
                })
        })
    }

    /// Consumes one color option of the route between two cities, and returns the option removed.
    ///
    /// If the route has a grey option, that option is consumed first, whichever `color` is given.
    /// Otherwise `color` itself must be one of the options. Once no option is left, the route is
    /// removed from the board.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::city::City;
    /// use ttr_engine::map::RouteGraph;
    /// use ttr_engine::train_color::RouteColor;
    ///
    /// let mut map = RouteGraph::us_map().unwrap();
    /// let (kansas_city, saint_louis) = (City::new("Kansas City"), City::new("Saint Louis"));
    ///
    /// assert_eq!(map.remove_color(&kansas_city, &saint_louis, RouteColor::Pink), Ok(RouteColor::Pink));
    /// assert!(map.has_route(&kansas_city, &saint_louis));
    ///
    /// assert!(map.remove_color(&kansas_city, &saint_louis, RouteColor::Pink).is_err());
    /// assert_eq!(map.remove_color(&saint_louis, &kansas_city, RouteColor::Blue), Ok(RouteColor::Blue));
    /// assert!(!map.has_route(&kansas_city, &saint_louis));
    /// ```
    pub fn remove_color(
        &mut self,
        start: &City,
        end: &City,
        color: RouteColor,
    ) -> GameResult<RouteColor> {
        let colors = &self.route(start, end)?.colors;

        let index = colors
            .iter()
            .position(|option| option.is_grey())
            .or_else(|| colors.iter().position(|option| *option == color))
            .ok_or_else(|| GameError::ColorNotOnRoute {
                start: start.clone(),
                end: end.clone(),
                color,
            })?;

        let mut removed = None;
        let mut now_empty = false;
        for (from, to) in [(start, end), (end, start)] {
            if let Some(route) = self.routes.get_mut(from).and_then(|routes| routes.get_mut(to)) {
                removed = Some(route.colors.remove(index));
                now_empty = route.colors.is_empty();
            }
        }

        debug!(%start, %end, ?removed, "Consumed a route color");

        if now_empty {
            self.remove_route(start, end)?;
        }

        removed.ok_or_else(|| GameError::RouteNotFound {
            start: start.clone(),
            end: end.clone(),
        })
    }

    /// Removes the route between two cities altogether, with all its remaining color options.
    pub fn remove_route(&mut self, start: &City, end: &City) -> GameResult<Route> {
        let route = self
            .routes
            .get_mut(start)
            .and_then(|neighbors| neighbors.remove(end))
            .ok_or_else(|| GameError::RouteNotFound {
                start: start.clone(),
                end: end.clone(),
            })?;

        if let Some(neighbors) = self.routes.get_mut(end) {
            neighbors.remove(start);
        }

        for city in [start, end] {
            if self.routes.get(city).map_or(false, BTreeMap::is_empty) {
                self.routes.remove(city);
            }
        }

        info!(%start, %end, "Route removed from the board");
        Ok(route)
    }

    /// Whether `end` can be reached from `start` through remaining routes.
    pub fn has_path(&self, start: &City, end: &City) -> bool {
        self.has_city(start) && self.has_city(end) && has_path(&self.routes, start, end)
    }

    /// The total length of the shortest path between two cities, using the remaining routes.
    ///
    /// Returns `Ok(None)` if the cities are not connected, or an error if either is not on the map.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::city::City;
    /// use ttr_engine::map::RouteGraph;
    ///
    /// let map = RouteGraph::us_map().unwrap();
    ///
    /// // Vancouver -> Seattle (1) -> Portland (1).
    /// assert_eq!(
    ///     map.shortest_path_length(&City::new("Vancouver"), &City::new("Portland")),
    ///     Ok(Some(2))
    /// );
    /// ```
    pub fn shortest_path_length(&self, start: &City, end: &City) -> GameResult<Option<u32>> {
        for city in [start, end] {
            if !self.has_city(city) {
                return Err(GameError::CityNotFound(city.clone()));
            }
        }

        let mut distances: BTreeMap<&City, u32> = BTreeMap::from([(start, 0)]);
        let mut to_visit = BinaryHeap::from([Reverse((0u32, start))]);

        while let Some(Reverse((distance, city))) = to_visit.pop() {
            if city == end {
                return Ok(Some(distance));
            }

            if distances.get(city).map_or(false, |best| distance > *best) {
                continue;
            }

            for (neighbor, route) in self.routes.get(city).into_iter().flatten() {
                let candidate = distance + u32::from(route.length);
                if distances.get(neighbor).map_or(true, |best| candidate < *best) {
                    distances.insert(neighbor, candidate);
                    to_visit.push(Reverse((candidate, neighbor)));
                }
            }
        }

        Ok(None)
    }
}

/// Breadth-first search over an adjacency map.
pub(crate) fn has_path<E>(adjacency: &Adjacency<E>, start: &City, end: &City) -> bool {
    if start == end {
        return true;
    }

    let mut cities_visited = HashSet::from([start]);
    let mut cities_to_visit = VecDeque::from([start]);

    while let Some(city) = cities_to_visit.pop_front() {
        for neighbor in adjacency.get(city).into_iter().flat_map(BTreeMap::keys) {
            if neighbor == end {
                return true;
            }

            if cities_visited.insert(neighbor) {
                cities_to_visit.push_back(neighbor);
            }
        }
    }

    false
}
