//! Readers for the static board data.
//!
//! All three formats are line based, with comma-separated fields:
//!   * cities: one city name per line;
//!   * routes: `city,city,length,color[,color...]`, where each trailing color is one claimable track;
//!   * tickets: `city,city,points`.
//!
//! Blank lines and lines starting with `#` are ignored. The default US map ships with the crate.

use crate::city::City;
use crate::error::DataError;
use crate::ticket::Ticket;
use crate::train_color::RouteColor;

use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

/// Cities of the default US map.
pub const US_CITIES: &str = include_str!("../data/cities.txt");
/// Routes of the default US map.
pub const US_ROUTES: &str = include_str!("../data/edges.txt");
/// Destination tickets of the default US map.
pub const US_TICKETS: &str = include_str!("../data/tickets.txt");

/// A route as described by the data files, before it is placed on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSpec {
    pub start: City,
    pub end: City,
    pub length: u8,
    /// One entry per parallel track.
    pub colors: SmallVec<[RouteColor; 2]>,
}

/// Yields the meaningful lines of a data file, with their 1-based line number.
fn records(source: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    source.lines().enumerate().filter_map(|(index, line)| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            None
        } else {
            Some((index + 1, line.split(',').map(str::trim).collect()))
        }
    })
}

fn expect_fields(line: usize, fields: &[&str], expected: usize) -> Result<(), DataError> {
    if fields.len() < expected || fields.iter().take(expected).any(|field| field.is_empty()) {
        return Err(DataError::MissingFields {
            line,
            expected,
            found: fields.iter().filter(|field| !field.is_empty()).count(),
        });
    }
    Ok(())
}

fn parse_number<T: FromStr>(line: usize, value: &str) -> Result<T, DataError> {
    value.parse().map_err(|_| DataError::InvalidNumber {
        line,
        value: value.to_owned(),
    })
}

fn known_city(line: usize, name: &str, known_cities: &BTreeSet<City>) -> Result<City, DataError> {
    let city = City::new(name);
    if known_cities.contains(&city) {
        Ok(city)
    } else {
        Err(DataError::UnknownCity { line, city })
    }
}

/// Parses the list of cities.
///
/// # Example
/// ```
/// use ttr_engine::data::parse_cities;
///
/// let cities = parse_cities("# comment\nSeattle\n\nPortland\n").unwrap();
/// assert_eq!(cities.len(), 2);
/// ```
pub fn parse_cities(source: &str) -> Result<Vec<City>, DataError> {
    let mut seen = BTreeSet::new();
    let mut cities = Vec::new();

    for (line, fields) in records(source) {
        let city = City::new(fields.join(","));
        if !seen.insert(city.clone()) {
            return Err(DataError::DuplicateCity { line, city });
        }
        cities.push(city);
    }

    Ok(cities)
}

/// Parses the list of routes. Every route must connect two distinct `known_cities`, and each
/// pair of cities may only appear once (parallel tracks are listed as extra colors instead).
pub fn parse_routes(
    source: &str,
    known_cities: &BTreeSet<City>,
) -> Result<Vec<RouteSpec>, DataError> {
    let mut seen = BTreeSet::new();
    let mut routes = Vec::new();

    for (line, fields) in records(source) {
        expect_fields(line, &fields, 4)?;

        let start = known_city(line, fields[0], known_cities)?;
        let end = known_city(line, fields[1], known_cities)?;
        if start == end {
            return Err(DataError::SelfLoop { line, city: start });
        }

        let length: u8 = parse_number(line, fields[2])?;
        if length == 0 {
            return Err(DataError::InvalidNumber {
                line,
                value: fields[2].to_owned(),
            });
        }

        let colors = fields[3..]
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| {
                RouteColor::from_str(field).map_err(|_| DataError::InvalidColor {
                    line,
                    value: (*field).to_owned(),
                })
            })
            .collect::<Result<SmallVec<_>, _>>()?;

        if !seen.insert(crate::city::undirected(&start, &end)) {
            return Err(DataError::DuplicateRoute { line, start, end });
        }

        routes.push(RouteSpec {
            start,
            end,
            length,
            colors,
        });
    }

    Ok(routes)
}

/// Parses the list of destination tickets, whose cities must all be `known_cities`.
pub fn parse_tickets(
    source: &str,
    known_cities: &BTreeSet<City>,
) -> Result<Vec<Ticket>, DataError> {
    records(source)
        .map(|(line, fields)| {
            expect_fields(line, &fields, 3)?;

            Ok(Ticket {
                destination: (
                    known_city(line, fields[0], known_cities)?,
                    known_city(line, fields[1], known_cities)?,
                ),
                points: parse_number(line, fields[2])?,
            })
        })
        .collect()
}

/// Reads a data file from disk.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, DataError> {
    Ok(std::fs::read_to_string(path)?)
}
