use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A city on the board.
///
/// Cities are opaque identifiers: the engine never interprets the name, it only compares them.
/// The same `City` is used as a node in the shared [`crate::map::RouteGraph`], and in every
/// player's [`crate::player_graph::PlayerGraph`].
///
/// # JSON
/// Cities are serialized as their name.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct City(String);

impl City {
    /// Creates a city from its name. Surrounding whitespace is not significant.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::city::City;
    ///
    /// assert_eq!(City::new(" Santa Fe "), City::new("Santa Fe"));
    /// ```
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_owned())
    }

    /// The city's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for City {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for City {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for City {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Top-level representation of a connection between two cities.
pub type CityToCity = (City, City);

/// Orders both ends of a connection, so that `(a, b)` and `(b, a)` map to the same key.
#[inline]
pub fn undirected(start: &City, end: &City) -> CityToCity {
    if start <= end {
        (start.clone(), end.clone())
    } else {
        (end.clone(), start.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_to_string() {
        assert_eq!(City::new("Atlanta").to_string(), "Atlanta");
        assert_eq!(City::new("Sault St. Marie").to_string(), "Sault St. Marie");
    }

    #[test]
    fn city_name_is_trimmed() {
        assert_eq!(City::new("  El Paso\t").name(), "El Paso");
    }

    #[test]
    fn city_to_json() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&City::new("Duluth"))?, r#""Duluth""#);
        assert_eq!(
            serde_json::to_string(&City::new("Montréal"))?,
            r#""Montréal""#
        );

        Ok(())
    }

    #[test]
    fn json_to_city() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::from_str::<City>(r#""Miami""#)?,
            City::new("Miami")
        );

        Ok(())
    }

    #[test]
    fn invalid_json_to_city() {
        assert!(serde_json::from_str::<City>("15").is_err());
    }

    #[test]
    fn undirected_is_symmetric() {
        let miami = City::new("Miami");
        let atlanta = City::new("Atlanta");

        assert_eq!(undirected(&miami, &atlanta), undirected(&atlanta, &miami));
        assert_eq!(undirected(&miami, &atlanta), (atlanta, miami));
    }
}
