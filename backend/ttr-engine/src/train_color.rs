use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Number of non-wild train colors.
pub const NUM_NON_WILD_COLORS: usize = 8;

/// Represents the different variants of train cards.
///
/// # Parsing
/// Colors parse case-insensitively; `purple` is accepted for [`TrainColor::Pink`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TrainColor {
    /// Also known as the *Hopper train*.
    Black,
    /// Also known as the *Tanker train*.
    Blue,
    /// Also known as the *Caboose train*.
    Green,
    /// Also known as the *Freight train*.
    Orange,
    /// Also known as the *Box train*.
    #[serde(alias = "purple")]
    #[strum(to_string = "pink", serialize = "purple")]
    Pink,
    /// Also known as the *Coal train*.
    Red,
    /// Also known as the *Passenger train*.
    White,
    /// Also known as the *Locomotive*.
    /// This is a special train that matches with any color.
    Wild,
    /// Also known as the *Reefer train*.
    Yellow,
}

impl TrainColor {
    /// Whether the current color is wild, i.e. matches with any color.
    ///
    /// # Examples:
    /// ```
    /// use ttr_engine::train_color::TrainColor;
    ///
    /// let color = TrainColor::Black;
    /// assert!(!color.is_wild());
    ///
    /// let wild_color = TrainColor::Wild;
    /// assert!(wild_color.is_wild());
    /// ```
    #[inline]
    pub fn is_wild(&self) -> bool {
        *self == TrainColor::Wild
    }

    /// The opposite of `is_wild`.
    #[inline]
    pub fn is_not_wild(&self) -> bool {
        !self.is_wild()
    }
}

/// The color printed on a route of the board.
///
/// A [`RouteColor::Grey`] route accepts any single color of train cards.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RouteColor {
    Black,
    Blue,
    Green,
    #[serde(alias = "gray")]
    #[strum(to_string = "grey", serialize = "gray")]
    Grey,
    Orange,
    #[serde(alias = "purple")]
    #[strum(to_string = "pink", serialize = "purple")]
    Pink,
    Red,
    White,
    Yellow,
}

impl RouteColor {
    #[inline]
    pub fn is_grey(&self) -> bool {
        *self == RouteColor::Grey
    }

    /// The train card color matching this route, or `None` for grey routes.
    ///
    /// # Examples:
    /// ```
    /// use ttr_engine::train_color::{RouteColor, TrainColor};
    ///
    /// assert_eq!(RouteColor::Red.train_color(), Some(TrainColor::Red));
    /// assert_eq!(RouteColor::Grey.train_color(), None);
    /// ```
    pub fn train_color(&self) -> Option<TrainColor> {
        match self {
            RouteColor::Black => Some(TrainColor::Black),
            RouteColor::Blue => Some(TrainColor::Blue),
            RouteColor::Green => Some(TrainColor::Green),
            RouteColor::Grey => None,
            RouteColor::Orange => Some(TrainColor::Orange),
            RouteColor::Pink => Some(TrainColor::Pink),
            RouteColor::Red => Some(TrainColor::Red),
            RouteColor::White => Some(TrainColor::White),
            RouteColor::Yellow => Some(TrainColor::Yellow),
        }
    }

    /// The route color a non-wild train card pays for. Wild cards have no route counterpart.
    pub fn from_train_color(color: TrainColor) -> Option<RouteColor> {
        match color {
            TrainColor::Black => Some(RouteColor::Black),
            TrainColor::Blue => Some(RouteColor::Blue),
            TrainColor::Green => Some(RouteColor::Green),
            TrainColor::Orange => Some(RouteColor::Orange),
            TrainColor::Pink => Some(RouteColor::Pink),
            TrainColor::Red => Some(RouteColor::Red),
            TrainColor::White => Some(RouteColor::White),
            TrainColor::Wild => None,
            TrainColor::Yellow => Some(RouteColor::Yellow),
        }
    }

    /// Whether cards of `color` can be laid on a route option of this color.
    /// Wild cards always match; grey options match every color.
    ///
    /// # Examples:
    /// ```
    /// use ttr_engine::train_color::{RouteColor, TrainColor};
    ///
    /// assert!(RouteColor::Grey.accepts(TrainColor::Orange));
    /// assert!(RouteColor::Blue.accepts(TrainColor::Wild));
    /// assert!(!RouteColor::Blue.accepts(TrainColor::Red));
    /// ```
    pub fn accepts(&self, color: TrainColor) -> bool {
        color.is_wild() || self.is_grey() || self.train_color() == Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn train_color_to_string() {
        assert_eq!(TrainColor::Orange.to_string(), "orange");
        assert_eq!(TrainColor::Pink.to_string(), "pink");
    }

    #[test]
    fn train_color_to_json() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&TrainColor::Blue)?, r#""blue""#);
        assert_eq!(serde_json::to_string(&TrainColor::Red)?, r#""red""#);
        Ok(())
    }

    #[test]
    fn json_to_train_color() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::from_str::<TrainColor>(r#""wild""#)?,
            TrainColor::Wild
        );
        assert_eq!(
            serde_json::from_str::<TrainColor>(r#""purple""#)?,
            TrainColor::Pink
        );

        Ok(())
    }

    #[test]
    fn invalid_json_to_train_color() {
        assert!(serde_json::from_str::<TrainColor>(r#""turquoise""#).is_err());
    }

    #[test]
    fn parse_train_color() {
        assert_eq!(TrainColor::from_str("Yellow"), Ok(TrainColor::Yellow));
        assert_eq!(TrainColor::from_str("WILD"), Ok(TrainColor::Wild));
        assert_eq!(TrainColor::from_str("purple"), Ok(TrainColor::Pink));
        assert!(TrainColor::from_str("grey").is_err());
    }

    #[test]
    fn parse_route_color() {
        assert_eq!(RouteColor::from_str("grey"), Ok(RouteColor::Grey));
        assert_eq!(RouteColor::from_str("Gray"), Ok(RouteColor::Grey));
        assert_eq!(RouteColor::from_str("purple"), Ok(RouteColor::Pink));
        assert!(RouteColor::from_str("wild").is_err());
    }

    #[test]
    fn eight_non_wild_colors() {
        assert_eq!(
            TrainColor::iter().filter(|color| color.is_not_wild()).count(),
            NUM_NON_WILD_COLORS
        );
        assert_eq!(
            RouteColor::iter().filter(|color| !color.is_grey()).count(),
            NUM_NON_WILD_COLORS
        );
    }

    #[test]
    fn route_and_train_colors_map_back_and_forth() {
        for color in RouteColor::iter().filter(|color| !color.is_grey()) {
            let train_color = color.train_color().unwrap();
            assert_eq!(RouteColor::from_train_color(train_color), Some(color));
        }
        assert_eq!(RouteColor::from_train_color(TrainColor::Wild), None);
    }
}
