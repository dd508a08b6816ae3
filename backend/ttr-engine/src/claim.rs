//! Rules deciding whether, and how, a hand of train cards pays for a route.
//!
//! Everything here is pure: nothing is mutated until [`ClaimCost::pay`] is called with a hand
//! that was already validated against the cost.

use crate::card::Hand;
use crate::city::CityToCity;
use crate::error::{GameError, GameResult};
use crate::train_color::{RouteColor, TrainColor};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Everything a player specifies to claim a route.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ClaimRequest {
    pub route: CityToCity,
    /// Which color option of the route to claim.
    pub route_color: RouteColor,
    /// The color of the non-wild cards played. Ignored if no such card is played.
    pub played_color: TrainColor,
    pub num_color_cards: u8,
    pub num_wild_cards: u8,
}

/// The cards a player gives up to claim a route.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ClaimCost {
    pub color: TrainColor,
    pub num_color_cards: u8,
    pub num_wild_cards: u8,
}

impl ClaimCost {
    /// Takes the cards out of the hand, and returns them so they can be discarded.
    ///
    /// The hand is untouched if it does not hold every card.
    pub fn pay(&self, hand: &mut Hand) -> GameResult<Vec<TrainColor>> {
        self.check_hand(hand)?;

        hand.remove(self.color, self.num_color_cards)?;
        hand.remove(TrainColor::Wild, self.num_wild_cards)?;

        let mut cards = vec![self.color; usize::from(self.num_color_cards)];
        cards.extend(std::iter::repeat(TrainColor::Wild).take(usize::from(self.num_wild_cards)));
        Ok(cards)
    }

    fn check_hand(&self, hand: &Hand) -> GameResult<()> {
        for (color, requested) in [
            (self.color, self.num_color_cards),
            (TrainColor::Wild, self.num_wild_cards),
        ] {
            let available = hand.count(color);
            if requested > available {
                return Err(GameError::NotEnoughCards {
                    color,
                    requested,
                    available,
                });
            }
        }

        Ok(())
    }
}

/// Whether `hand` can pay for a route of `length` in at least one of its color options.
///
/// A colored option needs that many cards of its color, topped up by wild cards. A grey option
/// needs that many cards of any single color, also topped up by wild cards.
///
/// # Example
/// ```
/// use ttr_engine::card::Hand;
/// use ttr_engine::claim::can_claim;
/// use ttr_engine::train_color::{RouteColor, TrainColor};
///
/// let hand = Hand::from_counts([(TrainColor::Red, 2), (TrainColor::Wild, 1)]);
///
/// assert!(can_claim(&hand, &[RouteColor::Red], 3));
/// assert!(!can_claim(&hand, &[RouteColor::Red], 4));
/// assert!(can_claim(&hand, &[RouteColor::Blue, RouteColor::Grey], 3));
/// ```
pub fn can_claim(hand: &Hand, colors: &[RouteColor], length: u8) -> bool {
    colors
        .iter()
        .any(|color| can_claim_color(hand, *color, length))
}

/// Whether `hand` can pay for a route of `length` in the given color option.
pub fn can_claim_color(hand: &Hand, color: RouteColor, length: u8) -> bool {
    let num_usable_cards = match color.train_color() {
        Some(train_color) => hand.count(train_color),
        None => hand.max_non_wild(),
    };

    u16::from(num_usable_cards) + u16::from(hand.num_wilds()) >= u16::from(length)
}

/// The color options of a route that `hand` can currently pay for.
pub fn claimable_colors(hand: &Hand, colors: &[RouteColor], length: u8) -> SmallVec<[RouteColor; 2]> {
    colors
        .iter()
        .copied()
        .filter(|color| can_claim_color(hand, *color, length))
        .collect()
}

/// Validates the cards a player wants to play on a route option of `route_color` and `length`.
///
/// The numbers of cards must add up to `length`, the played color must fit the route, and the hand
/// must hold every card.
///
/// # Example
/// ```
/// use ttr_engine::card::Hand;
/// use ttr_engine::claim::resolve_cost;
/// use ttr_engine::train_color::{RouteColor, TrainColor};
///
/// let hand = Hand::from_counts([(TrainColor::Orange, 3), (TrainColor::Wild, 2)]);
///
/// // A grey route of length 4 paid with 3 orange cards and a wild card.
/// let cost = resolve_cost(&hand, RouteColor::Grey, TrainColor::Orange, 3, 1, 4).unwrap();
/// assert_eq!(cost.num_wild_cards, 1);
///
/// assert!(resolve_cost(&hand, RouteColor::Grey, TrainColor::Orange, 3, 0, 4).is_err());
/// assert!(resolve_cost(&hand, RouteColor::Red, TrainColor::Orange, 2, 2, 4).is_err());
/// ```
pub fn resolve_cost(
    hand: &Hand,
    route_color: RouteColor,
    played_color: TrainColor,
    num_color_cards: u8,
    num_wild_cards: u8,
    length: u8,
) -> GameResult<ClaimCost> {
    if num_color_cards > 0 && (played_color.is_wild() || !route_color.accepts(played_color)) {
        return Err(GameError::ColorMismatch {
            route_color,
            played: played_color,
        });
    }

    let provided = num_color_cards.saturating_add(num_wild_cards);
    if provided != length {
        return Err(GameError::WrongNumberOfCards { length, provided });
    }

    let cost = ClaimCost {
        // Without any colored card, only wild cards are at stake.
        color: if num_color_cards > 0 {
            played_color
        } else {
            TrainColor::Wild
        },
        num_color_cards,
        num_wild_cards,
    };
    cost.check_hand(hand)?;

    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use TrainColor::*;

    #[test]
    fn can_claim_colored_route() {
        let hand = Hand::from_counts([(Red, 2), (Wild, 1)]);

        assert!(can_claim(&hand, &[RouteColor::Red], 3));
        assert!(!can_claim(&hand, &[RouteColor::Red], 4));
        assert!(!can_claim(&hand, &[RouteColor::Blue], 2));
        assert!(can_claim(&hand, &[RouteColor::Blue], 1));
    }

    #[test]
    fn can_claim_grey_route_with_best_color() {
        let hand = Hand::from_counts([(Blue, 1), (Yellow, 4), (Wild, 2)]);

        assert!(can_claim(&hand, &[RouteColor::Grey], 6));
        assert!(!can_claim(&hand, &[RouteColor::Grey], 7));
    }

    #[test]
    fn can_claim_with_wilds_only() {
        let hand = Hand::from_counts([(Wild, 3)]);

        assert!(can_claim(&hand, &[RouteColor::Grey], 3));
        assert!(can_claim(&hand, &[RouteColor::Pink], 3));
        assert!(!can_claim(&hand, &[RouteColor::Pink], 4));
    }

    #[test]
    fn can_claim_any_parallel_option() {
        let hand = Hand::from_counts([(Green, 5)]);

        assert!(can_claim(&hand, &[RouteColor::Pink, RouteColor::Green], 5));
        assert_eq!(
            claimable_colors(&hand, &[RouteColor::Pink, RouteColor::Green], 5).into_vec(),
            vec![RouteColor::Green]
        );
        assert!(!can_claim(&hand, &[], 1));
    }

    #[test]
    fn resolve_cost_colored_route() {
        let hand = Hand::from_counts([(Red, 2), (Wild, 1)]);

        assert_eq!(
            resolve_cost(&hand, RouteColor::Red, Red, 2, 1, 3),
            Ok(ClaimCost {
                color: Red,
                num_color_cards: 2,
                num_wild_cards: 1,
            })
        );
        assert_eq!(
            resolve_cost(&hand, RouteColor::Red, Blue, 2, 1, 3),
            Err(GameError::ColorMismatch {
                route_color: RouteColor::Red,
                played: Blue,
            })
        );
    }

    #[test]
    fn resolve_cost_wrong_number_of_cards() {
        let hand = Hand::from_counts([(Red, 5), (Wild, 1)]);

        assert_eq!(
            resolve_cost(&hand, RouteColor::Red, Red, 3, 1, 3),
            Err(GameError::WrongNumberOfCards {
                length: 3,
                provided: 4,
            })
        );
        assert_eq!(
            resolve_cost(&hand, RouteColor::Red, Red, 1, 0, 3),
            Err(GameError::WrongNumberOfCards {
                length: 3,
                provided: 1,
            })
        );
    }

    #[test]
    fn resolve_cost_not_enough_cards() {
        let hand = Hand::from_counts([(Red, 2), (Wild, 1)]);

        assert_eq!(
            resolve_cost(&hand, RouteColor::Grey, Red, 3, 0, 3),
            Err(GameError::NotEnoughCards {
                color: Red,
                requested: 3,
                available: 2,
            })
        );
        assert_eq!(
            resolve_cost(&hand, RouteColor::Grey, Red, 1, 2, 3),
            Err(GameError::NotEnoughCards {
                color: Wild,
                requested: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn resolve_cost_wild_cards_only() {
        let hand = Hand::from_counts([(Wild, 2)]);

        // The played color does not matter when no colored card is played.
        assert_eq!(
            resolve_cost(&hand, RouteColor::Orange, Blue, 0, 2, 2),
            Ok(ClaimCost {
                color: Wild,
                num_color_cards: 0,
                num_wild_cards: 2,
            })
        );
        assert_eq!(
            resolve_cost(&hand, RouteColor::Orange, Wild, 2, 0, 2),
            Err(GameError::ColorMismatch {
                route_color: RouteColor::Orange,
                played: Wild,
            })
        );
    }

    #[test]
    fn pay_debits_hand() {
        let mut hand = Hand::from_counts([(Black, 4), (Wild, 2)]);
        let cost = resolve_cost(&hand, RouteColor::Grey, Black, 3, 1, 4).unwrap();

        let mut cards = cost.pay(&mut hand).unwrap();
        cards.sort();

        assert_eq!(cards, vec![Black, Black, Black, Wild]);
        assert_eq!(hand.count(Black), 1);
        assert_eq!(hand.num_wilds(), 1);
    }

    #[test]
    fn pay_wild_cards_only() {
        let mut hand = Hand::from_counts([(Wild, 2), (Pink, 1)]);
        let cost = resolve_cost(&hand, RouteColor::Pink, Pink, 0, 2, 2).unwrap();

        assert_eq!(cost.pay(&mut hand), Ok(vec![Wild, Wild]));
        assert_eq!(hand.total(), 1);
    }

    #[test]
    fn pay_leaves_hand_untouched_on_error() {
        let mut hand = Hand::from_counts([(Black, 4), (Wild, 1)]);
        let cost = ClaimCost {
            color: Black,
            num_color_cards: 2,
            num_wild_cards: 2,
        };

        assert!(cost.pay(&mut hand).is_err());
        assert_eq!(hand.count(Black), 4);
        assert_eq!(hand.num_wilds(), 1);
    }
}
