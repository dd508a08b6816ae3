use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::train_color::TrainColor;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::iter::repeat;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// The face-up train cards. Five on a standard game.
pub type DrawPile = SmallVec<[TrainColor; 5]>;

/// The train cards held by a player, counted per color.
///
/// Every color has an entry at all times, possibly zero.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Hand(BTreeMap<TrainColor, u8>);

impl Default for Hand {
    fn default() -> Self {
        Self(TrainColor::iter().map(|color| (color, 0)).collect())
    }
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hand holding `count` cards of each given color.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::card::Hand;
    /// use ttr_engine::train_color::TrainColor;
    ///
    /// let hand = Hand::from_counts([(TrainColor::Red, 2), (TrainColor::Wild, 1)]);
    /// assert_eq!(hand.count(TrainColor::Red), 2);
    /// assert_eq!(hand.count(TrainColor::Blue), 0);
    /// assert_eq!(hand.total(), 3);
    /// ```
    pub fn from_counts(counts: impl IntoIterator<Item = (TrainColor, u8)>) -> Self {
        let mut hand = Self::default();
        for (color, count) in counts {
            hand.add_many(color, count);
        }
        hand
    }

    #[inline]
    pub fn add(&mut self, color: TrainColor) {
        self.add_many(color, 1);
    }

    pub fn add_many(&mut self, color: TrainColor, count: u8) {
        self.0
            .entry(color)
            .and_modify(|held| *held = held.saturating_add(count))
            .or_insert(count);
    }

    /// Takes `count` cards of `color` out of the hand, or fails leaving the hand untouched.
    pub fn remove(&mut self, color: TrainColor, count: u8) -> GameResult<()> {
        let available = self.count(color);
        if available < count {
            return Err(GameError::NotEnoughCards {
                color,
                requested: count,
                available,
            });
        }

        self.0.insert(color, available - count);
        Ok(())
    }

    #[inline]
    pub fn count(&self, color: TrainColor) -> u8 {
        self.0.get(&color).copied().unwrap_or_default()
    }

    #[inline]
    pub fn num_wilds(&self) -> u8 {
        self.count(TrainColor::Wild)
    }

    /// Total number of cards held.
    pub fn total(&self) -> usize {
        self.0.values().map(|count| usize::from(*count)).sum()
    }

    /// The largest number of cards held in a single non-wild color.
    pub fn max_non_wild(&self) -> u8 {
        self.iter()
            .filter(|(color, _)| color.is_not_wild())
            .map(|(_, count)| count)
            .max()
            .unwrap_or_default()
    }

    /// Every color with its count, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (TrainColor, u8)> + '_ {
        self.0.iter().map(|(color, count)| (*color, *count))
    }
}

/// What every player can see of the train cards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardDealerState {
    pub draw_pile: DrawPile,
    pub deck_size: usize,
    pub discarded_size: usize,
}

/// Entity in charge of dealing as well as shuffling train cards.
///
/// Cards move between three piles: the face-down deck, the face-up draw pile, and the discard
/// pile. Cards leave the piles when dealt to players, and come back through [`CardDealer::discard`].
#[derive(Debug)]
pub struct CardDealer {
    draw_pile: DrawPile,
    /// The top of the deck is the last card.
    deck: Vec<TrainColor>,
    discarded: Vec<TrainColor>,
    size_draw_pile: usize,
    max_wilds: usize,
    rng: StdRng,
}

impl CardDealer {
    /// Creates a new `CardDealer`, with all the train cards shuffled and the draw pile dealt.
    /// The draw pile does not hold `max_wilds` wild cards or more.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::card::CardDealer;
    /// use ttr_engine::config::GameConfig;
    ///
    /// let card_dealer = CardDealer::new(&GameConfig::default());
    /// assert_eq!(card_dealer.draw_pile().len(), 5);
    /// assert_eq!(card_dealer.deck_size() + card_dealer.discarded_size(), 105);
    /// ```
    pub fn new(config: &GameConfig) -> Self {
        let mut all_train_cards = Vec::with_capacity(config.total_train_cards());

        for color in TrainColor::iter() {
            let num_of_train_cards_per_color = if color.is_wild() {
                config.num_wild_cards
            } else {
                config.num_cards_per_color
            };
            all_train_cards.extend(repeat(color).take(num_of_train_cards_per_color));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        all_train_cards.shuffle(&mut rng);

        Self::with_rng(all_train_cards, config, rng)
    }

    /// Creates a `CardDealer` whose deck is exactly `deck`, with its top being the last card.
    /// The draw pile is then dealt from that deck, unshuffled.
    pub fn with_deck(deck: Vec<TrainColor>, config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng(deck, config, rng)
    }

    fn with_rng(deck: Vec<TrainColor>, config: &GameConfig, rng: StdRng) -> Self {
        let mut card_dealer = Self {
            draw_pile: SmallVec::new(),
            deck,
            discarded: Vec::new(),
            size_draw_pile: config.size_draw_pile,
            max_wilds: config.max_wilds,
            rng,
        };

        card_dealer.refill_draw_pile();
        card_dealer
    }

    /// Deals the top card of the deck.
    ///
    /// If the deck is empty, the discard pile is shuffled and becomes the deck first.
    /// Fails only if both are empty.
    pub fn deal_card(&mut self) -> GameResult<TrainColor> {
        if self.deck.is_empty() {
            self.reshuffle_discarded();
        }

        self.deck.pop().ok_or(GameError::DeckExhausted)
    }

    /// Deals `n` cards at once. Nothing is dealt if fewer than `n` cards are left in the deck and
    /// discard pile combined.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::card::CardDealer;
    /// use ttr_engine::config::GameConfig;
    ///
    /// let mut card_dealer = CardDealer::new(&GameConfig::default());
    ///
    /// assert_eq!(card_dealer.deal_cards(4).map(|cards| cards.len()), Ok(4));
    /// assert!(card_dealer.deal_cards(200).is_err());
    /// assert_eq!(card_dealer.deck_size(), 101);
    /// ```
    pub fn deal_cards(&mut self, n: usize) -> GameResult<Vec<TrainColor>> {
        if self.deck.len() + self.discarded.len() < n {
            return Err(GameError::DeckExhausted);
        }

        (0..n).map(|_| self.deal_card()).collect()
    }

    /// Takes the given card out of the draw pile, then refills the draw pile.
    pub fn pick_face_up_card(&mut self, card: TrainColor) -> GameResult<TrainColor> {
        let index = self
            .draw_pile
            .iter()
            .position(|face_up| *face_up == card)
            .ok_or(GameError::CardNotInDrawPile(card))?;

        let picked = self.draw_pile.remove(index);
        self.refill_draw_pile();

        Ok(picked)
    }

    /// Takes the top card of the deck. Same as [`CardDealer::deal_card`].
    #[inline]
    pub fn pick_face_down_card(&mut self) -> GameResult<TrainColor> {
        self.deal_card()
    }

    /// Adds the given train cards to the discard pile, then refills the draw pile if it is short.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::card::CardDealer;
    /// use ttr_engine::config::GameConfig;
    /// use ttr_engine::train_color::TrainColor;
    ///
    /// let mut card_dealer = CardDealer::new(&GameConfig::default());
    /// card_dealer.discard([TrainColor::Red, TrainColor::Wild]);
    ///
    /// assert_eq!(card_dealer.discarded_size(), 2);
    /// ```
    pub fn discard(&mut self, cards: impl IntoIterator<Item = TrainColor>) {
        // Note that insertion order in the discard pile does not matter.
        self.discarded.extend(cards);

        if self.draw_pile.len() < self.size_draw_pile {
            self.refill_draw_pile();
        }
    }

    /// Deals cards into the draw pile until it is full or no card is left.
    ///
    /// Whenever the draw pile shows `max_wilds` wild cards, it is discarded altogether and dealt
    /// again. This only happens if a new deal could show fewer wild cards, which needs enough
    /// non-wild cards left across all piles; otherwise the redeal could go on forever.
    fn refill_draw_pile(&mut self) {
        loop {
            while self.draw_pile.len() < self.size_draw_pile {
                match self.deal_card() {
                    Ok(card) => self.draw_pile.push(card),
                    Err(_) => break,
                }
            }

            if self.num_face_up_wilds() < self.max_wilds {
                return;
            }

            if !self.can_redeal_draw_pile() {
                warn!(
                    wilds = self.num_face_up_wilds(),
                    "Too many face-up wild cards, but not enough other cards left to redeal"
                );
                return;
            }

            debug!(
                wilds = self.num_face_up_wilds(),
                "Too many face-up wild cards, redealing the draw pile"
            );
            self.discarded.extend(self.draw_pile.drain(..));
        }
    }

    fn num_face_up_wilds(&self) -> usize {
        self.draw_pile.iter().filter(|card| card.is_wild()).count()
    }

    /// Whether some deal of the draw pile holds fewer than `max_wilds` wild cards, that is at
    /// least `num_dealt - max_wilds + 1` non-wild cards.
    fn can_redeal_draw_pile(&self) -> bool {
        let num_dealt = self.size_draw_pile.min(self.num_cards());
        let num_non_wilds = self
            .draw_pile
            .iter()
            .chain(&self.deck)
            .chain(&self.discarded)
            .filter(|card| card.is_not_wild())
            .count();

        num_non_wilds + self.max_wilds > num_dealt
    }

    fn reshuffle_discarded(&mut self) {
        if !self.deck.is_empty() || self.discarded.is_empty() {
            return;
        }

        self.discarded.shuffle(&mut self.rng);
        std::mem::swap(&mut self.deck, &mut self.discarded);

        debug!(size = self.deck.len(), "Reshuffled the discard pile into the deck");
    }

    /// Whether a player who just drew a card could draw a second one.
    ///
    /// A face-up wild card cannot be taken as a second draw, so if nothing but wild cards are
    /// face up and the deck and discard pile are empty, the turn ends early.
    #[inline]
    pub fn can_draw_again(&self) -> bool {
        !self.deck.is_empty()
            || !self.discarded.is_empty()
            || self.draw_pile.iter().any(TrainColor::is_not_wild)
    }

    /// The face-up cards.
    #[inline]
    pub fn draw_pile(&self) -> &[TrainColor] {
        &self.draw_pile
    }

    #[inline]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    #[inline]
    pub fn discarded_size(&self) -> usize {
        self.discarded.len()
    }

    /// Number of cards held by the dealer, across all its piles.
    #[inline]
    pub fn num_cards(&self) -> usize {
        self.draw_pile.len() + self.deck.len() + self.discarded.len()
    }

    /// Mutable accessor to the draw pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_draw_pile(&mut self) -> &mut DrawPile {
        &mut self.draw_pile
    }

    /// Mutable accessor to the deck. The top of the deck is the last card.
    ///
    /// Should only be used for testing!
    pub fn get_mut_deck(&mut self) -> &mut Vec<TrainColor> {
        &mut self.deck
    }

    /// Mutable accessor to the discard pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_discarded(&mut self) -> &mut Vec<TrainColor> {
        &mut self.discarded
    }

    pub fn get_state(&self) -> CardDealerState {
        CardDealerState {
            draw_pile: self.draw_pile.clone(),
            deck_size: self.deck.len(),
            discarded_size: self.discarded.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    use TrainColor::*;

    fn seeded_config() -> GameConfig {
        GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    fn count_per_color(card_dealer: &CardDealer) -> HashMap<TrainColor, usize> {
        let mut num_train_cards_per_color = HashMap::new();
        for train_card in card_dealer
            .draw_pile
            .iter()
            .chain(&card_dealer.deck)
            .chain(&card_dealer.discarded)
        {
            *num_train_cards_per_color.entry(*train_card).or_insert(0) += 1;
        }
        num_train_cards_per_color
    }

    // Tests for `Hand`.

    #[test]
    fn new_hand_has_every_color() {
        let hand = Hand::new();

        assert_eq!(hand.iter().count(), 9);
        assert_eq!(hand.total(), 0);
        assert_eq!(hand.max_non_wild(), 0);
    }

    #[test]
    fn hand_remove() {
        let mut hand = Hand::from_counts([(Red, 2), (Wild, 1)]);

        assert_eq!(
            hand.remove(Red, 3),
            Err(GameError::NotEnoughCards {
                color: Red,
                requested: 3,
                available: 2,
            })
        );
        assert_eq!(hand.count(Red), 2);

        assert_eq!(hand.remove(Red, 2), Ok(()));
        assert_eq!(hand.count(Red), 0);
        assert_eq!(hand.total(), 1);
    }

    #[test]
    fn hand_max_non_wild_ignores_wilds() {
        let hand = Hand::from_counts([(Blue, 2), (Yellow, 3), (Wild, 5)]);

        assert_eq!(hand.max_non_wild(), 3);
        assert_eq!(hand.num_wilds(), 5);
    }

    #[test]
    fn hand_to_json() -> serde_json::Result<()> {
        let hand = Hand::from_counts([(Green, 1)]);

        assert_eq!(
            serde_json::to_string(&hand)?,
            r#"{"black":0,"blue":0,"green":1,"orange":0,"pink":0,"red":0,"white":0,"wild":0,"yellow":0}"#
        );
        Ok(())
    }

    // Tests for `CardDealer`.

    #[test]
    fn new_card_dealer() {
        let card_dealer = CardDealer::new(&GameConfig::default());

        assert_eq!(card_dealer.draw_pile.len(), 5);
        assert!(card_dealer.num_face_up_wilds() < 3);

        // 110 cards total, minus 5 in the draw pile.
        assert_eq!(card_dealer.deck.len() + card_dealer.discarded.len(), 105);

        let num_train_cards_per_color = count_per_color(&card_dealer);
        for color in TrainColor::iter() {
            let expected_num = if color.is_wild() { 14 } else { 12 };
            assert_eq!(num_train_cards_per_color[&color], expected_num);
        }
    }

    #[test]
    fn seeded_card_dealers_are_identical() {
        let first_card_dealer = CardDealer::new(&seeded_config());
        let second_card_dealer = CardDealer::new(&seeded_config());

        assert_eq!(first_card_dealer.deck, second_card_dealer.deck);
        assert_eq!(first_card_dealer.draw_pile, second_card_dealer.draw_pile);
    }

    #[test]
    fn card_dealer_with_deck_deals_from_the_end() {
        let card_dealer = CardDealer::with_deck(
            vec![Red, Red, Blue, Green, Orange, Black, White],
            &seeded_config(),
        );

        assert_eq!(
            card_dealer.draw_pile(),
            &[White, Black, Orange, Green, Blue]
        );
        assert_eq!(card_dealer.deck, vec![Red, Red]);
    }

    #[test]
    fn card_dealer_redeals_too_many_wilds() {
        let card_dealer = CardDealer::with_deck(
            vec![Red, Orange, Black, Green, Blue, Wild, Red, Black, Wild, Wild],
            &seeded_config(),
        );

        // The first five cards were discarded because of the three wild cards.
        assert_eq!(card_dealer.draw_pile(), &[Blue, Green, Black, Orange, Red]);
        assert!(card_dealer.deck.is_empty());
        assert_eq!(card_dealer.discarded.len(), 5);
    }

    #[test]
    fn card_dealer_keeps_wilds_if_redeal_impossible() {
        let card_dealer = CardDealer::with_deck(vec![Red, Wild, Black, Wild, Wild], &seeded_config());

        assert_eq!(card_dealer.draw_pile(), &[Wild, Wild, Black, Wild, Red]);
        assert!(card_dealer.deck.is_empty());
        assert!(card_dealer.discarded.is_empty());
    }

    #[test]
    fn card_dealer_keeps_wilds_with_low_wild_cap() {
        let config = GameConfig {
            max_wilds: 1,
            ..seeded_config()
        };
        assert!(config.validate().is_ok());

        // Any five of these six cards hold at least four wild cards.
        let card_dealer = CardDealer::with_deck(vec![Red, Wild, Wild, Wild, Wild, Wild], &config);

        assert_eq!(card_dealer.draw_pile(), &[Wild; 5]);
        assert_eq!(card_dealer.deck, vec![Red]);
        assert!(card_dealer.discarded.is_empty());
    }

    #[test]
    fn card_dealer_keeps_wilds_with_larger_draw_pile() {
        let config = GameConfig {
            size_draw_pile: 6,
            ..seeded_config()
        };

        // Three non-wild cards are enough for the usual draw pile, but not for six cards.
        let card_dealer = CardDealer::with_deck(
            vec![Red, Black, Blue, Wild, Wild, Wild, Wild, Wild],
            &config,
        );

        assert_eq!(card_dealer.draw_pile(), &[Wild, Wild, Wild, Wild, Wild, Blue]);
        assert_eq!(card_dealer.deck, vec![Red, Black]);
        assert!(card_dealer.discarded.is_empty());
    }

    #[test]
    fn card_dealer_redeals_larger_draw_pile() {
        let config = GameConfig {
            size_draw_pile: 6,
            ..seeded_config()
        };

        let card_dealer = CardDealer::with_deck(
            vec![Red, Blue, Green, Black, Wild, Wild, Wild, Wild, Orange, White],
            &config,
        );

        // The first six cards held four wild cards: they were reshuffled once the deck ran out.
        assert_eq!(&card_dealer.draw_pile()[..4], &[Black, Green, Blue, Red]);
        assert_eq!(card_dealer.draw_pile().len(), 6);
        assert!(card_dealer.num_face_up_wilds() < 3);
        assert_eq!(card_dealer.num_cards(), 10);
    }

    #[test]
    fn card_dealer_wild_cap_holds_after_many_picks() {
        let mut card_dealer = CardDealer::new(&seeded_config());
        let mut hand = Hand::new();

        for _ in 0..60 {
            let card = card_dealer.draw_pile[0];
            hand.add(card_dealer.pick_face_up_card(card).unwrap());

            assert!(card_dealer.num_face_up_wilds() < 3);
            assert_eq!(card_dealer.num_cards() + hand.total(), 110);
        }
    }

    #[test]
    fn card_dealer_deal_card() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        let expected_card = card_dealer.deck.last().copied();
        assert_eq!(card_dealer.deal_card().ok(), expected_card);

        card_dealer.deck = vec![Blue];
        card_dealer.discarded = vec![Red];

        assert_eq!(card_dealer.deal_card(), Ok(Blue));
        assert_eq!(card_dealer.discarded, vec![Red]);

        // The deck is empty: the discard pile is reshuffled into it.
        assert_eq!(card_dealer.deal_card(), Ok(Red));
        assert!(card_dealer.discarded.is_empty());
        assert_eq!(card_dealer.deal_card(), Err(GameError::DeckExhausted));
        assert_eq!(card_dealer.pick_face_down_card(), Err(GameError::DeckExhausted));
    }

    #[test]
    fn card_dealer_deal_cards_is_all_or_nothing() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.deck = vec![Blue, Green];
        card_dealer.discarded = vec![Red];

        assert_eq!(card_dealer.deal_cards(4), Err(GameError::DeckExhausted));
        assert_eq!(card_dealer.deck.len() + card_dealer.discarded.len(), 3);

        let mut cards = card_dealer.deal_cards(3).unwrap();
        cards.sort();
        assert_eq!(cards, vec![Blue, Green, Red]);
    }

    #[test]
    fn card_dealer_pick_face_up_card_not_in_draw_pile() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.draw_pile = smallvec![Blue, Blue, Black, Wild, Wild];

        assert_eq!(
            card_dealer.pick_face_up_card(Red),
            Err(GameError::CardNotInDrawPile(Red))
        );
        assert_eq!(card_dealer.draw_pile.len(), 5);
    }

    #[test]
    fn card_dealer_pick_face_up_card_refills() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.draw_pile = smallvec![Blue, Red, Black, Wild, Wild];
        card_dealer.deck = vec![Yellow, Green];

        assert_eq!(card_dealer.pick_face_up_card(Red), Ok(Red));
        assert_eq!(card_dealer.draw_pile.as_slice(), &[Blue, Black, Wild, Wild, Green]);
        assert_eq!(card_dealer.deck, vec![Yellow]);
    }

    #[test]
    fn card_dealer_pick_face_up_card_empty_deck() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.draw_pile = smallvec![White, Black, Wild, Wild];
        card_dealer.deck.clear();
        card_dealer.discarded.clear();

        assert_eq!(card_dealer.pick_face_up_card(White), Ok(White));
        assert_eq!(card_dealer.draw_pile.as_slice(), &[Black, Wild, Wild]);
    }

    #[test]
    fn card_dealer_pick_face_up_card_redeal() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.draw_pile = smallvec![White, Red, Black, Wild, Wild];
        card_dealer.deck = vec![Blue, Blue, Blue, Blue, Blue, Wild];
        card_dealer.discarded.clear();

        assert_eq!(card_dealer.pick_face_up_card(White), Ok(White));

        assert_eq!(card_dealer.draw_pile.as_slice(), &[Blue; 5]);
        assert_eq!(card_dealer.discarded.len(), 5);
        assert!(card_dealer.deck.is_empty());
    }

    #[test]
    fn card_dealer_discard_with_full_draw_pile() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.deck = vec![Pink];
        card_dealer.discarded.clear();

        card_dealer.discard([Yellow]);
        assert_eq!(card_dealer.deck, vec![Pink]);
        assert_eq!(card_dealer.discarded, vec![Yellow]);
    }

    #[test]
    fn card_dealer_discard_refills_short_draw_pile() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.draw_pile = smallvec![Red, Red];
        card_dealer.deck.clear();
        card_dealer.discarded.clear();

        card_dealer.discard([Yellow, Orange]);
        assert_eq!(card_dealer.draw_pile.len(), 4);
        assert!(card_dealer.deck.is_empty());
        assert!(card_dealer.discarded.is_empty());
    }

    #[test]
    fn card_dealer_can_draw_again() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        assert!(card_dealer.can_draw_again());

        card_dealer.deck.clear();
        card_dealer.discarded.clear();
        card_dealer.draw_pile = smallvec![Wild, Red];
        assert!(card_dealer.can_draw_again());

        card_dealer.draw_pile = smallvec![Wild, Wild];
        assert!(!card_dealer.can_draw_again());

        card_dealer.discarded = vec![Blue];
        assert!(card_dealer.can_draw_again());
    }

    #[test]
    fn card_dealer_state() {
        let mut card_dealer = CardDealer::new(&GameConfig::default());
        card_dealer.draw_pile = smallvec![Wild, Red];
        card_dealer.deck = vec![Blue; 3];
        card_dealer.discarded = vec![Green];

        assert_eq!(
            card_dealer.get_state(),
            CardDealerState {
                draw_pile: smallvec![Wild, Red],
                deck_size: 3,
                discarded_size: 1,
            }
        );
    }
}
