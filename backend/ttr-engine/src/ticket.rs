use crate::city::{City, CityToCity};
use crate::config::GameConfig;
use crate::data;
use crate::error::{DataError, GameError, GameResult};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Most offers hold three tickets.
pub type TicketOffer = SmallVec<[Ticket; 3]>;

/// Encapsulates information about a destination ticket.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Ticket {
    /// The two cities that must be connected to fulfill the ticket.
    pub destination: CityToCity,
    /// How many points are granted once this ticket is fulfilled.
    /// If not fulfilled, the same amount may rather be substracted.
    pub points: u8,
}

/// Convenience macro to generate a ticket.
#[cfg(test)]
macro_rules! ticket {
    ($start:expr, $end:expr, $points:literal) => {
        $crate::ticket::Ticket {
            destination: (
                $crate::city::City::new($start),
                $crate::city::City::new($end),
            ),
            points: $points,
        }
    };
}

#[cfg(test)]
pub(crate) use ticket;

impl Ticket {
    pub fn new(start: City, end: City, points: u8) -> Self {
        Self {
            destination: (start, end),
            points,
        }
    }
}

/// A ticket kept by a player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OwnedTicket {
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Whether the player's routes connect both cities. Informational only:
    /// final scoring checks the player's routes again.
    pub completed: bool,
}

impl From<Ticket> for OwnedTicket {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket,
            completed: false,
        }
    }
}

/// Entity in charge of dealing, collecting and shuffling destination tickets.
///
/// Tickets are dealt from the top of the pool. Once the pool is empty, the discarded tickets are
/// shuffled back into it.
#[derive(Debug)]
pub struct TicketDealer {
    pool: Vec<Ticket>,
    discarded: Vec<Ticket>,
    num_tickets_dealt: usize,
    rng: StdRng,
}

impl TicketDealer {
    /// Creates a dealer that shuffles the given tickets into its pool.
    pub fn new(tickets: Vec<Ticket>, config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng(tickets, config.num_tickets_dealt, rng)
    }

    fn with_rng(mut tickets: Vec<Ticket>, num_tickets_dealt: usize, mut rng: StdRng) -> Self {
        tickets.shuffle(&mut rng);

        Self {
            pool: tickets,
            discarded: Vec::new(),
            num_tickets_dealt,
            rng,
        }
    }

    /// Creates a dealer holding the tickets of the standard US map.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::config::GameConfig;
    /// use ttr_engine::map::RouteGraph;
    /// use ttr_engine::ticket::TicketDealer;
    ///
    /// let map = RouteGraph::us_map().unwrap();
    /// let ticket_dealer = TicketDealer::us_tickets(&map.cities().cloned().collect(), &GameConfig::default()).unwrap();
    ///
    /// assert_eq!(ticket_dealer.num_tickets_left_to_deal(), 30);
    /// ```
    pub fn us_tickets(
        known_cities: &BTreeSet<City>,
        config: &GameConfig,
    ) -> Result<Self, DataError> {
        Self::from_source(data::US_TICKETS, known_cities, config)
    }

    /// Creates a dealer from tickets in the data format described in [`crate::data`].
    pub fn from_source(
        source: &str,
        known_cities: &BTreeSet<City>,
        config: &GameConfig,
    ) -> Result<Self, DataError> {
        Ok(Self::new(data::parse_tickets(source, known_cities)?, config))
    }

    /// Deals up to `n` tickets. Reshuffles the discarded tickets into the pool whenever it runs
    /// out, and stops early if there are no tickets left anywhere.
    pub fn deal_tickets(&mut self, n: usize) -> Vec<Ticket> {
        let mut dealt = Vec::with_capacity(n);

        while dealt.len() < n {
            if self.pool.is_empty() && !self.reshuffle_discarded() {
                break;
            }

            if let Some(ticket) = self.pool.pop() {
                dealt.push(ticket);
            }
        }

        debug!(requested = n, dealt = dealt.len(), "Dealt tickets");
        dealt
    }

    /// Deals the usual number of tickets to choose from, or what is left if there are fewer.
    /// An empty offer means there are no tickets left anywhere.
    pub fn offer_tickets(&mut self) -> TicketOffer {
        let offer: TicketOffer = self.deal_tickets(self.num_tickets_dealt).into();

        if offer.is_empty() {
            warn!("No tickets left to offer");
        }

        offer
    }

    /// Splits an offer in two: copies of the selected tickets are returned, copies of the others
    /// are discarded. The caller is left to drop the offer itself once this succeeds.
    ///
    /// `selection` holds indices into the `offer`, which must be distinct. At least `min_to_select`
    /// tickets must be selected, or the whole offer if it is smaller than that. Nothing is
    /// discarded if the selection is invalid.
    ///
    /// # Example
    /// ```
    /// use ttr_engine::config::GameConfig;
    /// use ttr_engine::map::RouteGraph;
    /// use ttr_engine::ticket::TicketDealer;
    ///
    /// let map = RouteGraph::us_map().unwrap();
    /// let mut ticket_dealer = TicketDealer::us_tickets(&map.cities().cloned().collect(), &GameConfig::default()).unwrap();
    ///
    /// let offer = ticket_dealer.offer_tickets();
    /// assert!(ticket_dealer.resolve_selection(&offer, &[0], 2).is_err());
    ///
    /// let kept = ticket_dealer.resolve_selection(&offer, &[2, 0], 2).unwrap();
    /// assert_eq!(kept.len(), 2);
    /// assert_eq!(ticket_dealer.num_tickets_left_to_deal(), 28);
    /// ```
    pub fn resolve_selection(
        &mut self,
        offer: &[Ticket],
        selection: &[usize],
        min_to_select: usize,
    ) -> GameResult<Vec<Ticket>> {
        Self::validate_selection(offer.len(), selection, min_to_select)?;

        let mut kept = Vec::with_capacity(selection.len());
        for (index, ticket) in offer.iter().enumerate() {
            if selection.contains(&index) {
                kept.push(ticket.clone());
            } else {
                self.discard(ticket.clone());
            }
        }

        Ok(kept)
    }

    fn validate_selection(
        offered: usize,
        selection: &[usize],
        min_to_select: usize,
    ) -> GameResult<()> {
        if offered == 0 {
            return Err(GameError::NoPendingTickets);
        }

        let mut seen = BTreeSet::new();
        for &index in selection {
            if index >= offered {
                return Err(GameError::TicketNotOffered { index, offered });
            }

            if !seen.insert(index) {
                return Err(GameError::DuplicateTicketSelection(index));
            }
        }

        let min = min_to_select.min(offered);
        if selection.len() < min {
            return Err(GameError::TooFewTicketsSelected {
                selected: selection.len(),
                min,
            });
        }

        Ok(())
    }

    /// Puts a ticket in the discard pile. It will come back once the pool is exhausted.
    pub fn discard(&mut self, ticket: Ticket) {
        self.discarded.push(ticket);
    }

    /// Tickets that can still be dealt, counting the discarded ones.
    #[inline]
    pub fn num_tickets_left_to_deal(&self) -> usize {
        self.pool.len() + self.discarded.len()
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn discarded_size(&self) -> usize {
        self.discarded.len()
    }

    /// Mutable accessor to the ticket pool. The top of the pool is the last element.
    ///
    /// Should only be used for testing!
    pub fn get_mut_pool(&mut self) -> &mut Vec<Ticket> {
        &mut self.pool
    }

    fn reshuffle_discarded(&mut self) -> bool {
        if self.discarded.is_empty() {
            return false;
        }

        self.discarded.shuffle(&mut self.rng);
        std::mem::swap(&mut self.pool, &mut self.discarded);

        debug!(size = self.pool.len(), "Reshuffled discarded tickets");
        true
    }
}
