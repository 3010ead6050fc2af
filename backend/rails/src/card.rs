use crate::error::RulesError;

use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::iter::repeat;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::trace;

pub const NUM_VISIBLE_TRAIN_CARDS: usize = 5;
const NUM_WILD_CARDS: usize = 14;
const NUM_NON_WILD_CARDS: usize = 12;
const WILD_CARD_LIMIT: usize = 3;

/// Represents the different variants of wagon cards.
///
/// A colored requirement on a route is expressed as `Option<TrainColor>`:
/// `None` stands for a gray route, which any single color can pay for.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrainColor {
    Black,
    Blue,
    Green,
    Orange,
    Pink,
    Red,
    White,
    Yellow,
    /// Also known as the *Locomotive*.
    /// This is a special card that matches with any color.
    Wild,
}

impl TrainColor {
    /// Whether the current color is wild, i.e. matches with any color.
    ///
    /// # Examples:
    /// ```
    /// use rails::card::TrainColor;
    ///
    /// assert!(!TrainColor::Black.is_wild());
    /// assert!(TrainColor::Wild.is_wild());
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

    /// Iterates over the eight ordinary colors, leaving the wild card out.
    pub fn non_wild() -> impl Iterator<Item = TrainColor> {
        TrainColor::iter().filter(TrainColor::is_not_wild)
    }
}

/// Human-readable name of a color requirement, as shown to players.
///
/// # Examples:
/// ```
/// use rails::card::{describe_requirement, TrainColor};
///
/// assert_eq!(describe_requirement(Some(TrainColor::Red)), "red");
/// assert_eq!(describe_requirement(None), "any color");
/// ```
pub fn describe_requirement(color: Option<TrainColor>) -> String {
    match color {
        Some(color) => color.to_string(),
        None => String::from("any color"),
    }
}

/// The shared piles of wagon cards, as seen from the capture rules.
///
/// The rules only ever hold on to a single drawn card before handing it back through
/// [`WagonSupply::discard_wagon_card`].
pub trait WagonSupply {
    /// Draws the top card of the closed deck.
    ///
    /// Returns `None` once the deck is exhausted and nothing can be reshuffled into it.
    fn draw_wagon_card(&mut self) -> Option<TrainColor>;

    /// Puts a spent card on the discard pile.
    fn discard_wagon_card(&mut self, card: TrainColor);

    /// The cards currently lying face up.
    fn visible_wagon_cards(&self) -> SmallVec<[TrainColor; NUM_VISIBLE_TRAIN_CARDS]>;

    /// Takes a face-up card of the given color, and refills its slot from the closed deck.
    ///
    /// Returns whether the face-up row had to be reshuffled afterwards.
    fn remove_visible_wagon_card(&mut self, card: TrainColor) -> Result<bool, RulesError>;
}

/// Entity in charge of dealing as well as shuffling wagon cards.
#[derive(Debug)]
pub struct CardDealer {
    visible_train_cards: SmallVec<[Option<TrainColor>; NUM_VISIBLE_TRAIN_CARDS]>,
    close_train_card_deck: Vec<TrainColor>,
    discarded_train_card_deck: Vec<TrainColor>,
}

impl CardDealer {
    /// Creates a new `CardDealer`, which starts with all decks shuffled and in a valid state.
    /// This means that the visible row does not exceed the limit number of wild cards (3).
    ///
    /// # Example
    /// ```
    /// use rails::card::{CardDealer, WagonSupply};
    ///
    /// let card_dealer = CardDealer::new();
    /// assert_eq!(card_dealer.visible_wagon_cards().len(), 5);
    /// ```
    pub fn new() -> Self {
        let mut all_train_cards = Vec::with_capacity(110);

        for color in TrainColor::iter() {
            let num_of_train_cards_per_color = if color.is_wild() {
                NUM_WILD_CARDS
            } else {
                NUM_NON_WILD_CARDS
            };
            all_train_cards.extend(repeat(color).take(num_of_train_cards_per_color));
        }

        all_train_cards.shuffle(&mut thread_rng());

        let close_train_card_deck = all_train_cards.split_off(NUM_VISIBLE_TRAIN_CARDS);
        let visible_train_cards = all_train_cards.into_iter().map(Some).collect();

        let mut new_card_dealer = Self {
            visible_train_cards,
            close_train_card_deck,
            discarded_train_card_deck: Vec::new(),
        };

        new_card_dealer.maybe_reshuffle_visible_train_cards();

        new_card_dealer
    }

    /// Creates a `CardDealer` from an explicit state, e.g. to replay a recorded game.
    ///
    /// The last card of `close_train_card_deck` is the top of the deck.
    /// No shuffling of any kind happens here.
    pub fn with_decks(
        visible_train_cards: impl IntoIterator<Item = TrainColor>,
        close_train_card_deck: Vec<TrainColor>,
        discarded_train_card_deck: Vec<TrainColor>,
    ) -> Self {
        Self {
            visible_train_cards: visible_train_cards
                .into_iter()
                .take(NUM_VISIBLE_TRAIN_CARDS)
                .map(Some)
                .collect(),
            close_train_card_deck,
            discarded_train_card_deck,
        }
    }

    fn should_reshuffle_visible_train_cards(&self) -> bool {
        let num_wild_cards = self
            .visible_train_cards
            .iter()
            .flatten()
            .filter(|color| color.is_wild())
            .count();

        // If there is less than 3 wild cards face up, then we should not reshuffle.
        if num_wild_cards < WILD_CARD_LIMIT {
            return false;
        }

        // Otherwise, we should reshuffle as long as there is at least 3 non-wild card in any decks.
        // If we did not verify that, we could end up reshuffling ad infinitum.
        let total_non_wild_cards = self
            .visible_train_cards
            .iter()
            .flatten()
            .chain(&self.close_train_card_deck)
            .chain(&self.discarded_train_card_deck)
            .filter(|color| color.is_not_wild())
            .take(WILD_CARD_LIMIT)
            .count();

        total_non_wild_cards >= WILD_CARD_LIMIT
    }

    fn maybe_reshuffle_visible_train_cards(&mut self) -> bool {
        if !self.should_reshuffle_visible_train_cards() {
            return false;
        }

        // Move the face-up cards to the discard pile, then deal a fresh row.
        self.discarded_train_card_deck
            .extend(self.visible_train_cards.drain(..).flatten());
        self.refill_visible_train_cards();

        self.maybe_reshuffle_and_swap_discarded_deck();

        // The closed deck may have run out midway.
        self.refill_visible_train_cards();

        // The new row can again hold three or more wild cards.
        self.maybe_reshuffle_visible_train_cards();

        true
    }

    fn refill_visible_train_cards(&mut self) {
        while self.visible_train_cards.len() < NUM_VISIBLE_TRAIN_CARDS {
            match self.close_train_card_deck.pop() {
                Some(color) => self.visible_train_cards.push(Some(color)),
                None => break,
            }
        }
    }

    #[inline]
    fn maybe_reshuffle_and_swap_discarded_deck(&mut self) {
        if !self.close_train_card_deck.is_empty() || self.discarded_train_card_deck.is_empty() {
            return;
        }

        trace!(
            cards = self.discarded_train_card_deck.len(),
            "reshuffling the discard pile into the closed deck"
        );
        self.discarded_train_card_deck.shuffle(&mut thread_rng());

        std::mem::swap(
            &mut self.close_train_card_deck,
            &mut self.discarded_train_card_deck,
        );
    }

    /// Accessor to the close train card deck.
    ///
    /// Should only be used for testing!
    pub fn get_close_train_card_deck(&self) -> &Vec<TrainColor> {
        &self.close_train_card_deck
    }

    /// Accessor to the discarded train card deck.
    ///
    /// Should only be used for testing!
    pub fn get_discarded_train_card_deck(&self) -> &Vec<TrainColor> {
        &self.discarded_train_card_deck
    }
}

impl Default for CardDealer {
    fn default() -> Self {
        Self::new()
    }
}

impl WagonSupply for CardDealer {
    /// Draws from the top of the close train card deck.
    ///
    /// If the close deck is empty after the draw is done, it will re-shuffle the discarded deck and swap it.
    fn draw_wagon_card(&mut self) -> Option<TrainColor> {
        let card_drawn = self.close_train_card_deck.pop()?;
        self.maybe_reshuffle_and_swap_discarded_deck();

        Some(card_drawn)
    }

    /// Adds the given card to the discard pile.
    ///
    /// If the close train card deck is empty, we re-shuffle the discarded deck and swap it.
    fn discard_wagon_card(&mut self, card: TrainColor) {
        self.discarded_train_card_deck.push(card);

        self.maybe_reshuffle_and_swap_discarded_deck();
    }

    fn visible_wagon_cards(&self) -> SmallVec<[TrainColor; NUM_VISIBLE_TRAIN_CARDS]> {
        self.visible_train_cards.iter().flatten().copied().collect()
    }

    /// If the closed deck is empty, the slot is left empty and no re-shuffle occurs.
    fn remove_visible_wagon_card(&mut self, card: TrainColor) -> Result<bool, RulesError> {
        let slot = self
            .visible_train_cards
            .iter()
            .position(|visible| *visible == Some(card))
            .ok_or(RulesError::CardNotVisible(card))?;

        self.visible_train_cards[slot] = self.draw_wagon_card();

        Ok(self.maybe_reshuffle_visible_train_cards())
    }
}
