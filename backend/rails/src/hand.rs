use crate::card::{describe_requirement, TrainColor};
use crate::error::RulesError;
use crate::input::{ask, PlayerInput};

use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

/// Cards picked during a single call to [`TrainCards::select_cards`].
pub type SelectedCards = SmallVec<[TrainColor; 8]>;

/// The wagon cards held by a player.
///
/// Besides the hand itself, cards can be *staged*: they are committed to an ongoing tunnel
/// capture, but still belong to the player until the outcome of the tunnel is known.
/// Outside of a tunnel capture, nothing is staged.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainCards {
    /// Maps how many of a train color a player has.
    /// It is guaranteed that the map has at all times key-value pairs for all train colors.
    cards: HashMap<TrainColor, u8>,
    staged: SmallVec<[TrainColor; 8]>,
}

impl Default for TrainCards {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<TrainColor> for TrainCards {
    fn from_iter<I: IntoIterator<Item = TrainColor>>(iter: I) -> Self {
        let mut train_cards = Self::new();
        train_cards.add_all(iter);
        train_cards
    }
}

impl TrainCards {
    pub fn new() -> Self {
        Self {
            cards: HashMap::from_iter(TrainColor::iter().map(|color| (color, 0))),
            staged: SmallVec::new(),
        }
    }

    /// How many cards of the given color are in hand. Staged cards are not counted.
    #[inline]
    pub fn count(&self, color: TrainColor) -> u8 {
        self.cards.get(&color).copied().unwrap_or(0)
    }

    /// How many cards are in hand. Staged cards are not counted.
    pub fn len(&self) -> usize {
        self.cards.values().map(|count| *count as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, color: TrainColor) {
        *self.cards.entry(color).or_insert(0) += 1;
    }

    pub fn add_all(&mut self, cards: impl IntoIterator<Item = TrainColor>) {
        for card in cards {
            self.add(card);
        }
    }

    /// Removes one card of the given color. Returns false if there was none.
    pub fn remove(&mut self, color: TrainColor) -> bool {
        match self.cards.get_mut(&color) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// The cards in hand, sorted by color.
    pub fn to_sorted_vec(&self) -> Vec<TrainColor> {
        TrainColor::iter()
            .flat_map(|color| std::iter::repeat(color).take(self.count(color) as usize))
            .collect()
    }

    #[inline]
    pub fn staged(&self) -> &[TrainColor] {
        &self.staged
    }

    /// Commits a card, already taken out of the hand, to the ongoing tunnel capture.
    pub(crate) fn stage(&mut self, card: TrainColor) {
        self.staged.push(card);
    }

    /// The color actually used by the staged cards: the first non-wild one, or wild if all are.
    pub(crate) fn staged_color(&self) -> TrainColor {
        self.staged
            .iter()
            .copied()
            .find(TrainColor::is_not_wild)
            .unwrap_or(TrainColor::Wild)
    }

    /// Gives every staged card back to the hand.
    pub(crate) fn unstage_all(&mut self) {
        let staged = std::mem::take(&mut self.staged);
        self.add_all(staged);
    }

    /// Takes every staged card away for good.
    pub(crate) fn drain_staged(&mut self) -> SmallVec<[TrainColor; 8]> {
        std::mem::take(&mut self.staged)
    }

    /// Whether `count` cards matching `color` can be paid from this hand.
    ///
    /// A fixed color is paid with cards of that color topped up with wild cards. `None`
    /// accepts any single non-wild color topped up with wild cards, or wild cards only.
    ///
    /// # Example
    /// ```
    /// use rails::card::TrainColor::*;
    /// use rails::hand::TrainCards;
    ///
    /// let cards = TrainCards::from_iter([Red, Red, Blue, Wild]);
    ///
    /// assert!(cards.can_pay(Some(Red), 3));
    /// assert!(!cards.can_pay(Some(Blue), 3));
    /// // Red and blue cannot be mixed.
    /// assert!(!cards.can_pay(None, 4));
    /// assert!(cards.can_pay(None, 3));
    /// ```
    pub fn can_pay(&self, color: Option<TrainColor>, count: u8) -> bool {
        self.can_pay_keeping_wilds(color, count, 0)
    }

    /// Same as [`TrainCards::can_pay`], but with `reserved_wilds` wild cards set aside first.
    pub fn can_pay_keeping_wilds(
        &self,
        color: Option<TrainColor>,
        count: u8,
        reserved_wilds: u8,
    ) -> bool {
        let wild = match self.count(TrainColor::Wild).checked_sub(reserved_wilds) {
            Some(wild) => u16::from(wild),
            None => return false,
        };
        let count = u16::from(count);
        let enough_with_wilds = |color: TrainColor| u16::from(self.count(color)) + wild >= count;

        match color {
            Some(color) if color.is_wild() => wild >= count,
            Some(color) => enough_with_wilds(color),
            None => wild >= count || TrainColor::non_wild().any(enough_with_wilds),
        }
    }

    /// The cards that may be picked next, given the color locked so far and how many
    /// cards are still to be picked.
    ///
    /// A colored card is only offered if, once picked, the remaining cards can still be paid:
    /// this is what guarantees that a player can never paint themselves into a corner.
    /// Wild cards are always offered when held.
    fn offered_cards(
        &self,
        locked_color: Option<TrainColor>,
        remaining: u8,
    ) -> SmallVec<[TrainColor; 9]> {
        let wild = u16::from(self.count(TrainColor::Wild));
        let mut options: SmallVec<[TrainColor; 9]> = TrainColor::non_wild()
            .filter(|color| locked_color.map_or(true, |locked| locked == *color))
            .filter(|color| {
                let held = u16::from(self.count(*color));
                held > 0 && held + wild >= u16::from(remaining)
            })
            .collect();

        if wild > 0 {
            options.push(TrainColor::Wild);
        }

        options
    }

    /// Asks the player to pick `count` cards of the given color, one at a time.
    ///
    /// The first non-wild card picked locks the color for the remaining picks when `color`
    /// is `None`. Picked cards are taken out of the hand and returned.
    ///
    /// If `can_pass` is true, the player may decline at any point, in which case every card
    /// picked so far goes back to the hand and the result is empty. Running out of options
    /// behaves the same way. When passing is not allowed, running out of options means the
    /// caller did not check that the cards could be paid: the hand is restored, and an
    /// `Err` is returned.
    pub fn select_cards(
        &mut self,
        color: Option<TrainColor>,
        count: u8,
        can_pass: bool,
        input: &mut dyn PlayerInput,
    ) -> Result<SelectedCards, RulesError> {
        let mut selected = SelectedCards::new();
        let mut locked_color = color;

        for picked in 0..count {
            let remaining = count - picked;
            let options = self.offered_cards(locked_color, remaining);
            let instruction = format!(
                "Choose a card ({}, or wild). {} left to pay.",
                describe_requirement(locked_color),
                remaining
            );

            let choice = match ask(input, &instruction, &options, can_pass) {
                Ok(choice) => choice,
                Err(error) => {
                    self.add_all(selected);
                    return Err(error);
                }
            };

            match choice {
                Some(card) => {
                    debug!(%card, remaining, "card selected");
                    self.remove(card);
                    selected.push(card);

                    if locked_color.is_none() && card.is_not_wild() {
                        locked_color = Some(card);
                    }
                }
                None => {
                    self.add_all(selected);

                    if !can_pass {
                        warn!(count, picked, ?color, "ran out of payable cards");
                        return Err(RulesError::InsufficientCards {
                            requested: count,
                            selected: picked,
                        });
                    }

                    debug!(count, picked, "selection abandoned");
                    return Ok(SelectedCards::new());
                }
            }
        }

        Ok(selected)
    }
}
