use crate::card::TrainColor;
use crate::error::RulesError;
use crate::hand::TrainCards;
use crate::rules::Rules;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a player within a game.
///
/// # JSON
/// Player ids are serialized as a plain unsigned integer.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// All the information about a player's current state, returned by [`Player::get_player_state`].
#[derive(Debug, PartialEq, Serialize)]
pub struct PlayerState<'a> {
    /// Encapsulates information that is visible to all players. Always populated!
    pub public_player_state: PublicPlayerState<'a>,
    /// The player's wagon cards, *only* visible to the player themself.
    /// Therefore, we only populate this if the request originated from the same player.
    pub private_player_state: Option<&'a TrainCards>,
}

/// Information about a player's state that is visible to all players.
#[derive(Debug, PartialEq, Serialize)]
pub struct PublicPlayerState<'a> {
    pub id: PlayerId,
    pub name: &'a str,
    /// The number of wagons the player has left.
    /// This is the currency used, alongside wagon cards, to capture routes.
    pub wagons: u8,
    pub stations: u8,
    pub score: i32,
    /// How many wagon cards the player holds, staged cards included.
    pub num_train_cards: usize,
}

/// The resources of a player that the capture rules read and mutate.
///
/// A [`Player`] is not aware of the board nor of other players: checking whether an action is
/// allowed is the job of [`crate::board::Board`].
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    id: PlayerId,
    name: String,
    wagons: u8,
    stations: u8,
    /// Starts with the credit for every unused station, so it can go down when stations are built.
    score: i32,
    cards: TrainCards,
}

impl Player {
    /// Creates a new player, with the wagons, stations and score granted by `rules`, and no card.
    ///
    /// # Example
    /// ```
    /// use rails::player::{Player, PlayerId};
    /// use rails::rules::Rules;
    ///
    /// let player = Player::new(PlayerId(0), String::from("Ada"), &Rules::default());
    ///
    /// assert_eq!(player.wagons(), 45);
    /// assert_eq!(player.stations(), 3);
    /// assert_eq!(player.score(), 12);
    /// ```
    pub fn new(id: PlayerId, name: String, rules: &Rules) -> Self {
        Self {
            id,
            name,
            wagons: rules.wagons,
            stations: rules.stations,
            score: rules.initial_score(),
            cards: TrainCards::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access how many wagons a player has left.
    #[inline]
    pub fn wagons(&self) -> u8 {
        self.wagons
    }

    /// Access how many stations a player has left.
    #[inline]
    pub fn stations(&self) -> u8 {
        self.stations
    }

    #[inline]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[inline]
    pub fn cards(&self) -> &TrainCards {
        &self.cards
    }

    #[inline]
    pub fn cards_mut(&mut self) -> &mut TrainCards {
        &mut self.cards
    }

    /// Adds the given wagon cards to the player's hand.
    pub fn give_train_cards(&mut self, cards: impl IntoIterator<Item = TrainColor>) {
        self.cards.add_all(cards);
    }

    pub(crate) fn spend_wagons(&mut self, wagons: u8) -> Result<(), RulesError> {
        self.wagons = self
            .wagons
            .checked_sub(wagons)
            .ok_or(RulesError::InsufficientWagons {
                requested: wagons,
                left: self.wagons,
            })?;

        Ok(())
    }

    pub(crate) fn add_points(&mut self, points: i32) {
        self.score += points;
    }

    /// Uses up one station, and gives back the points it was worth.
    pub(crate) fn use_station(&mut self, station_value: i32) {
        debug_assert!(self.stations > 0, "{} has no station left", self.name);
        self.stations = self.stations.saturating_sub(1);
        self.score -= station_value;
    }

    /// Retrieve the player's state.
    ///
    /// If the given `player_id` is not the same as the current player, only the public state will be populated --
    /// the private state will be left to `None`.
    /// Otherwise, both public and private states are populated.
    pub fn get_player_state(&self, player_id: PlayerId) -> PlayerState<'_> {
        let private_player_state = if self.id == player_id {
            Some(&self.cards)
        } else {
            None
        };

        PlayerState {
            public_player_state: PublicPlayerState {
                id: self.id,
                name: &self.name,
                wagons: self.wagons,
                stations: self.stations,
                score: self.score,
                num_train_cards: self.cards.len() + self.cards.staged().len(),
            },
            private_player_state,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self
            .cards
            .to_sorted_vec()
            .iter()
            .map(TrainColor::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(f, "=== {} ({} points) ===", self.name, self.score)?;
        writeln!(f, "  Stations: {}, Wagons: {}", self.stations, self.wagons)?;
        write!(f, "  Wagon cards: {}", cards)
    }
}
