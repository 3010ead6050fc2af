use crate::error::RulesError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Every player starts the game with 45 wagons and 3 stations.
const NUM_OF_WAGONS: u8 = 45;
const NUM_OF_STATIONS: u8 = 3;
// Each unused station is worth 4 points at the end of the game.
const STATION_VALUE: i32 = 4;
const NUM_TUNNEL_DRAWS: u8 = 3;

/// Tunable constants of the rule set.
///
/// Missing fields fall back to the standard European rules when deserializing.
///
/// # JSON
/// ```
/// use rails::rules::Rules;
///
/// let rules = Rules::from_json(r#"{ "wagons": 30 }"#).unwrap();
/// assert_eq!(rules.wagons, 30);
/// assert_eq!(rules.stations, 3);
/// assert_eq!(rules.points_for_length(6), 15);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Rules {
    /// Wagons each player starts with.
    pub wagons: u8,
    /// Stations each player starts with.
    pub stations: u8,
    /// Points credited per unused station. Players start with `stations * station_value`
    /// points, and lose `station_value` per station built.
    pub station_value: i32,
    /// How many cards are revealed from the deck when attempting a tunnel.
    pub tunnel_draws: u8,
    /// Points granted for claiming a route, by route length.
    /// Lengths absent from this table grant nothing.
    pub points: BTreeMap<u8, i32>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            wagons: NUM_OF_WAGONS,
            stations: NUM_OF_STATIONS,
            station_value: STATION_VALUE,
            tunnel_draws: NUM_TUNNEL_DRAWS,
            points: BTreeMap::from([(1, 1), (2, 2), (3, 4), (4, 7), (6, 15), (8, 21)]),
        }
    }
}

impl Rules {
    /// Parses and validates rules from JSON.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;

        Ok(rules)
    }

    /// Checks that the rules describe a playable game.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.stations == 0 {
            return Err(RulesError::InvalidRules(String::from(
                "Players must start with at least one station.",
            )));
        }

        if self.tunnel_draws == 0 {
            return Err(RulesError::InvalidRules(String::from(
                "Tunnels must reveal at least one card.",
            )));
        }

        if let Some(length) = self.points.keys().find(|length| **length == 0) {
            return Err(RulesError::InvalidRules(format!(
                "Cannot grant points for routes of length {}.",
                length
            )));
        }

        Ok(())
    }

    /// Points granted for claiming a route of the given length.
    #[inline]
    pub fn points_for_length(&self, length: u8) -> i32 {
        self.points.get(&length).copied().unwrap_or(0)
    }

    /// The score every player starts with: the credit for all their unused stations.
    #[inline]
    pub fn initial_score(&self) -> i32 {
        i32::from(self.stations) * self.station_value
    }

    /// How many cards the next station costs, given how many stations the player has left.
    ///
    /// The first station costs one card, the second two, and so on.
    /// Returns `None` if the player has no station left.
    pub fn station_price(&self, stations_left: u8) -> Option<u8> {
        if stations_left == 0 || stations_left > self.stations {
            return None;
        }

        Some(self.stations - stations_left + 1)
    }
}
