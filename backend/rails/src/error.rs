//! Errors returned by the capture rules and their configuration.

use crate::card::TrainColor;
use crate::city::CityId;
use crate::route::RouteId;

use thiserror::Error;

/// Everything that can go wrong while resolving a capture or a station build.
///
/// Ineligible actions are reported before anything is mutated. The
/// `InsufficientCards`, `InsufficientWagons` and `InvalidChoice` variants denote a broken
/// invariant (the action was eligible, yet could not be paid for); the player's hand is
/// restored before they are returned.
#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("No route exists with id {0}.")]
    UnknownRoute(RouteId),

    #[error("No city exists with id {0}.")]
    UnknownCity(CityId),

    #[error("{player} cannot capture the route {route}.")]
    RouteNotCapturable { route: String, player: String },

    #[error("{player} cannot build a station in {city}.")]
    StationNotBuildable { city: String, player: String },

    #[error("Only {selected} of the {requested} required cards could be selected.")]
    InsufficientCards { requested: u8, selected: u8 },

    #[error("Cannot place {requested} wagons, whilst having only {left} left.")]
    InsufficientWagons { requested: u8, left: u8 },

    #[error("No valid card was chosen after {attempts} attempts.")]
    InvalidChoice { attempts: usize },

    #[error("There is no {0} card face up.")]
    CardNotVisible(TrainColor),

    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("Malformed JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for RulesError {
    fn from(error: serde_json::Error) -> Self {
        RulesError::Json(error.to_string())
    }
}
