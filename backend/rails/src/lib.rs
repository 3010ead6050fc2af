//! Capture rules of a European rail-building board game.
//!
//! A [`board::Board`] owns every city and route. A dispatcher asks it whether a player may
//! capture a route or build a station, then performs the action with a [`capture::Turn`]
//! bundling the deck, the player's input channel and the game log.
//!
//! Routes come in three kinds ([`route::RouteKind`]): plain routes, ferries (which need some
//! wild cards) and tunnels (whose price may rise once cards are revealed from the deck).
//! Library diagnostics are emitted through `tracing`; no subscriber is installed here.

pub mod board;
pub mod capture;
pub mod card;
pub mod city;
pub mod error;
pub mod game_log;
pub mod hand;
pub mod input;
pub mod player;
pub mod route;
pub mod rules;
