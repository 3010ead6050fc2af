//! Sink for the human-readable game events.
//!
//! These sentences are shared with every player, so they never carry private information
//! beyond what the table can see (cards revealed by a tunnel, cards spent on a capture).
//! Developer diagnostics go through `tracing` instead.

/// Receives one sentence per game event.
pub trait GameLog {
    fn log(&mut self, message: String);
}

impl GameLog for Vec<String> {
    fn log(&mut self, message: String) {
        self.push(message);
    }
}

/// Forwards game events to `tracing`, under the `rails::game` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl GameLog for TracingLog {
    fn log(&mut self, message: String) {
        tracing::info!(target: "rails::game", "{}", message);
    }
}
