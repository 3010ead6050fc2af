//! The channel used to ask a player which card they want to play.

use crate::card::TrainColor;
use crate::error::RulesError;

use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{trace, warn};

/// How many answers outside of the offered options we tolerate before giving up.
pub const MAX_INVALID_ANSWERS: usize = 16;

/// Blocking request/response channel to the acting player.
pub trait PlayerInput {
    /// Asks the player to pick one of `options`.
    ///
    /// Returning `None` means the player passes. Passing is only honored when `can_pass`
    /// is true; otherwise the question is asked again.
    fn choose(
        &mut self,
        instruction: &str,
        options: &[TrainColor],
        can_pass: bool,
    ) -> Option<TrainColor>;
}

impl<F> PlayerInput for F
where
    F: FnMut(&str, &[TrainColor], bool) -> Option<TrainColor>,
{
    fn choose(
        &mut self,
        instruction: &str,
        options: &[TrainColor],
        can_pass: bool,
    ) -> Option<TrainColor> {
        self(instruction, options, can_pass)
    }
}

/// Asks `input` to pick one of `options`, and keeps asking until the answer is valid.
///
///  * Duplicated options are only offered once.
///  * Without any option, the question is not asked and `None` is returned, whatever `can_pass` says.
///  * With a single option, and if the player cannot pass, that option is picked without asking.
pub(crate) fn ask(
    input: &mut dyn PlayerInput,
    instruction: &str,
    options: &[TrainColor],
    can_pass: bool,
) -> Result<Option<TrainColor>, RulesError> {
    let mut distinct_options: SmallVec<[TrainColor; 9]> = SmallVec::new();
    for option in options {
        if !distinct_options.contains(option) {
            distinct_options.push(*option);
        }
    }

    match distinct_options.len() {
        0 => return Ok(None),
        1 if !can_pass => return Ok(Some(distinct_options[0])),
        _ => {}
    }

    for attempt in 1..=MAX_INVALID_ANSWERS {
        match input.choose(instruction, &distinct_options, can_pass) {
            Some(choice) if distinct_options.contains(&choice) => return Ok(Some(choice)),
            None if can_pass => return Ok(None),
            answer => trace!(?answer, attempt, "rejected answer"),
        }
    }

    warn!(
        instruction,
        attempts = MAX_INVALID_ANSWERS,
        "player never gave a valid answer"
    );
    Err(RulesError::InvalidChoice {
        attempts: MAX_INVALID_ANSWERS,
    })
}

/// Replays a fixed list of answers, and remembers every question it was asked.
///
/// Once the answers run out, it passes.
///
/// # Example
/// ```
/// use rails::card::TrainColor;
/// use rails::input::{PlayerInput, ScriptedInput};
///
/// let mut input = ScriptedInput::new([Some(TrainColor::Red), None]);
/// let options = [TrainColor::Red, TrainColor::Wild];
///
/// assert_eq!(input.choose("Pick a card.", &options, true), Some(TrainColor::Red));
/// assert_eq!(input.choose("Pick a card.", &options, true), None);
/// assert_eq!(input.offers().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<Option<TrainColor>>,
    instructions: Vec<String>,
    offers: Vec<Vec<TrainColor>>,
}

impl ScriptedInput {
    pub fn new(answers: impl IntoIterator<Item = Option<TrainColor>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            instructions: Vec::new(),
            offers: Vec::new(),
        }
    }

    /// Every instruction shown so far, in order.
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// Every set of options offered so far, in order.
    pub fn offers(&self) -> &[Vec<TrainColor>] {
        &self.offers
    }

    /// How many answers have not been consumed yet.
    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl PlayerInput for ScriptedInput {
    fn choose(
        &mut self,
        instruction: &str,
        options: &[TrainColor],
        _can_pass: bool,
    ) -> Option<TrainColor> {
        self.instructions.push(instruction.to_owned());
        self.offers.push(options.to_vec());
        self.answers.pop_front().flatten()
    }
}
