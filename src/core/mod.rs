//! Core domain types for Numericle
//!
//! This module contains the pure scoring types: verdicts, feedback rows and
//! validated guesses. Nothing here knows about days, rules or sessions.

mod guess;
mod verdict;

pub use guess::{Guess, GuessFormatError};
pub use verdict::{EvaluateError, Feedback, Verdict, evaluate, is_winning_guess};
