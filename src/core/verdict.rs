//! Guess feedback calculation and representation
//!
//! A guess is scored position by position against the target sequence:
//! - Correct = value in the right position
//! - Present = value occurs elsewhere in the target (and is not used up)
//! - Absent  = value is not in the target, or every occurrence is used up
//!
//! Duplicates are handled with multiset accounting, exactly like Wordle
//! letters: a value can be marked Correct or Present at most as many times
//! as it occurs in the target.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Per-position classification of one guessed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Present,
    Absent,
}

impl Verdict {
    /// Emoji glyph used on boards and share cards
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

/// Error returned when a guess cannot be scored against a target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluateError {
    #[error("guess has {guess} values but the target has {target}")]
    LengthMismatch { guess: usize, target: usize },
}

/// One row of verdicts, produced for a single guess against a single target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback(Vec<Verdict>);

impl Feedback {
    /// Wrap an existing verdict row
    #[must_use]
    pub const fn new(verdicts: Vec<Verdict>) -> Self {
        Self(verdicts)
    }

    /// Score `guess` against `target`
    ///
    /// # Algorithm
    /// 1. Count every value in the target
    /// 2. First pass: mark exact position matches Correct and consume one count
    /// 3. Second pass: remaining positions are Present while the value still
    ///    has unconsumed count, Absent otherwise
    ///
    /// The passes must not be merged: a single "does the target contain this
    /// value" check over-reports duplicates.
    ///
    /// # Errors
    /// Returns `EvaluateError::LengthMismatch` if the two sequences differ in length.
    ///
    /// # Examples
    /// ```
    /// use numericle::core::{Feedback, Verdict};
    ///
    /// let target = [2, 2, 3, 4, 5, 6, 7];
    /// let guess = [2, 2, 2, 4, 5, 6, 7];
    /// let feedback = Feedback::calculate(&guess, &target).unwrap();
    ///
    /// // Both 2's in the target are consumed by the first two positions
    /// assert_eq!(feedback.verdicts()[2], Verdict::Absent);
    /// assert_eq!(feedback.count_correct(), 6);
    /// ```
    pub fn calculate(guess: &[i64], target: &[i64]) -> Result<Self, EvaluateError> {
        if guess.len() != target.len() {
            return Err(EvaluateError::LengthMismatch {
                guess: guess.len(),
                target: target.len(),
            });
        }

        let mut result = vec![Verdict::Absent; guess.len()];
        let mut available = value_counts(target);

        // First pass: exact matches
        for (i, (g, t)) in guess.iter().zip(target).enumerate() {
            if g == t {
                result[i] = Verdict::Correct;
                if let Some(count) = available.get_mut(g) {
                    *count = count.saturating_sub(1);
                }
            }
        }

        // Second pass: right value, wrong position
        for (i, g) in guess.iter().enumerate() {
            if result[i] == Verdict::Correct {
                continue;
            }
            if let Some(count) = available.get_mut(g)
                && *count > 0
            {
                result[i] = Verdict::Present;
                *count -= 1;
            }
        }

        Ok(Self(result))
    }

    /// The verdicts in position order
    #[inline]
    #[must_use]
    pub fn verdicts(&self) -> &[Verdict] {
        &self.0
    }

    /// Number of positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True iff every position is Correct
    #[must_use]
    pub fn is_winning(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&v| v == Verdict::Correct)
    }

    #[must_use]
    pub fn count_correct(&self) -> usize {
        self.count(Verdict::Correct)
    }

    #[must_use]
    pub fn count_present(&self) -> usize {
        self.count(Verdict::Present)
    }

    /// Positions marked Correct, in ascending order
    pub fn correct_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == Verdict::Correct)
            .map(|(i, _)| i)
    }

    /// Render the row as emoji, e.g. "🟩🟨⬜🟩🟨⬜⬜"
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|v| v.glyph()).collect()
    }

    fn count(&self, verdict: Verdict) -> usize {
        self.0.iter().filter(|&&v| v == verdict).count()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_emoji())
    }
}

/// Score a guess against a target
///
/// Free-function form of [`Feedback::calculate`].
///
/// # Errors
/// Returns `EvaluateError::LengthMismatch` if the lengths differ.
pub fn evaluate(guess: &[i64], target: &[i64]) -> Result<Feedback, EvaluateError> {
    Feedback::calculate(guess, target)
}

/// True iff every verdict is Correct
#[must_use]
pub fn is_winning_guess(verdicts: &[Verdict]) -> bool {
    !verdicts.is_empty() && verdicts.iter().all(|&v| v == Verdict::Correct)
}

fn value_counts(values: &[i64]) -> FxHashMap<i64, usize> {
    let mut counts = FxHashMap::default();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}
