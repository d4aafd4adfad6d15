//! Per-player game session state machine
//!
//! ```text
//! NotStarted ──guess/hint──▶ InProgress ──win──────▶ Complete(Won)
//!                                │      ──exhaust──▶ Complete(Lost)
//!                                └──────forfeit────▶ Complete(Forfeited)
//! ```
//!
//! Every rejected action leaves the session untouched.

use crate::core::{Feedback, Guess, GuessFormatError, Verdict};
use crate::puzzle::{DailyPuzzle, PuzzleId};
use rand::Rng;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
    Forfeited,
}

impl Outcome {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Complete(Outcome),
}

impl SessionState {
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::InProgress => f.write_str("in progress"),
            Self::Complete(Outcome::Won) => f.write_str("won"),
            Self::Complete(Outcome::Lost) => f.write_str("lost"),
            Self::Complete(Outcome::Forfeited) => f.write_str("forfeited"),
        }
    }
}

/// Why a hint request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintUnavailable {
    /// Every allowed hint has been used
    Exhausted { max_hints: usize },
    /// Every position is revealed or was guessed correctly last turn
    NoEligiblePosition,
}

impl fmt::Display for HintUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { max_hints } => {
                write!(f, "You've used all {max_hints} hints for today's puzzle!")
            }
            Self::NoEligiblePosition => {
                f.write_str("All positions are already revealed or correctly guessed!")
            }
        }
    }
}

/// Errors raised by session transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidGuessFormat(#[from] GuessFormatError),
    #[error("Game already complete! Come back tomorrow for a new puzzle.")]
    GameAlreadyComplete,
    #[error("{0}")]
    NoHintAvailable(HintUnavailable),
    #[error("No active game. Make a guess or ask for a hint to start today's puzzle.")]
    NotStarted,
    #[error("session belongs to puzzle {session}, today's puzzle is {current}")]
    PuzzleMismatch { session: String, current: String },
}

/// Attempt and hint limits for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLimits {
    pub max_attempts: usize,
    pub max_hints: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            max_hints: 5,
        }
    }
}

/// A revealed position and its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub position: usize,
    pub value: i64,
}

/// Read-only snapshot returned by [`Session::status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub puzzle_id: PuzzleId,
    pub state: SessionState,
    pub attempts_used: usize,
    pub max_attempts: usize,
    pub hints_used: usize,
    pub hints_remaining: usize,
    pub revealed: Vec<Hint>,
    pub last_guess: Option<Guess>,
    pub last_feedback: Option<Feedback>,
}

impl SessionStatus {
    #[must_use]
    pub const fn attempts_remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts_used)
    }
}

/// One player's progress on one daily puzzle
#[derive(Debug, Clone)]
pub struct Session {
    puzzle: Arc<DailyPuzzle>,
    limits: SessionLimits,
    guesses: Vec<Guess>,
    feedback: Vec<Feedback>,
    revealed: Vec<usize>,
    state: SessionState,
}

impl Session {
    /// A fresh, not yet started session
    #[must_use]
    pub const fn new(puzzle: Arc<DailyPuzzle>, limits: SessionLimits) -> Self {
        Self {
            puzzle,
            limits,
            guesses: Vec::new(),
            feedback: Vec::new(),
            revealed: Vec::new(),
            state: SessionState::NotStarted,
        }
    }

    /// Rebuild a session from already-validated parts
    pub(crate) const fn from_parts(
        puzzle: Arc<DailyPuzzle>,
        limits: SessionLimits,
        guesses: Vec<Guess>,
        feedback: Vec<Feedback>,
        revealed: Vec<usize>,
        state: SessionState,
    ) -> Self {
        Self {
            puzzle,
            limits,
            guesses,
            feedback,
            revealed,
            state,
        }
    }

    /// Score a guess and advance the game
    ///
    /// Starts a `NotStarted` session. Wins on an all-Correct row; loses once
    /// the attempt limit is reached without a win.
    ///
    /// # Errors
    /// - `SessionError::GameAlreadyComplete` on a finished session
    /// - `SessionError::InvalidGuessFormat` if the guess length differs from
    ///   the target
    pub fn submit_guess(&mut self, guess: Guess) -> Result<&Feedback, SessionError> {
        self.ensure_playable()?;

        let feedback = Feedback::calculate(guess.values(), self.puzzle.sequence()).map_err(|_| {
            GuessFormatError::WrongArity {
                expected: self.puzzle.len(),
                got: guess.len(),
            }
        })?;

        let won = feedback.is_winning();
        self.guesses.push(guess);
        self.feedback.push(feedback);

        self.state = if won {
            SessionState::Complete(Outcome::Won)
        } else if self.guesses.len() >= self.limits.max_attempts {
            SessionState::Complete(Outcome::Lost)
        } else {
            SessionState::InProgress
        };

        debug!(
            puzzle = %self.puzzle.id(),
            attempt = self.guesses.len(),
            state = %self.state,
            "guess scored"
        );

        // Just pushed, so the history is non-empty
        Ok(&self.feedback[self.feedback.len() - 1])
    }

    /// Parse and submit a raw guess string
    ///
    /// # Errors
    /// As [`Session::submit_guess`], plus parse failures.
    pub fn submit_input(&mut self, input: &str) -> Result<&Feedback, SessionError> {
        self.ensure_playable()?;
        let guess = Guess::parse(input, self.puzzle.len())?;
        self.submit_guess(guess)
    }

    /// Reveal one random position
    ///
    /// Candidates exclude positions already revealed and positions guessed
    /// Correct in the most recent attempt. A hint never costs an attempt.
    ///
    /// # Errors
    /// - `SessionError::GameAlreadyComplete` on a finished session
    /// - `SessionError::NoHintAvailable` when the hint limit is reached or
    ///   no position is eligible
    pub fn request_hint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Hint, SessionError> {
        self.ensure_playable()?;

        if self.revealed.len() >= self.limits.max_hints {
            return Err(SessionError::NoHintAvailable(HintUnavailable::Exhausted {
                max_hints: self.limits.max_hints,
            }));
        }

        let eligible = self.eligible_hint_positions();
        let Some(&position) = eligible.choose(rng) else {
            return Err(SessionError::NoHintAvailable(
                HintUnavailable::NoEligiblePosition,
            ));
        };

        self.revealed.push(position);
        if self.state == SessionState::NotStarted {
            self.state = SessionState::InProgress;
        }

        debug!(
            puzzle = %self.puzzle.id(),
            position,
            hints_used = self.revealed.len(),
            "hint revealed"
        );

        Ok(Hint {
            position,
            value: self.puzzle.sequence()[position],
        })
    }

    /// Give up and reveal the answer
    ///
    /// # Errors
    /// - `SessionError::NotStarted` before the first guess or hint
    /// - `SessionError::GameAlreadyComplete` on a finished session
    pub fn forfeit(&mut self) -> Result<&[i64], SessionError> {
        match self.state {
            SessionState::NotStarted => Err(SessionError::NotStarted),
            SessionState::Complete(_) => Err(SessionError::GameAlreadyComplete),
            SessionState::InProgress => {
                self.state = SessionState::Complete(Outcome::Forfeited);
                debug!(puzzle = %self.puzzle.id(), "forfeited");
                Ok(self.puzzle.sequence())
            }
        }
    }

    /// Snapshot of the current progress
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            puzzle_id: self.puzzle.id().clone(),
            state: self.state,
            attempts_used: self.guesses.len(),
            max_attempts: self.limits.max_attempts,
            hints_used: self.revealed.len(),
            hints_remaining: self.hints_remaining(),
            revealed: self.hints(),
            last_guess: self.guesses.last().cloned(),
            last_feedback: self.feedback.last().cloned(),
        }
    }

    /// Revealed positions with their values, in reveal order
    #[must_use]
    pub fn hints(&self) -> Vec<Hint> {
        self.revealed
            .iter()
            .map(|&position| Hint {
                position,
                value: self.puzzle.sequence()[position],
            })
            .collect()
    }

    fn eligible_hint_positions(&self) -> Vec<usize> {
        let last = self.feedback.last();
        (0..self.puzzle.len())
            .filter(|i| !self.revealed.contains(i))
            .filter(|&i| last.is_none_or(|row| row.verdicts()[i] != Verdict::Correct))
            .collect()
    }

    const fn ensure_playable(&self) -> Result<(), SessionError> {
        if self.state.is_complete() {
            Err(SessionError::GameAlreadyComplete)
        } else {
            Ok(())
        }
    }

    #[inline]
    #[must_use]
    pub fn puzzle(&self) -> &Arc<DailyPuzzle> {
        &self.puzzle
    }

    #[inline]
    #[must_use]
    pub const fn limits(&self) -> SessionLimits {
        self.limits
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    #[inline]
    #[must_use]
    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    /// Hint-revealed positions in reveal order
    #[inline]
    #[must_use]
    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    #[must_use]
    pub fn attempts_used(&self) -> usize {
        self.guesses.len()
    }

    #[must_use]
    pub fn hints_used(&self) -> usize {
        self.revealed.len()
    }

    #[must_use]
    pub fn hints_remaining(&self) -> usize {
        self.limits.max_hints.saturating_sub(self.revealed.len())
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    #[must_use]
    pub const fn is_won(&self) -> bool {
        matches!(self.state, SessionState::Complete(Outcome::Won))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Session over a fixed target, bypassing daily selection
    pub(crate) fn session_for(target: &[i64], limits: SessionLimits) -> Session {
        Session::new(Arc::new(DailyPuzzle::fixed(target)), limits)
    }

    fn guess(values: &[i64]) -> Guess {
        Guess::from_values(values.to_vec(), values.len()).unwrap()
    }

    #[test]
    fn winning_first_guess() {
        let mut session = session_for(&[1, 2, 3, 4, 5, 6, 7], SessionLimits::default());
        assert_eq!(session.state(), SessionState::NotStarted);

        let feedback = session.submit_guess(guess(&[1, 2, 3, 4, 5, 6, 7])).unwrap();
        assert!(feedback.is_winning());
        assert_eq!(session.state(), SessionState::Complete(Outcome::Won));
        assert_eq!(session.attempts_used(), 1);

        assert_eq!(
            session.submit_guess(guess(&[1, 2, 3, 4, 5, 6, 7])).unwrap_err(),
            SessionError::GameAlreadyComplete
        );
        assert_eq!(session.attempts_used(), 1);
    }

    #[test]
    fn lost_after_exactly_max_attempts() {
        let mut session = session_for(&[1, 2, 3, 4, 5, 6, 7], SessionLimits::default());
        let wrong = guess(&[0, 0, 0, 0, 0, 0, 0]);

        for attempt in 1..=9 {
            session.submit_guess(wrong.clone()).unwrap();
            assert_eq!(session.state(), SessionState::InProgress, "attempt {attempt}");
        }
        session.submit_guess(wrong.clone()).unwrap();
        assert_eq!(session.state(), SessionState::Complete(Outcome::Lost));
        assert_eq!(session.attempts_used(), 10);
        assert_eq!(
            session.submit_guess(wrong).unwrap_err(),
            SessionError::GameAlreadyComplete
        );
    }

    #[test]
    fn win_on_last_attempt_is_a_win() {
        let limits = SessionLimits {
            max_attempts: 2,
            max_hints: 5,
        };
        let mut session = session_for(&[1, 1, 2], limits);
        session.submit_guess(guess(&[0, 0, 0])).unwrap();
        session.submit_guess(guess(&[1, 1, 2])).unwrap();
        assert!(session.is_won());
    }

    #[test]
    fn wrong_arity_changes_nothing() {
        let mut session = session_for(&[1, 2, 3, 4, 5, 6, 7], SessionLimits::default());
        let err = session.submit_guess(guess(&[1, 2, 3])).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidGuessFormat(GuessFormatError::WrongArity {
                expected: 7,
                got: 3
            })
        );
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.guesses().is_empty());
    }

    #[test]
    fn raw_input_is_parsed_against_target_length() {
        let mut session = session_for(&[1, 2, 3, 4, 5, 6, 7], SessionLimits::default());
        assert!(matches!(
            session.submit_input("1 2 three 4 5 6 7"),
            Err(SessionError::InvalidGuessFormat(GuessFormatError::NotAnInteger(_)))
        ));
        assert!(matches!(
            session.submit_input("1 2 -3 4 5 6 7"),
            Err(SessionError::InvalidGuessFormat(GuessFormatError::Negative(-3)))
        ));
        session.submit_input("1,2,3,4,5,6,0").unwrap();
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn five_hints_then_refused() {
        let mut session = session_for(&[1, 2, 3, 4, 5, 6, 7], SessionLimits::default());
        let mut rng = StdRng::seed_from_u64(7);

        let mut positions: Vec<usize> = (0..5)
            .map(|_| session.request_hint(&mut rng).unwrap().position)
            .collect();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), 5);
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.attempts_used(), 0);

        assert_eq!(
            session.request_hint(&mut rng).unwrap_err(),
            SessionError::NoHintAvailable(HintUnavailable::Exhausted { max_hints: 5 })
        );
        assert_eq!(session.hints_used(), 5);
    }

    #[test]
    fn hint_value_matches_target() {
        let target = [2, 3, 5, 7, 11, 13, 17];
        let mut session = session_for(&target, SessionLimits::default());
        let mut rng = StdRng::seed_from_u64(42);
        let hint = session.request_hint(&mut rng).unwrap();
        assert_eq!(hint.value, target[hint.position]);
    }

    #[test]
    fn hints_skip_positions_correct_in_last_guess() {
        let limits = SessionLimits {
            max_attempts: 10,
            max_hints: 7,
        };
        let mut session = session_for(&[1, 2, 3, 4, 5, 6, 7], limits);
        session.submit_guess(guess(&[1, 2, 3, 4, 5, 0, 0])).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let mut seen: Vec<usize> = (0..2)
            .map(|_| session.request_hint(&mut rng).unwrap().position)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![5, 6]);

        assert_eq!(
            session.request_hint(&mut rng).unwrap_err(),
            SessionError::NoHintAvailable(HintUnavailable::NoEligiblePosition)
        );
        assert_eq!(session.hints_used(), 2);
    }

    #[test]
    fn forfeit_requires_a_started_game() {
        let mut session = session_for(&[1, 2, 3], SessionLimits::default());
        assert_eq!(session.forfeit().unwrap_err(), SessionError::NotStarted);

        session.submit_guess(guess(&[3, 2, 1])).unwrap();
        assert_eq!(session.forfeit().unwrap(), &[1, 2, 3]);
        assert_eq!(session.state(), SessionState::Complete(Outcome::Forfeited));
        assert_eq!(session.forfeit().unwrap_err(), SessionError::GameAlreadyComplete);

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            session.request_hint(&mut rng).unwrap_err(),
            SessionError::GameAlreadyComplete
        );
    }

    #[test]
    fn status_reports_progress_without_mutation() {
        let mut session = session_for(&[1, 4, 9, 16, 25, 36, 49], SessionLimits::default());
        let mut rng = StdRng::seed_from_u64(9);
        session.submit_guess(guess(&[1, 9, 4, 16, 100, 36, 7])).unwrap();
        let hint = session.request_hint(&mut rng).unwrap();

        let status = session.status();
        assert_eq!(status.state, SessionState::InProgress);
        assert_eq!(status.attempts_used, 1);
        assert_eq!(status.attempts_remaining(), 9);
        assert_eq!(status.hints_used, 1);
        assert_eq!(status.hints_remaining, 4);
        assert_eq!(status.revealed, vec![hint]);
        assert_eq!(
            status.last_feedback.unwrap().verdicts(),
            &[
                Verdict::Correct,
                Verdict::Present,
                Verdict::Present,
                Verdict::Correct,
                Verdict::Absent,
                Verdict::Correct,
                Verdict::Absent
            ]
        );
        assert_eq!(session.status().attempts_used, 1);
    }
}
