//! Game orchestration
//!
//! Ties today's puzzle, the puzzle cache and the session store together
//! behind the handful of actions a front end offers: guess, hint, status,
//! give up, share, rules.

use super::session::{Hint, Session, SessionError, SessionLimits, SessionState, SessionStatus};
use super::store::{SessionKey, SessionStore};
use crate::core::{Feedback, Guess};
use crate::output::share::render_share;
use crate::puzzle::{DailyPuzzle, DailySelector, PuzzleCache, PuzzleError, PuzzleId};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Errors surfaced by [`Engine`] actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result of one accepted guess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    pub guess: Guess,
    pub feedback: Feedback,
    pub state: SessionState,
    pub attempts_used: usize,
    pub attempts_remaining: usize,
    /// Present once the game is over
    pub reveal: Option<Reveal>,
}

/// The answer, shown once a game ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub sequence: Vec<i64>,
    pub rule_name: &'static str,
    pub description: &'static str,
}

/// Front-end facing game service
pub struct Engine<'a, C: Clock = SystemClock> {
    selector: DailySelector<'a>,
    limits: SessionLimits,
    clock: C,
    cache: PuzzleCache,
    store: SessionStore,
}

impl<'a> Engine<'a, SystemClock> {
    /// Engine on the system clock
    #[must_use]
    pub fn new(selector: DailySelector<'a>, limits: SessionLimits) -> Self {
        Self::with_clock(selector, limits, SystemClock)
    }
}

impl<'a, C: Clock> Engine<'a, C> {
    /// Engine on a custom clock
    #[must_use]
    pub fn with_clock(selector: DailySelector<'a>, limits: SessionLimits, clock: C) -> Self {
        Self {
            selector,
            limits,
            clock,
            cache: PuzzleCache::new(),
            store: SessionStore::new(),
        }
    }

    /// Today's puzzle id
    ///
    /// # Errors
    /// Returns `PuzzleError::MalformedId` if the catalog version is invalid.
    pub fn today_id(&self) -> Result<PuzzleId, PuzzleError> {
        self.selector.puzzle_id(self.clock.now())
    }

    /// Today's puzzle, generated at most once per day
    ///
    /// Crossing UTC midnight evicts yesterday's puzzle and sessions.
    ///
    /// # Errors
    /// Returns `PuzzleError` if the puzzle cannot be generated.
    pub fn today(&self) -> Result<Arc<DailyPuzzle>, PuzzleError> {
        let id = self.today_id()?;

        if self.cache.get(&id).is_none() {
            let evicted = self.cache.evict_before(id.date());
            if evicted > 0 {
                let sessions = self.store.evict_stale(&id);
                info!(puzzle = %id, evicted, sessions, "new daily puzzle");
            }
        }

        self.cache
            .get_or_generate(&id, || self.selector.daily_puzzle(&id))
    }

    /// Submit a raw guess string for `key`
    ///
    /// # Errors
    /// - `SessionError::InvalidGuessFormat` if the input is malformed
    /// - `SessionError::GameAlreadyComplete` if today's game is over
    pub fn guess(&self, key: &SessionKey, input: &str) -> Result<GuessReport, EngineError> {
        let puzzle = self.today()?;
        let guess = Guess::parse(input, puzzle.len()).map_err(SessionError::from)?;

        let report = self.store.with_session(key, &puzzle, self.limits, |session| {
            let feedback = session.submit_guess(guess.clone())?.clone();
            let status = session.status();
            Ok::<_, SessionError>(GuessReport {
                guess,
                feedback,
                state: status.state,
                attempts_used: status.attempts_used,
                attempts_remaining: status.attempts_remaining(),
                reveal: status.state.is_complete().then(|| self.reveal(&puzzle)),
            })
        })?;

        Ok(report)
    }

    /// Reveal a random position for `key`
    ///
    /// # Errors
    /// - `SessionError::GameAlreadyComplete` if today's game is over
    /// - `SessionError::NoHintAvailable` if no hint can be given
    pub fn hint<R: Rng + ?Sized>(
        &self,
        key: &SessionKey,
        rng: &mut R,
    ) -> Result<Hint, EngineError> {
        let puzzle = self.today()?;
        let hint = self
            .store
            .with_session(key, &puzzle, self.limits, |session| session.request_hint(rng))?;
        Ok(hint)
    }

    /// Give up today's game for `key`
    ///
    /// # Errors
    /// - `SessionError::NotStarted` before any guess or hint
    /// - `SessionError::GameAlreadyComplete` if today's game is over
    pub fn forfeit(&self, key: &SessionKey) -> Result<Reveal, EngineError> {
        let puzzle = self.today()?;
        self.store
            .with_session(key, &puzzle, self.limits, |session| session.forfeit().map(|_| ()))?;
        Ok(self.reveal(&puzzle))
    }

    /// Current progress for `key` on today's puzzle
    ///
    /// # Errors
    /// Returns `PuzzleError` if today's puzzle cannot be generated.
    pub fn status(&self, key: &SessionKey) -> Result<SessionStatus, EngineError> {
        let puzzle = self.today()?;
        Ok(self
            .store
            .with_session(key, &puzzle, self.limits, |session| session.status()))
    }

    /// Share card for a finished game, `None` while it is still being played
    ///
    /// # Errors
    /// Returns `PuzzleError` if today's puzzle cannot be generated.
    pub fn share(&self, key: &SessionKey) -> Result<Option<String>, EngineError> {
        let puzzle = self.today()?;
        Ok(self
            .store
            .with_session(key, &puzzle, self.limits, |session| {
                session.is_complete().then(|| share_text(session))
            }))
    }

    /// The answer for `key`, `None` while their game is still being played
    ///
    /// # Errors
    /// Returns `PuzzleError` if today's puzzle cannot be generated.
    pub fn answer(&self, key: &SessionKey) -> Result<Option<Reveal>, EngineError> {
        let puzzle = self.today()?;
        let done = self
            .store
            .with_session(key, &puzzle, self.limits, |session| session.is_complete());
        Ok(done.then(|| self.reveal(&puzzle)))
    }

    /// Install a previously saved session for `key`
    ///
    /// # Errors
    /// Returns `SessionError::PuzzleMismatch` if the session is not for today.
    pub fn adopt(&self, key: SessionKey, session: Session) -> Result<(), EngineError> {
        let today = self.today()?;
        self.store.adopt(key, session, today.id())?;
        Ok(())
    }

    /// Run `read` against the session for `key` on today's puzzle
    ///
    /// # Errors
    /// Returns `PuzzleError` if today's puzzle cannot be generated.
    pub fn inspect<T>(
        &self,
        key: &SessionKey,
        read: impl FnOnce(&Session) -> T,
    ) -> Result<T, EngineError> {
        let puzzle = self.today()?;
        Ok(self
            .store
            .with_session(key, &puzzle, self.limits, |session| read(session)))
    }

    /// Description of a rule by name, "Unknown rule" if it does not exist
    #[must_use]
    pub fn describe(&self, rule_name: &str) -> &'static str {
        self.selector.rule_description(rule_name)
    }

    /// How-to-play text for the configured limits
    #[must_use]
    pub fn rules_text(&self) -> String {
        rules_text(self.selector.sequence_length(), self.limits)
    }

    #[must_use]
    pub const fn selector(&self) -> &DailySelector<'a> {
        &self.selector
    }

    #[must_use]
    pub const fn limits(&self) -> SessionLimits {
        self.limits
    }

    fn reveal(&self, puzzle: &DailyPuzzle) -> Reveal {
        Reveal {
            sequence: puzzle.sequence().to_vec(),
            rule_name: puzzle.rule_name(),
            description: self.describe(puzzle.rule_name()),
        }
    }
}

/// Share card for a session in any state
#[must_use]
pub fn share_text(session: &Session) -> String {
    render_share(
        session.feedback(),
        session.puzzle().id(),
        session.is_won(),
        session.hints_used(),
        session.revealed(),
        session.limits().max_attempts,
    )
}

/// Static how-to-play text
#[must_use]
pub fn rules_text(sequence_length: usize, limits: SessionLimits) -> String {
    format!(
        "\
How to play Numericle

Guess the hidden sequence of {sequence_length} numbers in {max_attempts} tries.
Every day brings a new sequence following a mathematical rule.

After each guess:
  {correct} the number is in the right position
  {present} the number is in the sequence, but elsewhere
  {absent} the number is not in the sequence

Duplicates count: a number is only marked as often as it appears.
You may reveal up to {max_hints} positions with hints; hints never cost a guess.
Enter numbers separated by spaces or commas, e.g. 1 4 9 16 25 36 49.",
        max_attempts = limits.max_attempts,
        max_hints = limits.max_hints,
        correct = crate::core::Verdict::Correct.glyph(),
        present = crate::core::Verdict::Present.glyph(),
        absent = crate::core::Verdict::Absent.glyph(),
    )
}
