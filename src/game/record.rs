//! Serialized session form and the local save file
//!
//! The target sequence is never written out. A record names its puzzle id
//! and rule; loading regenerates the sequence and checks the rule still
//! matches before replaying the stored rows.

use super::session::{Outcome, Session, SessionLimits, SessionState};
use super::stats::PlayerStats;
use crate::core::{Feedback, Guess, GuessFormatError};
use crate::puzzle::{DailySelector, PuzzleError, PuzzleId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading or restoring saved state
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to access state file: {0}")]
    Io(#[from] io::Error),
    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error("puzzle {id} resolves to rule '{expected}', record names '{found}'")]
    RuleMismatch {
        id: String,
        expected: String,
        found: String,
    },
    #[error("inconsistent session record: {0}")]
    Inconsistent(String),
    #[error("recorded guess is invalid: {0}")]
    Guess(#[from] GuessFormatError),
}

/// Persisted form of a [`Session`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub puzzle_id: PuzzleId,
    pub rule_name: String,
    pub guesses: Vec<Vec<i64>>,
    pub verdicts: Vec<Feedback>,
    pub revealed: Vec<usize>,
    pub hints_used: usize,
    pub completed: bool,
    pub won: bool,
    #[serde(default)]
    pub forfeited: bool,
}

impl SessionRecord {
    /// Capture a session
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        let state = session.state();
        Self {
            puzzle_id: session.puzzle().id().clone(),
            rule_name: session.puzzle().rule_name().to_string(),
            guesses: session.guesses().iter().map(|g| g.values().to_vec()).collect(),
            verdicts: session.feedback().to_vec(),
            revealed: session.revealed().to_vec(),
            hints_used: session.hints_used(),
            completed: state.is_complete(),
            won: session.is_won(),
            forfeited: state == SessionState::Complete(Outcome::Forfeited),
        }
    }

    /// Rebuild the session this record describes
    ///
    /// # Errors
    /// - `RecordError::Puzzle` if the id cannot be resolved by `selector`
    /// - `RecordError::RuleMismatch` if the id now resolves to another rule
    /// - `RecordError::Inconsistent` if the stored rows, hints or flags do
    ///   not describe a reachable session state
    pub fn restore(
        &self,
        selector: &DailySelector<'_>,
        limits: SessionLimits,
    ) -> Result<Session, RecordError> {
        let puzzle = selector.daily_puzzle(&self.puzzle_id)?;
        if puzzle.rule_name() != self.rule_name {
            return Err(RecordError::RuleMismatch {
                id: self.puzzle_id.to_string(),
                expected: puzzle.rule_name().to_string(),
                found: self.rule_name.clone(),
            });
        }

        if self.guesses.len() > limits.max_attempts {
            return Err(inconsistent("more guesses than attempts allowed"));
        }
        if self.guesses.len() != self.verdicts.len() {
            return Err(inconsistent("guess and verdict counts differ"));
        }

        let mut guesses = Vec::with_capacity(self.guesses.len());
        let mut feedback = Vec::with_capacity(self.guesses.len());
        for (values, stored) in self.guesses.iter().zip(&self.verdicts) {
            let guess = Guess::from_values(values.clone(), puzzle.len())?;
            let scored = Feedback::calculate(guess.values(), puzzle.sequence())
                .map_err(|e| RecordError::Inconsistent(e.to_string()))?;
            if &scored != stored {
                return Err(inconsistent("stored verdicts do not match the puzzle"));
            }
            guesses.push(guess);
            feedback.push(scored);
        }

        self.check_hints(puzzle.len(), limits)?;
        let state = self.derive_state(&feedback, limits)?;

        Ok(Session::from_parts(
            Arc::new(puzzle),
            limits,
            guesses,
            feedback,
            self.revealed.clone(),
            state,
        ))
    }

    fn check_hints(&self, len: usize, limits: SessionLimits) -> Result<(), RecordError> {
        if self.hints_used != self.revealed.len() {
            return Err(inconsistent("hint counter disagrees with revealed positions"));
        }
        if self.hints_used > limits.max_hints {
            return Err(inconsistent("more hints than allowed"));
        }
        for (i, &position) in self.revealed.iter().enumerate() {
            if position >= len || self.revealed[..i].contains(&position) {
                return Err(inconsistent("revealed positions out of range or repeated"));
            }
        }
        Ok(())
    }

    fn derive_state(
        &self,
        feedback: &[Feedback],
        limits: SessionLimits,
    ) -> Result<SessionState, RecordError> {
        let last_wins = feedback.last().is_some_and(Feedback::is_winning);
        let exhausted = feedback.len() >= limits.max_attempts;

        let state = match (self.completed, self.won, self.forfeited) {
            (true, true, false) if last_wins => SessionState::Complete(Outcome::Won),
            (true, false, true) if !last_wins => SessionState::Complete(Outcome::Forfeited),
            (true, false, false) if exhausted && !last_wins => {
                SessionState::Complete(Outcome::Lost)
            }
            (false, false, false) if !last_wins && !exhausted => {
                if feedback.is_empty() && self.revealed.is_empty() {
                    SessionState::NotStarted
                } else {
                    SessionState::InProgress
                }
            }
            _ => return Err(inconsistent("completion flags disagree with the guess history")),
        };
        Ok(state)
    }
}

fn inconsistent(reason: &str) -> RecordError {
    RecordError::Inconsistent(reason.to_string())
}

/// Everything the local front ends persist between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveFile {
    pub session: Option<SessionRecord>,
    pub stats: PlayerStats,
}

impl SaveFile {
    /// Load a save file; a missing file is an empty save
    ///
    /// # Errors
    /// Returns `RecordError::Io` or `RecordError::Json` if the file exists but
    /// cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the save file as pretty JSON
    ///
    /// # Errors
    /// Returns `RecordError::Io` if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RecordError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PlayabilityFilter;
    use crate::rules::Registry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn played_session(selector: &DailySelector<'_>) -> Session {
        let id: PuzzleId = "2025-08-08_v1".parse().unwrap();
        let puzzle = Arc::new(selector.daily_puzzle(&id).unwrap());
        let mut session = Session::new(puzzle, SessionLimits::default());
        session.submit_input("0 1 2 3 4 5 6").unwrap();
        session.request_hint(&mut StdRng::seed_from_u64(11)).unwrap();
        session
    }

    #[test]
    fn record_restores_identical_session() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let session = played_session(&selector);

        let record = SessionRecord::from_session(&session);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("sequence"));

        let parsed: SessionRecord = serde_json::from_str(&json).unwrap();
        let restored = parsed.restore(&selector, SessionLimits::default()).unwrap();

        assert_eq!(restored.state(), session.state());
        assert_eq!(restored.guesses(), session.guesses());
        assert_eq!(restored.feedback(), session.feedback());
        assert_eq!(restored.revealed(), session.revealed());
        assert_eq!(restored.puzzle().sequence(), session.puzzle().sequence());
    }

    #[test]
    fn rule_mismatch_is_refused() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let mut record = SessionRecord::from_session(&played_session(&selector));
        record.rule_name = "definitely_not_it".to_string();

        assert!(matches!(
            record.restore(&selector, SessionLimits::default()),
            Err(RecordError::RuleMismatch { .. })
        ));
    }

    #[test]
    fn tampered_verdicts_are_refused() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let mut record = SessionRecord::from_session(&played_session(&selector));
        record.won = true;
        record.completed = true;

        assert!(matches!(
            record.restore(&selector, SessionLimits::default()),
            Err(RecordError::Inconsistent(_))
        ));
    }

    #[test]
    fn hint_counter_must_match() {
        let registry = Registry::builtin().unwrap();
        let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
        let mut record = SessionRecord::from_session(&played_session(&selector));
        record.hints_used = 3;

        assert!(matches!(
            record.restore(&selector, SessionLimits::default()),
            Err(RecordError::Inconsistent(_))
        ));
    }

    #[test]
    fn save_file_round_trip_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("numericle-save-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.json");
        let _ = fs::remove_file(&path);

        assert_eq!(SaveFile::load(&path).unwrap(), SaveFile::default());

        let mut save = SaveFile::default();
        save.stats.games_played = 4;
        save.save(&path).unwrap();
        assert_eq!(SaveFile::load(&path).unwrap(), save);

        fs::remove_dir_all(&dir).unwrap();
    }
}
