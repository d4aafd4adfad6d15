//! A local player's save file bound to an engine session
//!
//! Front ends running on one machine keep a single player's progress and
//! statistics in a JSON file between runs.

use super::engine::{Clock, Engine, EngineError};
use super::record::{RecordError, SaveFile, SessionRecord};
use super::session::SessionState;
use super::stats::PlayerStats;
use super::store::SessionKey;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while syncing the profile with the engine
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// What happened to the saved session on startup
#[derive(Debug)]
pub enum Resume {
    /// Nothing saved for today
    Fresh,
    /// Today's session was restored into the engine
    Restored,
    /// A record for today existed but could not be replayed
    Discarded(RecordError),
}

/// One local player
#[derive(Debug)]
pub struct LocalProfile {
    key: SessionKey,
    path: Option<PathBuf>,
    save: SaveFile,
}

impl LocalProfile {
    /// Load the save at `path`, or start empty without one
    ///
    /// # Errors
    /// Returns `RecordError` if the file exists but cannot be read or parsed.
    pub fn load(key: SessionKey, path: Option<&Path>) -> Result<Self, RecordError> {
        let save = match path {
            Some(path) => SaveFile::load(path)?,
            None => SaveFile::default(),
        };
        Ok(Self {
            key,
            path: path.map(Path::to_path_buf),
            save,
        })
    }

    /// Put today's saved session, if any, back into `engine`
    ///
    /// Records for another day are ignored.
    ///
    /// # Errors
    /// Returns `EngineError` if today's puzzle cannot be generated.
    pub fn resume<C: Clock>(&self, engine: &Engine<'_, C>) -> Result<Resume, EngineError> {
        let Some(record) = &self.save.session else {
            return Ok(Resume::Fresh);
        };
        if record.puzzle_id != engine.today_id()? {
            debug!(saved = %record.puzzle_id, "saved session is for another day");
            return Ok(Resume::Fresh);
        }

        match record.restore(engine.selector(), engine.limits()) {
            Ok(session) => {
                engine.adopt(self.key.clone(), session)?;
                Ok(Resume::Restored)
            }
            Err(e) => {
                warn!(%e, puzzle = %record.puzzle_id, "discarding saved session");
                Ok(Resume::Discarded(e))
            }
        }
    }

    /// Count today's game in the statistics once it is complete
    ///
    /// Returns `true` if the statistics changed.
    ///
    /// # Errors
    /// Returns `EngineError` if today's puzzle cannot be generated.
    pub fn record_outcome<C: Clock>(
        &mut self,
        engine: &Engine<'_, C>,
    ) -> Result<bool, EngineError> {
        let status = engine.status(&self.key)?;
        let SessionState::Complete(outcome) = status.state else {
            return Ok(false);
        };
        Ok(self
            .save
            .stats
            .record(status.puzzle_id.date(), outcome, status.attempts_used))
    }

    /// Write the current session and statistics, if a path was given
    ///
    /// # Errors
    /// Returns `ProfileError` if the session cannot be read or the file
    /// cannot be written.
    pub fn persist<C: Clock>(&mut self, engine: &Engine<'_, C>) -> Result<(), ProfileError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.save.session = Some(engine.inspect(&self.key, SessionRecord::from_session)?);
        self.save.save(path)?;
        Ok(())
    }

    #[must_use]
    pub const fn key(&self) -> &SessionKey {
        &self.key
    }

    #[must_use]
    pub const fn stats(&self) -> &PlayerStats {
        &self.save.stats
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
