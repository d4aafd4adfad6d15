//! In-memory session store
//!
//! Each (player, scope) pair maps to its own `Mutex<Session>`, so actions on
//! one session are applied strictly one at a time. The map lock is never
//! held while a session lock is taken, so unrelated players never contend
//! beyond the brief map lookup.

use super::session::{Session, SessionError, SessionLimits};
use crate::puzzle::{DailyPuzzle, PuzzleId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Identifies one player's session within one scope (a server, a channel,
/// a local profile)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub player_id: String,
    pub scope_id: String,
}

impl SessionKey {
    #[must_use]
    pub fn new(player_id: impl Into<String>, scope_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            scope_id: scope_id.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.player_id, self.scope_id)
    }
}

type SharedSession = Arc<Mutex<Session>>;

/// Sessions keyed by player and scope
///
/// Each entry carries the puzzle id its session was opened for, so day
/// checks never lock a session while the map is held.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<FxHashMap<SessionKey, (PuzzleId, SharedSession)>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `key` on `puzzle`
    ///
    /// A stored session for any other puzzle is superseded by a fresh one;
    /// stale sessions are never resumed.
    pub fn session(
        &self,
        key: &SessionKey,
        puzzle: &Arc<DailyPuzzle>,
        limits: SessionLimits,
    ) -> SharedSession {
        let mut sessions = self.lock_map();

        if let Some((id, existing)) = sessions.get(key) {
            if id == puzzle.id() {
                return Arc::clone(existing);
            }
            info!(%key, puzzle = %puzzle.id(), "day rolled over, starting a fresh session");
        }

        let fresh = Arc::new(Mutex::new(Session::new(Arc::clone(puzzle), limits)));
        sessions.insert(key.clone(), (puzzle.id().clone(), Arc::clone(&fresh)));
        fresh
    }

    /// Run `action` against the session for `key` on `puzzle`
    ///
    /// The map lock is released before `action` runs; only this session's
    /// lock is held.
    pub fn with_session<T>(
        &self,
        key: &SessionKey,
        puzzle: &Arc<DailyPuzzle>,
        limits: SessionLimits,
        action: impl FnOnce(&mut Session) -> T,
    ) -> T {
        let shared = self.session(key, puzzle, limits);
        let mut session = lock(&shared);
        action(&mut session)
    }

    /// The stored session for `key`, whatever puzzle it belongs to
    #[must_use]
    pub fn peek(&self, key: &SessionKey) -> Option<SharedSession> {
        self.lock_map().get(key).map(|(_, shared)| Arc::clone(shared))
    }

    /// Install a restored session
    ///
    /// # Errors
    /// Returns `SessionError::PuzzleMismatch` if the session is not for
    /// `today`; the store is left unchanged.
    pub fn adopt(
        &self,
        key: SessionKey,
        session: Session,
        today: &PuzzleId,
    ) -> Result<(), SessionError> {
        if session.puzzle().id() != today {
            return Err(SessionError::PuzzleMismatch {
                session: session.puzzle().id().to_string(),
                current: today.to_string(),
            });
        }
        let entry = (today.clone(), Arc::new(Mutex::new(session)));
        self.lock_map().insert(key, entry);
        Ok(())
    }

    /// Drop every session not belonging to `today`
    ///
    /// Returns the number of removed sessions.
    pub fn evict_stale(&self, today: &PuzzleId) -> usize {
        let mut sessions = self.lock_map();
        let before = sessions.len();
        sessions.retain(|_, (id, _)| id == today);
        before - sessions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_map(&self) -> MutexGuard<'_, FxHashMap<SessionKey, (PuzzleId, SharedSession)>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lock a session, recovering from poisoning
///
/// Every session mutation completes before its guard drops, so a poisoned
/// session is still consistent.
pub(crate) fn lock(shared: &Mutex<Session>) -> MutexGuard<'_, Session> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
