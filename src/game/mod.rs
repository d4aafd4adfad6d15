//! Game sessions and orchestration
//!
//! - [`Session`]: one player's state machine for one daily puzzle
//! - [`SessionStore`]: per-(player, scope) single-writer session map
//! - [`Engine`]: today's puzzle plus the store, behind front-end actions
//! - [`SessionRecord`] / [`SaveFile`]: persisted form, target not included
//! - [`PlayerStats`]: streaks and guess distribution
//! - [`LocalProfile`]: one local player's save file

pub mod engine;
pub mod profile;
pub mod record;
pub mod session;
pub mod stats;
pub mod store;

pub use engine::{
    Clock, Engine, EngineError, GuessReport, Reveal, SystemClock, rules_text, share_text,
};
pub use profile::{LocalProfile, ProfileError, Resume};
pub use record::{RecordError, SaveFile, SessionRecord};
pub use session::{
    Hint, HintUnavailable, Outcome, Session, SessionError, SessionLimits, SessionState,
    SessionStatus,
};
pub use stats::PlayerStats;
pub use store::{SessionKey, SessionStore};
