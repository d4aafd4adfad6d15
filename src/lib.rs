//! Numericle
//!
//! A daily number-sequence guessing game. Every UTC day one rule from a
//! fixed catalog is chosen deterministically; players guess its first
//! terms and get duplicate-aware per-position feedback.
//!
//! # Quick Start
//!
//! ```rust
//! use numericle::core::{Feedback, Verdict};
//!
//! let feedback = Feedback::calculate(&[1, 2, 3], &[3, 2, 1]).unwrap();
//! assert_eq!(
//!     feedback.verdicts(),
//!     &[Verdict::Present, Verdict::Correct, Verdict::Present]
//! );
//! ```
//!
//! Playing today's puzzle through the [`game::Engine`]:
//!
//! ```rust,no_run
//! use numericle::game::{Engine, SessionKey, SessionLimits};
//! use numericle::puzzle::{DailySelector, PlayabilityFilter};
//! use numericle::rules::Registry;
//!
//! let registry = Registry::builtin().unwrap();
//! let selector = DailySelector::new(&registry, PlayabilityFilter::default(), 7).unwrap();
//! let engine = Engine::new(selector, SessionLimits::default());
//!
//! let key = SessionKey::new("alice", "local");
//! let report = engine.guess(&key, "1 4 9 16 25 36 49").unwrap();
//! println!("{}", report.feedback.to_emoji());
//! ```

// Core domain types
pub mod core;

// Sequence rule catalog
pub mod rules;

// Daily puzzle selection
pub mod puzzle;

// Sessions, persistence and orchestration
pub mod game;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;

// Settings and log setup
pub mod config;
pub mod logging;
