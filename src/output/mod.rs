//! Terminal output formatting
//!
//! Board rows, share cards and pretty-printed reports.

pub mod display;
pub mod formatters;
pub mod share;

pub use display::{write_guess_report, write_hints, write_reveal, write_stats, write_status};
pub use share::{HINT_GLYPH, ShareHeader, parse_share_header, render_share};
