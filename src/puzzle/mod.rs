//! Daily puzzle selection
//!
//! Maps a calendar day to a target sequence:
//! 1. [`PuzzleId`] names the UTC day and the catalog version
//! 2. [`hash_code`] turns the id into a seed
//! 3. [`DailySelector`] indexes the playable pool with that seed
//! 4. [`PuzzleCache`] keeps the result for the rest of the day

mod cache;
mod id;
mod selector;

pub use cache::PuzzleCache;
pub use id::PuzzleId;
pub use selector::{DailyPuzzle, DailySelector, MAX_VARIATION_ATTEMPTS, PlayabilityFilter};

use crate::rules::RuleError;
use thiserror::Error;

/// Errors raised while naming or generating a daily puzzle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("malformed puzzle id '{0}', expected YYYY-MM-DD_<version>")]
    MalformedId(String),
    #[error("puzzle '{id}' was issued for catalog '{found}', this build serves '{expected}'")]
    UnsupportedCatalogVersion {
        id: String,
        found: String,
        expected: String,
    },
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Polynomial rolling hash over UTF-16 code units, wrapped to `i32`
///
/// `hash = hash * 31 + unit` with two's-complement wrap-around, so the value
/// for a given string is identical to the one computed by any other
/// implementation of the same recurrence.
///
/// # Examples
/// ```
/// use numericle::puzzle::hash_code;
///
/// assert_eq!(hash_code(""), 0);
/// assert_eq!(hash_code("abc"), 96354);
/// ```
#[must_use]
pub fn hash_code(input: &str) -> i32 {
    input.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(hash_code("hello"), 99_162_322);
        assert_eq!(hash_code("2025-01-15_v1"), -1_465_057_546);
        assert_eq!(hash_code("2025-01-15_v1_variation"), 1_630_134_282);
    }

    #[test]
    fn hash_uses_utf16_units() {
        // U+03C0 is a single UTF-16 unit but two UTF-8 bytes
        assert_eq!(hash_code("π"), 960);
    }

    proptest! {
        #[test]
        fn hash_is_deterministic(input in ".{0,40}") {
            prop_assert_eq!(hash_code(&input), hash_code(&input));
        }

        #[test]
        fn appending_follows_the_recurrence(
            prefix in "[a-z0-9_-]{0,20}",
            c in proptest::char::range('a', 'z'),
        ) {
            let extended = format!("{prefix}{c}");
            let expected = hash_code(&prefix).wrapping_mul(31).wrapping_add(c as i32);
            prop_assert_eq!(hash_code(&extended), expected);
        }
    }
}
