//! Log output setup
//!
//! Logs go to stderr so they never interleave with the board or share card
//! on stdout. Verbosity comes from `NUMERICLE_LOG` (`warn` when unset),
//! using the usual `EnvFilter` directive syntax, e.g.
//! `NUMERICLE_LOG=numericle::puzzle=debug`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "NUMERICLE_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Filter from `NUMERICLE_LOG`, falling back to `warn` if unset or invalid
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Subscriber for the TUI: without a terminal to share, logs are dropped
/// unless explicitly requested through `NUMERICLE_LOG`.
pub fn init_quiet() {
    if std::env::var_os(LOG_ENV).is_some() {
        init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
        tracing::warn!("logging initialised");
    }

    #[test]
    fn default_filter_is_warn() {
        if std::env::var_os(LOG_ENV).is_none() {
            assert_eq!(env_filter().to_string(), "warn");
        }
    }
}
