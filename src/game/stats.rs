//! Per-player statistics and streaks

use super::session::Outcome;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifetime record for one player
///
/// A win extends the current streak only when the previous recorded game
/// was the day before; any loss or forfeit resets it to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Winning attempt count to number of wins
    pub guess_distribution: BTreeMap<usize, u32>,
    pub last_played: Option<NaiveDate>,
}

impl PlayerStats {
    /// Record a finished game
    ///
    /// Returns `false` without changing anything if a game was already
    /// recorded for `date` or a later day.
    pub fn record(&mut self, date: NaiveDate, outcome: Outcome, attempts: usize) -> bool {
        if self.last_played.is_some_and(|last| last >= date) {
            return false;
        }

        self.games_played += 1;

        if outcome.is_win() {
            self.games_won += 1;
            let continues = self
                .last_played
                .and_then(|last| last.succ_opt())
                .is_some_and(|next| next == date);
            self.current_streak = if continues { self.current_streak + 1 } else { 1 };
            self.max_streak = self.max_streak.max(self.current_streak);
            *self.guess_distribution.entry(attempts).or_insert(0) += 1;
        } else {
            self.current_streak = 0;
        }

        self.last_played = Some(date);
        true
    }

    /// Percentage of games won, 0 when nothing has been played
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played) * 100.0
        }
    }
}
