//! Pool coverage analysis
//!
//! Replays the daily selection over a run of consecutive days and reports
//! how evenly the pool is used.

use crate::puzzle::{DailySelector, PuzzleId};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Outcome of selecting a single day
#[derive(Debug, Clone)]
pub struct DaySelection {
    pub id: PuzzleId,
    pub rule_name: &'static str,
    /// The served sequence differs from the rule's first terms
    pub varied: bool,
    /// Selection failed for this day
    pub error: Option<String>,
}

/// Statistics over a run of consecutive days
#[derive(Debug)]
pub struct DistributionResult {
    pub start: PuzzleId,
    pub days: usize,
    pub pool_size: usize,
    pub counts: FxHashMap<&'static str, usize>,
    pub varied: usize,
    pub failures: usize,
    pub longest_repeat: usize,
    pub duration: Duration,
}

impl DistributionResult {
    /// Number of distinct rules served at least once
    #[must_use]
    pub fn rules_hit(&self) -> usize {
        self.counts.len()
    }

    /// Share of the pool served at least once, in percent
    #[must_use]
    pub fn coverage(&self) -> f64 {
        if self.pool_size == 0 {
            return 0.0;
        }
        self.rules_hit() as f64 / self.pool_size as f64 * 100.0
    }

    /// Rules ordered by pick count, most picked first, ties by name
    #[must_use]
    pub fn ranked(&self) -> Vec<(&'static str, usize)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(&name, &n)| (name, n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Pool rules never served over the run
    #[must_use]
    pub fn unused<'r>(&self, selector: &'r DailySelector<'_>) -> Vec<&'r str> {
        selector
            .pool()
            .iter()
            .map(|rule| rule.name())
            .filter(|name| !self.counts.contains_key(name))
            .collect()
    }
}

/// Select `days` consecutive puzzles starting at `start`
///
/// Days are resolved in parallel; a day whose date would overflow the
/// calendar ends the run early.
pub fn run_distribution(
    selector: &DailySelector<'_>,
    start: &PuzzleId,
    days: usize,
    show_progress: bool,
) -> DistributionResult {
    let started = Instant::now();

    let mut ids = Vec::with_capacity(days);
    let mut next = Some(start.clone());
    while ids.len() < days {
        let Some(id) = next else { break };
        next = id.next_day();
        ids.push(id);
    }

    let pb = if show_progress {
        let pb = ProgressBar::new(ids.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
        {
            pb.set_style(style.progress_chars("█▓▒░"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let selections: Vec<DaySelection> = ids
        .par_iter()
        .map(|id| {
            let selection = select_day(selector, id);
            pb.inc(1);
            selection
        })
        .collect();

    pb.finish_with_message(format!("{} days selected", selections.len()));

    let mut counts: FxHashMap<&'static str, usize> = FxHashMap::default();
    let mut varied = 0;
    let mut failures = 0;
    let mut longest_repeat = 0;
    let mut run = 0;
    let mut previous: Option<&str> = None;

    for selection in &selections {
        if selection.error.is_some() {
            failures += 1;
            previous = None;
            run = 0;
            continue;
        }
        *counts.entry(selection.rule_name).or_insert(0) += 1;
        if selection.varied {
            varied += 1;
        }
        run = if previous == Some(selection.rule_name) { run + 1 } else { 1 };
        longest_repeat = longest_repeat.max(run);
        previous = Some(selection.rule_name);
    }

    DistributionResult {
        start: start.clone(),
        days: selections.len(),
        pool_size: selector.pool().len(),
        counts,
        varied,
        failures,
        longest_repeat,
        duration: started.elapsed(),
    }
}

fn select_day(selector: &DailySelector<'_>, id: &PuzzleId) -> DaySelection {
    match selector.daily_puzzle(id) {
        Ok(puzzle) => {
            let base = selector
                .registry()
                .lookup(puzzle.rule_name())
                .and_then(|rule| rule.generate(puzzle.len()).ok());
            DaySelection {
                id: id.clone(),
                rule_name: puzzle.rule_name(),
                varied: base.as_deref() != Some(puzzle.sequence()),
                error: None,
            }
        }
        Err(e) => DaySelection {
            id: id.clone(),
            rule_name: "",
            varied: false,
            error: Some(e.to_string()),
        },
    }
}

/// Print a distribution report
pub fn print_distribution(result: &DistributionResult, selector: &DailySelector<'_>) {
    println!("\n{}", "═".repeat(60).cyan());
    println!("{}", " Daily Pool Distribution ".bold());
    println!("{}", "═".repeat(60).cyan());

    println!("\n  Start:          {}", result.start.to_string().bright_white());
    println!("  Days sampled:   {}", result.days);
    println!("  Pool size:      {}", result.pool_size);
    println!(
        "  Rules served:   {} ({:.1}%)",
        result.rules_hit().to_string().bright_cyan().bold(),
        result.coverage()
    );
    println!("  Varied days:    {}", result.varied);
    println!("  Longest repeat: {} days", result.longest_repeat);
    if result.failures > 0 {
        println!("  {} {}", "Failures:".red(), result.failures);
    }
    println!("  Time:           {:.2}s", result.duration.as_secs_f64());

    let ranked = result.ranked();
    let max = ranked.first().map_or(0, |&(_, n)| n);
    println!("\n  Picks per rule:");
    for (name, count) in &ranked {
        let bar = crate::output::formatters::create_progress_bar(*count as f64, max as f64, 20);
        println!("    {name:<22} {} {count:>4}", bar.green());
    }

    let unused = result.unused(selector);
    if !unused.is_empty() {
        println!("\n  {} {}", "Never served:".yellow(), unused.join(", "));
    }
    println!();
}
