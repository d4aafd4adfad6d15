//! Display functions for game output
//!
//! Everything writes to a caller-supplied sink so the line-mode game can
//! be driven from tests as well as from a terminal.

use super::formatters::{create_progress_bar, format_guess_row, format_hint_line, format_sequence};
use crate::game::{GuessReport, Hint, Outcome, PlayerStats, Reveal, SessionState, SessionStatus};
use colored::Colorize;
use std::io::{self, Write};

/// Print the result of an accepted guess
///
/// # Errors
/// Returns any error raised by `out`.
pub fn write_guess_report<W: Write>(
    out: &mut W,
    report: &GuessReport,
    width: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "  {:>2}. {}",
        report.attempts_used,
        format_guess_row(report.guess.values(), &report.feedback, width)
    )?;

    if !report.state.is_complete() {
        writeln!(
            out,
            "      {} correct, {} misplaced | {} {} left",
            report.feedback.count_correct().to_string().green(),
            report.feedback.count_present().to_string().yellow(),
            report.attempts_remaining,
            if report.attempts_remaining == 1 { "try" } else { "tries" }
        )?;
    }
    Ok(())
}

/// Print a session snapshot: board, hints and counters
///
/// # Errors
/// Returns any error raised by `out`.
pub fn write_status<W: Write>(
    out: &mut W,
    status: &SessionStatus,
    rows: &[(Vec<i64>, crate::core::Feedback)],
    len: usize,
    width: usize,
) -> io::Result<()> {
    writeln!(out, "\n{}", "─".repeat(60))?;
    writeln!(out, "Puzzle {} | {}", status.puzzle_id, status.state)?;
    writeln!(out, "{}", "─".repeat(60))?;

    if rows.is_empty() {
        writeln!(out, "  No guesses yet.")?;
    }
    for (i, (values, feedback)) in rows.iter().enumerate() {
        writeln!(out, "  {:>2}. {}", i + 1, format_guess_row(values, feedback, width))?;
    }

    write_hints(out, &status.revealed, len)?;

    writeln!(
        out,
        "\n  Attempts used: {}/{}",
        status.attempts_used, status.max_attempts
    )?;
    writeln!(
        out,
        "  Hints used:    {} ({} left)",
        status.hints_used, status.hints_remaining
    )?;
    Ok(())
}

/// Print the revealed positions as a partial board
///
/// # Errors
/// Returns any error raised by `out`.
pub fn write_hints<W: Write>(out: &mut W, hints: &[Hint], len: usize) -> io::Result<()> {
    if hints.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {} {}", "Revealed:".blue(), format_hint_line(hints, len))
}

/// Print the answer once a game is over
///
/// # Errors
/// Returns any error raised by `out`.
pub fn write_reveal<W: Write>(out: &mut W, reveal: &Reveal, state: SessionState) -> io::Result<()> {
    let won = matches!(state, SessionState::Complete(Outcome::Won));

    writeln!(out, "\n{}", "═".repeat(70).bright_cyan())?;
    if won {
        writeln!(
            out,
            "{}",
            "    🎉 ✨  S E Q U E N C E   S O L V E D !  ✨ 🎉    ".bright_green().bold()
        )?;
    } else {
        writeln!(out, "{}", "    The sequence was:".bright_white().bold())?;
    }
    writeln!(out, "{}", "═".repeat(70).bright_cyan())?;

    writeln!(out, "\n  Sequence: {}", format_sequence(&reveal.sequence).bright_white().bold())?;
    writeln!(out, "  Rule:     {}", reveal.description)?;
    writeln!(out)
}

/// Print a player's lifetime statistics
///
/// # Errors
/// Returns any error raised by `out`.
pub fn write_stats<W: Write>(out: &mut W, stats: &PlayerStats) -> io::Result<()> {
    writeln!(out, "\n{}", "═".repeat(60).cyan())?;
    writeln!(out, "{}", " Statistics ".bold())?;
    writeln!(out, "{}", "═".repeat(60).cyan())?;

    writeln!(out, "  Played:         {}", stats.games_played)?;
    writeln!(out, "  Win rate:       {:.0}%", stats.win_rate())?;
    writeln!(out, "  Current streak: {}", stats.current_streak)?;
    writeln!(out, "  Max streak:     {}", stats.max_streak)?;

    if !stats.guess_distribution.is_empty() {
        let max = stats.guess_distribution.values().copied().max().unwrap_or(0);
        writeln!(out, "\n  Guess distribution:")?;
        for (attempts, &wins) in &stats.guess_distribution {
            let bar = create_progress_bar(f64::from(wins), f64::from(max), 30);
            writeln!(out, "    {attempts:>2} {} {wins}", bar.green())?;
        }
    }
    writeln!(out)
}
