//! Formatting utilities for terminal output

use crate::core::Feedback;
use crate::game::Hint;

/// One guess as glyph + right-aligned value per position
///
/// `width` is the number of digits to pad to, usually
/// `DailySelector::max_digits`.
///
/// # Examples
/// ```
/// use numericle::core::{Verdict, Feedback};
/// use numericle::output::formatters::format_guess_row;
///
/// let row = Feedback::new(vec![Verdict::Correct, Verdict::Absent]);
/// assert_eq!(format_guess_row(&[1, 12], &row, 2), "🟩 1 ⬜12");
/// ```
#[must_use]
pub fn format_guess_row(values: &[i64], feedback: &Feedback, width: usize) -> String {
    values
        .iter()
        .zip(feedback.verdicts())
        .map(|(value, verdict)| format!("{}{value:>width$}", verdict.glyph()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sequence as comma-separated values
#[must_use]
pub fn format_sequence(values: &[i64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Board line with revealed values and `?` elsewhere, e.g. "? 4 ? ? 25 ? ?"
#[must_use]
pub fn format_hint_line(hints: &[Hint], len: usize) -> String {
    (0..len)
        .map(|i| {
            hints
                .iter()
                .find(|h| h.position == i)
                .map_or_else(|| "?".to_string(), |h| h.value.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    // Cast is safe: ratio is clamped to [0, 1]
    let filled = ((ratio * width as f64).round() as usize).min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Verdict::{Absent, Correct, Present};

    #[test]
    fn guess_row_pads_to_width() {
        let row = Feedback::new(vec![Correct, Present, Absent]);
        assert_eq!(format_guess_row(&[1, 49, 100], &row, 3), "🟩  1 🟨 49 ⬜100");
    }

    #[test]
    fn sequence_is_comma_separated() {
        assert_eq!(format_sequence(&[1, 1, 2, 3]), "1, 1, 2, 3");
        assert_eq!(format_sequence(&[]), "");
    }

    #[test]
    fn hint_line_marks_unknowns() {
        let hints = [
            Hint {
                position: 1,
                value: 4,
            },
            Hint {
                position: 4,
                value: 25,
            },
        ];
        assert_eq!(format_hint_line(&hints, 7), "? 4 ? ? 25 ? ?");
    }

    #[test]
    fn progress_bar_empty() {
        assert_eq!(create_progress_bar(0.0, 100.0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn progress_bar_full() {
        assert_eq!(create_progress_bar(100.0, 100.0, 10), "██████████");
    }

    #[test]
    fn progress_bar_half() {
        assert_eq!(create_progress_bar(50.0, 100.0, 10), "█████░░░░░");
    }

    #[test]
    fn progress_bar_zero_max() {
        assert_eq!(create_progress_bar(5.0, 0.0, 4), "░░░░");
    }
}
