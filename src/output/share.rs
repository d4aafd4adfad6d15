//! Share card rendering
//!
//! ```text
//! Numericle 2025-03-09_v1
//! You won! 🎉
//! 3/10 (1 hint)
//!
//! 🟩🟨⬜🟦⬜🟨🟩
//! 🟩🟩⬜🟦🟨🟩🟩
//! 🟩🟩🟩🟩🟩🟩🟩
//! ```

use crate::core::{Feedback, Verdict};
use crate::puzzle::PuzzleId;

/// Glyph drawn over hint-revealed positions that were not guessed correctly
pub const HINT_GLYPH: char = '🟦';

const TITLE: &str = "Numericle";
const WON_LABEL: &str = "You won! 🎉";
const LOST_LABEL: &str = "You lost 😔";

/// Render a finished (or in-progress) game as a shareable text card
///
/// The hint overlay only changes the glyph shown; `rows` are not modified.
#[must_use]
pub fn render_share(
    rows: &[Feedback],
    puzzle_id: &PuzzleId,
    won: bool,
    hints_used: usize,
    revealed: &[usize],
    max_attempts: usize,
) -> String {
    let label = if won { WON_LABEL } else { LOST_LABEL };
    let score = if won {
        rows.len().to_string()
    } else {
        "X".to_string()
    };
    let mut out = format!("{TITLE} {puzzle_id}\n{label}\n{score}/{max_attempts}");

    match hints_used {
        0 => {}
        1 => out.push_str(" (1 hint)"),
        n => out.push_str(&format!(" ({n} hints)")),
    }

    out.push_str("\n\n");

    let grid: Vec<String> = rows.iter().map(|row| overlay_row(row, revealed)).collect();
    out.push_str(&grid.join("\n"));

    out
}

fn overlay_row(row: &Feedback, revealed: &[usize]) -> String {
    row.verdicts()
        .iter()
        .enumerate()
        .map(|(i, &verdict)| {
            if verdict != Verdict::Correct && revealed.contains(&i) {
                HINT_GLYPH
            } else {
                verdict.glyph()
            }
        })
        .collect()
}

/// Header fields recovered from a share card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareHeader {
    pub puzzle_id: String,
    pub won: bool,
    /// `None` for a loss, which is shown as `X`
    pub attempts: Option<usize>,
    pub max_attempts: usize,
    pub hints_used: usize,
    pub grid_rows: usize,
}

/// Parse the header and grid size back out of a share card
#[must_use]
pub fn parse_share_header(card: &str) -> Option<ShareHeader> {
    let mut lines = card.lines();

    let puzzle_id = lines.next()?.strip_prefix(TITLE)?.trim().to_string();
    let won = match lines.next()? {
        WON_LABEL => true,
        LOST_LABEL => false,
        _ => return None,
    };

    let score_line = lines.next()?;
    let (score, hints) = match score_line.split_once(" (") {
        Some((score, rest)) => (score, Some(rest)),
        None => (score_line, None),
    };

    let (attempts, max_attempts) = score.split_once('/')?;
    let attempts = match attempts {
        "X" => None,
        n => Some(n.parse().ok()?),
    };
    let max_attempts = max_attempts.parse().ok()?;

    let hints_used = match hints {
        Some(rest) => rest.split_whitespace().next()?.parse().ok()?,
        None => 0,
    };

    let grid_rows = lines.filter(|line| !line.is_empty()).count();

    Some(ShareHeader {
        puzzle_id,
        won,
        attempts,
        max_attempts,
        hints_used,
        grid_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Verdict::{Absent, Correct, Present};
    use proptest::prelude::*;

    fn id() -> PuzzleId {
        "2025-03-09_v1".parse().unwrap()
    }

    #[test]
    fn won_card_layout() {
        let rows = vec![
            Feedback::new(vec![Correct, Present, Absent, Absent, Absent, Present, Correct]),
            Feedback::new(vec![Correct; 7]),
        ];
        let card = render_share(&rows, &id(), true, 0, &[], 10);
        assert_eq!(
            card,
            "Numericle 2025-03-09_v1\nYou won! 🎉\n2/10\n\n🟩🟨⬜⬜⬜🟨🟩\n🟩🟩🟩🟩🟩🟩🟩"
        );
    }

    #[test]
    fn lost_card_uses_x_and_hint_count() {
        let rows = vec![Feedback::new(vec![Absent, Absent, Present])];
        let card = render_share(&rows, &id(), false, 2, &[0, 2], 10);
        assert!(card.starts_with("Numericle 2025-03-09_v1\nYou lost 😔\nX/10 (2 hints)\n\n"));
    }

    #[test]
    fn hint_overlay_skips_correct_positions() {
        let rows = vec![
            Feedback::new(vec![Absent, Present, Absent]),
            Feedback::new(vec![Correct, Present, Absent]),
        ];
        let card = render_share(&rows, &id(), false, 1, &[0], 10);
        let grid: Vec<&str> = card.lines().skip(4).collect();
        assert_eq!(grid, vec!["🟦🟨⬜", "🟩🟨⬜"]);
        // The rows themselves are untouched
        assert_eq!(rows[0].verdicts()[0], Absent);
    }

    #[test]
    fn single_hint_is_singular() {
        let card = render_share(&[], &id(), false, 1, &[3], 10);
        assert!(card.contains("X/10 (1 hint)"));
    }

    #[test]
    fn malformed_cards_do_not_parse() {
        assert_eq!(parse_share_header(""), None);
        assert_eq!(parse_share_header("Wordle 123\nYou won! 🎉\n3/6"), None);
        assert_eq!(parse_share_header("Numericle x\nMaybe\n3/10"), None);
        assert_eq!(parse_share_header("Numericle x\nYou won! 🎉\nthree/10"), None);
    }

    proptest! {
        #[test]
        fn header_round_trips(
            won in any::<bool>(),
            attempts in 1usize..=10,
            hints in 0usize..=5,
        ) {
            let rows = vec![Feedback::new(vec![Absent; 7]); attempts];
            let card = render_share(&rows, &id(), won, hints, &[], 10);
            let header = parse_share_header(&card).unwrap();

            prop_assert_eq!(header.puzzle_id, "2025-03-09_v1");
            prop_assert_eq!(header.won, won);
            prop_assert_eq!(header.attempts, won.then_some(attempts));
            prop_assert_eq!(header.max_attempts, 10);
            prop_assert_eq!(header.hints_used, hints);
            prop_assert_eq!(header.grid_rows, attempts);
        }
    }
}
