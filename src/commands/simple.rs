//! Simple interactive CLI mode
//!
//! Line-based game without the TUI. Reads one command or guess per line.

use crate::game::{Clock, Engine, EngineError, LocalProfile, Resume, Session, SessionKey};
use crate::output::display::{
    write_guess_report, write_hints, write_reveal, write_stats, write_status,
};
use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  <numbers>   submit a guess, e.g. 1 4 9 16 25 36 49
  hint, h     reveal one position
  status, s   show your board
  give up, g  end today's game and see the answer
  share       print the share card (after the game)
  stats       show your statistics
  rules       how to play
  quit, q     leave (progress is kept)";

/// Run the line-mode game for the profile's player
///
/// A saved session for today is resumed; progress and statistics are
/// written back after every action when the profile has a save path.
///
/// # Errors
///
/// Returns an error on I/O failure, if the state file cannot be written, or
/// if today's puzzle cannot be generated.
#[allow(clippy::too_many_lines)] // Interactive game loop requires detailed handling
pub fn run_simple<C: Clock, R: BufRead, W: Write>(
    engine: &Engine<'_, C>,
    profile: &mut LocalProfile,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    let puzzle = engine.today()?;
    let key = profile.key().clone();
    let width = engine.selector().max_digits();
    let mut rng = rand::rng();

    writeln!(out, "\n╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                   Numericle - Daily Puzzle                   ║")?;
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝\n")?;
    writeln!(out, "Puzzle {}", puzzle.id().to_string().bright_white().bold())?;
    writeln!(
        out,
        "Guess the {} numbers in {} tries. Type 'help' for commands.\n",
        puzzle.len(),
        engine.limits().max_attempts
    )?;

    match profile.resume(engine)? {
        Resume::Fresh => {}
        Resume::Restored => {
            writeln!(out, "{}", "Welcome back! Your progress was restored.".green())?;
            show_status(engine, &key, out)?;
            if let Some(card) = engine.share(&key)? {
                writeln!(out, "\nYou've already finished today's puzzle.\n\n{card}\n")?;
            }
        }
        Resume::Discarded(e) => {
            writeln!(out, "{} {e}\n", "Saved game could not be restored:".yellow())?;
        }
    }

    loop {
        let Some(line) = get_user_input(&mut input, out, "Guess")? else {
            break;
        };

        match line.to_lowercase().as_str() {
            "" => {}
            "quit" | "q" | "exit" => break,
            "help" | "?" => writeln!(out, "{HELP}\n")?,
            "rules" => writeln!(out, "{}\n", engine.rules_text())?,
            "status" | "s" => show_status(engine, &key, out)?,
            "stats" => write_stats(out, profile.stats())?,
            "share" => match engine.share(&key)? {
                Some(card) => writeln!(out, "\n{card}\n")?,
                None => writeln!(out, "Finish today's puzzle first, then share your result.\n")?,
            },
            "hint" | "h" => {
                match engine.hint(&key, &mut rng) {
                    Ok(hint) => {
                        writeln!(
                            out,
                            "💡 Position {} is {}",
                            hint.position + 1,
                            hint.value.to_string().bright_blue().bold()
                        )?;
                        let revealed = engine.inspect(&key, Session::hints)?;
                        write_hints(out, &revealed, puzzle.len())?;
                        writeln!(out)?;
                    }
                    Err(e) => report_error(out, &e)?,
                }
                profile.persist(engine)?;
            }
            "give up" | "giveup" | "g" => {
                match engine.forfeit(&key) {
                    Ok(reveal) => {
                        write_reveal(out, &reveal, engine.status(&key)?.state)?;
                        finish(engine, profile, out)?;
                    }
                    Err(e) => report_error(out, &e)?,
                }
                profile.persist(engine)?;
            }
            _ => {
                match engine.guess(&key, &line) {
                    Ok(report) => {
                        write_guess_report(out, &report, width)?;
                        if let Some(reveal) = &report.reveal {
                            write_reveal(out, reveal, report.state)?;
                            finish(engine, profile, out)?;
                        }
                    }
                    Err(e) => report_error(out, &e)?,
                }
                profile.persist(engine)?;
            }
        }
    }

    profile.persist(engine)?;
    writeln!(out, "\n👋 Thanks for playing!\n")?;
    Ok(())
}

fn show_status<C: Clock, W: Write>(
    engine: &Engine<'_, C>,
    key: &SessionKey,
    out: &mut W,
) -> Result<()> {
    let status = engine.status(key)?;
    let (rows, len) = engine.inspect(key, |session| {
        let rows: Vec<_> = session
            .guesses()
            .iter()
            .map(|g| g.values().to_vec())
            .zip(session.feedback().iter().cloned())
            .collect();
        (rows, session.puzzle().len())
    })?;
    write_status(out, &status, &rows, len, engine.selector().max_digits())?;
    writeln!(out)?;
    Ok(())
}

/// Count a finished game and print its share card
fn finish<C: Clock, W: Write>(
    engine: &Engine<'_, C>,
    profile: &mut LocalProfile,
    out: &mut W,
) -> Result<()> {
    profile.record_outcome(engine)?;
    if let Some(card) = engine.share(profile.key())? {
        writeln!(out, "{card}\n")?;
    }
    Ok(())
}

fn report_error<W: Write>(out: &mut W, err: &EngineError) -> std::io::Result<()> {
    writeln!(out, "❌ {err}\n")
}

/// Get user input with a prompt, `None` at end of input
fn get_user_input<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{prompt}: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{SaveFile, SessionLimits};
    use crate::puzzle::{DailySelector, PlayabilityFilter};
    use crate::rules::Registry;
    use chrono::{DateTime, TimeZone, Utc};
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};

    fn engine(registry: &Registry) -> Engine<'_, impl Fn() -> DateTime<Utc>> {
        let selector = DailySelector::new(registry, PlayabilityFilter::default(), 7).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 10, 10, 9, 0, 0).unwrap();
        Engine::with_clock(selector, SessionLimits::default(), move || now)
    }

    fn play(engine: &Engine<'_, impl Clock>, state: Option<&Path>, script: &str) -> String {
        let mut profile = LocalProfile::load(SessionKey::new("local", "cli"), state).unwrap();
        let mut out = Vec::new();
        run_simple(engine, &mut profile, Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn answer(engine: &Engine<'_, impl Clock>) -> String {
        engine
            .today()
            .unwrap()
            .sequence()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn wrong(engine: &Engine<'_, impl Clock>) -> String {
        let puzzle = engine.today().unwrap();
        let big = puzzle.sequence().iter().max().copied().unwrap_or(0) + 1;
        vec![big.to_string(); puzzle.len()].join(",")
    }

    fn state_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("numericle-simple-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.json");
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn winning_line_prints_share_card() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let text = play(&engine, None, &format!("{}\n", answer(&engine)));

        assert!(text.contains("Numericle 2025-10-10_v1\nYou won! 🎉\n1/10"));
        assert!(text.contains("Thanks for playing"));
    }

    #[test]
    fn bad_input_and_early_share_are_reported() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let text = play(&engine, None, "1 2 3\nshare\ng\nquit\n");

        assert!(text.contains("Please enter exactly 7 numbers, got 3"));
        assert!(text.contains("Finish today's puzzle first"));
        assert!(text.contains("No active game"));
    }

    #[test]
    fn give_up_reveals_and_shares_loss() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let script = format!("{}\nh\ngive up\nshare\n", wrong(&engine));
        let text = play(&engine, None, &script);

        let today = engine.today().unwrap();
        let sequence = crate::output::formatters::format_sequence(today.sequence());
        assert!(text.contains("Position"));
        assert!(text.contains(&sequence));
        assert!(text.contains("X/10 (1 hint)"));
    }

    #[test]
    fn progress_survives_restart() {
        let registry = Registry::builtin().unwrap();
        let path = state_path("resume");

        let first = engine(&registry);
        play(&first, Some(&path), &format!("{}\nquit\n", wrong(&first)));

        let second = engine(&registry);
        let text = play(&second, Some(&path), "status\n");
        assert!(text.contains("Welcome back"));
        assert!(text.contains("Attempts used: 1/10"));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn finished_game_updates_stats_once() {
        let registry = Registry::builtin().unwrap();
        let path = state_path("stats");

        let first = engine(&registry);
        play(&first, Some(&path), &format!("{}\n", answer(&first)));
        let save = SaveFile::load(&path).unwrap();
        assert_eq!(save.stats.games_played, 1);
        assert_eq!(save.stats.games_won, 1);
        assert_eq!(save.stats.guess_distribution.get(&1), Some(&1));
        assert!(save.session.as_ref().is_some_and(|s| s.won));

        let again = engine(&registry);
        let text = play(&again, Some(&path), "stats\n");
        assert!(text.contains("already finished"));
        assert_eq!(SaveFile::load(&path).unwrap().stats.games_played, 1);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
