//! TUI application state and logic

use crate::core::Feedback;
use crate::game::{
    Clock, Engine, EngineError, LocalProfile, Outcome, Resume, Reveal, Session, SessionState,
    SessionStatus,
};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Longest guess line accepted from the keyboard
const MAX_INPUT: usize = 80;

/// Everything the renderer needs about today's game
#[derive(Debug, Clone)]
pub struct Board {
    pub status: SessionStatus,
    pub rows: Vec<(Vec<i64>, Feedback)>,
    pub len: usize,
    pub width: usize,
    pub reveal: Option<Reveal>,
    pub share: Option<String>,
}

/// Application state
pub struct App<'e, 'a, C: Clock> {
    pub engine: &'e Engine<'a, C>,
    pub profile: LocalProfile,
    pub board: Board,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub messages: Vec<Message>,
    pub show_help: bool,
    pub show_share: bool,
    pub should_quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Guessing,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub style: MessageStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Error,
}

impl<'e, 'a, C: Clock> App<'e, 'a, C> {
    /// Start on today's puzzle, resuming the profile's saved session
    ///
    /// # Errors
    ///
    /// Returns an error if today's puzzle cannot be generated.
    pub fn new(engine: &'e Engine<'a, C>, profile: LocalProfile) -> Result<Self> {
        let board = snapshot(engine, &profile)?;
        let mut app = Self {
            engine,
            profile,
            board,
            input_mode: InputMode::Guessing,
            input_buffer: String::new(),
            messages: Vec::new(),
            show_help: false,
            show_share: false,
            should_quit: false,
        };

        match app.profile.resume(engine)? {
            Resume::Fresh => app.add_message(
                &format!(
                    "Welcome! Guess the {} numbers. Press '?' for help.",
                    app.board.len
                ),
                MessageStyle::Info,
            ),
            Resume::Restored => {
                app.add_message("Welcome back! Your progress was restored.", MessageStyle::Success);
            }
            Resume::Discarded(e) => {
                app.add_message(
                    &format!("Saved game could not be restored: {e}"),
                    MessageStyle::Error,
                );
            }
        }
        app.refresh()?;
        if app.input_mode == InputMode::Finished {
            app.add_message("You've already finished today's puzzle.", MessageStyle::Info);
        }
        Ok(app)
    }

    /// Re-read today's session from the engine
    ///
    /// # Errors
    ///
    /// Returns an error if today's puzzle cannot be generated.
    pub fn refresh(&mut self) -> Result<()> {
        self.board = snapshot(self.engine, &self.profile)?;
        self.input_mode = if self.board.status.state.is_complete() {
            InputMode::Finished
        } else {
            InputMode::Guessing
        };
        Ok(())
    }

    pub fn submit_guess(&mut self) {
        let input = self.input_buffer.trim().to_string();
        if input.is_empty() {
            return;
        }

        match self.engine.guess(self.profile.key(), &input) {
            Ok(report) => {
                self.input_buffer.clear();
                if report.reveal.is_some() {
                    self.finish();
                } else {
                    self.add_message(
                        &format!(
                            "{} correct, {} misplaced, {} left",
                            report.feedback.count_correct(),
                            report.feedback.count_present(),
                            report.attempts_remaining
                        ),
                        MessageStyle::Info,
                    );
                }
            }
            Err(e) => self.report(&e),
        }
        self.sync();
    }

    pub fn request_hint(&mut self) {
        match self.engine.hint(self.profile.key(), &mut rand::rng()) {
            Ok(hint) => self.add_message(
                &format!("💡 Position {} is {}", hint.position + 1, hint.value),
                MessageStyle::Success,
            ),
            Err(e) => self.report(&e),
        }
        self.sync();
    }

    pub fn give_up(&mut self) {
        match self.engine.forfeit(self.profile.key()) {
            Ok(_) => self.finish(),
            Err(e) => self.report(&e),
        }
        self.sync();
    }

    pub fn toggle_share(&mut self) {
        if self.board.share.is_some() {
            self.show_share = !self.show_share;
        } else {
            self.add_message("Finish today's puzzle first, then share.", MessageStyle::Error);
        }
    }

    pub fn add_message(&mut self, text: &str, style: MessageStyle) {
        self.messages.push(Message {
            text: text.to_string(),
            style,
        });

        // Keep only last 5 messages
        if self.messages.len() > 5 {
            self.messages.remove(0);
        }
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match (self.input_mode, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q')) => self.should_quit = true,
            (_, KeyCode::Char('?')) => self.show_help = true,
            (_, KeyCode::Char('s')) => self.toggle_share(),
            (InputMode::Guessing, KeyCode::Char('h')) => self.request_hint(),
            (InputMode::Guessing, KeyCode::Char('g')) => self.give_up(),
            (InputMode::Guessing, KeyCode::Char(c))
                if (c.is_ascii_digit() || c == ' ' || c == ',')
                    && self.input_buffer.len() < MAX_INPUT =>
            {
                self.input_buffer.push(c);
            }
            (InputMode::Guessing, KeyCode::Backspace) => {
                self.input_buffer.pop();
            }
            (InputMode::Guessing, KeyCode::Enter) => self.submit_guess(),
            _ => {}
        }
    }

    fn finish(&mut self) {
        let won_in = self
            .engine
            .status(self.profile.key())
            .ok()
            .filter(|status| status.state == SessionState::Complete(Outcome::Won))
            .map(|status| status.attempts_used);

        let (celebration, style) = match won_in {
            Some(1) => ("🎯 FIRST TRY! Extraordinary! 🌟", MessageStyle::Success),
            Some(2 | 3) => ("🔥 MAGNIFICENT! 🔥", MessageStyle::Success),
            Some(4..=6) => ("✨ SPLENDID! ✨", MessageStyle::Success),
            Some(_) => ("😅 PHEW! Got it! 😅", MessageStyle::Success),
            None => ("The answer is revealed. Better luck tomorrow!", MessageStyle::Info),
        };
        self.add_message(celebration, style);

        match self.profile.record_outcome(self.engine) {
            Ok(true) => {
                let streak = self.profile.stats().current_streak;
                self.add_message(&format!("Current streak: {streak}"), MessageStyle::Info);
            }
            Ok(false) => {}
            Err(e) => self.report(&e),
        }
        self.add_message("Press 's' to share or 'q' to quit.", MessageStyle::Info);
    }

    /// Persist and re-read the board; failures become messages
    fn sync(&mut self) {
        if let Err(e) = self.profile.persist(self.engine) {
            self.add_message(&format!("Could not save progress: {e}"), MessageStyle::Error);
        }
        if let Err(e) = self.refresh() {
            self.add_message(&e.to_string(), MessageStyle::Error);
        }
    }

    fn report(&mut self, err: &EngineError) {
        self.add_message(&err.to_string(), MessageStyle::Error);
    }
}

fn snapshot<C: Clock>(engine: &Engine<'_, C>, profile: &LocalProfile) -> Result<Board> {
    let key = profile.key();
    let status = engine.status(key)?;
    let (rows, len) = engine.inspect(key, |session: &Session| {
        let rows: Vec<(Vec<i64>, Feedback)> = session
            .guesses()
            .iter()
            .map(|g| g.values().to_vec())
            .zip(session.feedback().iter().cloned())
            .collect();
        (rows, session.puzzle().len())
    })?;

    Ok(Board {
        status,
        rows,
        len,
        width: engine.selector().max_digits(),
        reveal: engine.answer(key)?,
        share: engine.share(key)?,
    })
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui<C: Clock>(app: App<'_, '_, C>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    mut app: App<'_, '_, C>,
) -> Result<()> {
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (fixes Windows double-input bug)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{SessionKey, SessionLimits};
    use crate::puzzle::{DailySelector, PlayabilityFilter};
    use crate::rules::Registry;
    use chrono::{DateTime, TimeZone, Utc};

    fn engine(registry: &Registry) -> Engine<'_, impl Fn() -> DateTime<Utc>> {
        let selector = DailySelector::new(registry, PlayabilityFilter::default(), 7).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 12, 24, 7, 0, 0).unwrap();
        Engine::with_clock(selector, SessionLimits::default(), move || now)
    }

    fn app<'e, 'a, C: Clock>(engine: &'e Engine<'a, C>) -> App<'e, 'a, C> {
        let profile = LocalProfile::load(SessionKey::new("me", "tui"), None).unwrap();
        App::new(engine, profile).unwrap()
    }

    fn press(app: &mut App<'_, '_, impl Clock>, keys: &str) {
        for c in keys.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                '\u{8}' => KeyCode::Backspace,
                c => KeyCode::Char(c),
            };
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }
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

    #[test]
    fn typing_filters_non_numeric_keys() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        press(&mut app, "1x2,3 \u{8}");
        assert_eq!(app.input_buffer, "12,3");
    }

    #[test]
    fn winning_guess_finishes_game() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        press(&mut app, &format!("{}\n", answer(&engine)));

        assert_eq!(app.input_mode, InputMode::Finished);
        assert_eq!(app.board.status.state, SessionState::Complete(Outcome::Won));
        assert_eq!(app.board.rows.len(), 1);
        assert!(app.board.reveal.is_some());
        assert!(app.input_buffer.is_empty());
        assert_eq!(app.profile.stats().games_won, 1);

        press(&mut app, "s");
        assert!(app.show_share);
    }

    #[test]
    fn invalid_guess_keeps_input_and_reports() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        press(&mut app, "1 2 3\n");

        assert_eq!(app.input_buffer, "1 2 3");
        assert_eq!(app.board.rows.len(), 0);
        let last = app.messages.last().unwrap();
        assert_eq!(last.style, MessageStyle::Error);
    }

    #[test]
    fn hint_then_give_up() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        press(&mut app, "h");
        assert_eq!(app.board.status.hints_used, 1);

        press(&mut app, "g");
        assert_eq!(app.input_mode, InputMode::Finished);
        assert!(app.board.share.as_ref().is_some_and(|s| s.contains("X/10 (1 hint)")));
        assert_eq!(app.profile.stats().current_streak, 0);

        // Game keys do nothing once finished
        press(&mut app, "h1");
        assert_eq!(app.board.status.hints_used, 1);
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn share_before_finish_is_refused() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        press(&mut app, "s");
        assert!(!app.show_share);
        assert_eq!(app.messages.last().unwrap().style, MessageStyle::Error);
    }

    #[test]
    fn help_overlay_swallows_next_key() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        press(&mut app, "?");
        assert!(app.show_help);
        press(&mut app, "q");
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, "q");
        assert!(app.should_quit);
    }

    #[test]
    fn messages_are_capped() {
        let registry = Registry::builtin().unwrap();
        let engine = engine(&registry);
        let mut app = app(&engine);

        for i in 0..10 {
            app.add_message(&i.to_string(), MessageStyle::Info);
        }
        assert_eq!(app.messages.len(), 5);
        assert_eq!(app.messages[0].text, "5");
    }
}
