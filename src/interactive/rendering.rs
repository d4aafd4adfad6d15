//! TUI rendering with ratatui
//!
//! Board, hints and messages for the daily puzzle.

use super::app::{App, InputMode, MessageStyle};
use crate::core::Verdict;
use crate::game::{Clock, Outcome, SessionState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};

/// Main UI rendering function
pub fn ui<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Input area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Board
            Constraint::Percentage(40), // Progress and messages
        ])
        .split(chunks[1]);

    render_board(f, app, main_chunks[0]);
    render_info_panel(f, app, main_chunks[1]);
    render_input(f, app, chunks[2]);
    render_status(f, app, chunks[3]);

    if app.show_help {
        render_help(f, app);
    } else if app.show_share {
        render_share(f, app);
    }
}

fn render_header<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>, area: Rect) {
    let header = Paragraph::new(format!(
        "🔢 NUMERICLE - Puzzle {}",
        app.board.status.puzzle_id
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

const fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Correct => Color::Green,
        Verdict::Present => Color::Yellow,
        Verdict::Absent => Color::DarkGray,
    }
}

fn render_board<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>, area: Rect) {
    let board = &app.board;
    let width = board.width;
    let mut lines = Vec::new();

    for (i, (values, feedback)) in board.rows.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{:>2}. ", i + 1),
            Style::default().fg(Color::DarkGray),
        )];
        for (value, &verdict) in values.iter().zip(feedback.verdicts()) {
            spans.push(Span::styled(
                format!(" {value:>width$} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(verdict_color(verdict))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    // Unplayed rows as placeholders
    for i in board.rows.len()..board.status.max_attempts {
        let placeholder = format!(" {:>width$} ", "·").repeat(board.len);
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
            Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
        ]));
    }

    if !board.status.revealed.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Revealed: ", Style::default().fg(Color::Blue)),
            Span::raw(crate::output::formatters::format_hint_line(
                &board.status.revealed,
                board.len,
            )),
        ]));
    }

    if let Some(reveal) = &board.reveal {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("Answer: "),
            Span::styled(
                crate::output::formatters::format_sequence(&reveal.sequence),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(format!("Rule:   {}", reveal.description)));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Board ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

fn render_info_panel<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Attempts gauge
            Constraint::Length(3), // Hints gauge
            Constraint::Min(3),    // Messages
        ])
        .split(area);

    let status = &app.board.status;
    render_gauge(
        f,
        chunks[0],
        " Attempts ",
        status.attempts_used,
        status.max_attempts,
        Color::Cyan,
    );
    render_gauge(
        f,
        chunks[1],
        " Hints ",
        status.hints_used,
        status.hints_used + status.hints_remaining,
        Color::Blue,
    );
    render_messages(f, app, chunks[2]);
}

fn render_gauge(f: &mut Frame, area: Rect, title: &str, used: usize, max: usize, color: Color) {
    let percent = if max == 0 { 0 } else { (used * 100 / max).min(100) as u16 };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(color))
        .percent(percent)
        .label(format!("{used}/{max}"));

    f.render_widget(gauge, area);
}

fn render_messages<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));

    f.render_widget(messages_list, area);
}

fn render_input<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>, area: Rect) {
    let (title, content, color) = match (app.input_mode, app.board.status.state) {
        (InputMode::Finished, SessionState::Complete(Outcome::Won)) => (
            " 🎉 SOLVED! 🎉 | 's' share | 'q' quit ".to_string(),
            "",
            Color::Green,
        ),
        (InputMode::Finished, _) => (
            " Game over | 's' share | 'q' quit ".to_string(),
            "",
            Color::Red,
        ),
        (InputMode::Guessing, _) => (
            format!(
                " Enter {} numbers separated by spaces or commas ",
                app.board.len
            ),
            app.input_buffer.as_str(),
            Color::Yellow,
        ),
    };

    let input = Paragraph::new(content)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(color)),
        );

    f.render_widget(input, area);
}

fn render_status<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let stats = app.profile.stats();
    let stats_text = format!(
        "Played: {} | Win Rate: {:.0}% | Streak: {}",
        stats.games_played,
        stats.win_rate(),
        stats.current_streak
    );
    f.render_widget(
        Paragraph::new(stats_text).alignment(Alignment::Center),
        chunks[0],
    );

    let help_text = match app.input_mode {
        InputMode::Guessing => "Enter: Guess | h: Hint | g: Give up | ?: Help | q: Quit",
        InputMode::Finished => "s: Share | ?: Help | q: Quit",
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[1]);
}

fn render_help<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>) {
    let area = centered_rect(70, 70, f.area());
    let text = app.engine.rules_text();
    let help = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" How to play | any key to close ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn render_share<C: Clock>(f: &mut Frame, app: &App<'_, '_, C>) {
    let Some(card) = &app.board.share else {
        return;
    };
    let area = centered_rect(50, 60, f.area());
    let share = Paragraph::new(card.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Share | 's' to close ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Green)),
        );
    f.render_widget(Clear, area);
    f.render_widget(share, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
