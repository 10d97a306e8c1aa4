//! Login form

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{accent, centered_rect};
use crate::app::{AppState, LoginField};

pub fn render_login(frame: &mut Frame, area: Rect, ui: &AppState) {
    let form_area = centered_rect(60, 80, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Mode
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(2), // Status
            Constraint::Min(0),
        ])
        .split(form_area);

    let form = &ui.login;
    let masked = "*".repeat(form.password.chars().count());

    let (heading, other) = if form.register {
        ("Create account", "Ctrl+N: log in instead")
    } else {
        ("Log in", "Ctrl+N: create an account")
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(heading, accent(ui).add_modifier(Modifier::BOLD)),
            Span::styled(format!("   {}", other), Style::default().fg(Color::Gray)),
        ])),
        chunks[0],
    );

    frame.render_widget(
        input(ui, "Username", &form.username, form.field == LoginField::Username),
        chunks[1],
    );
    frame.render_widget(
        input(ui, "Password", &masked, form.field == LoginField::Password),
        chunks[2],
    );

    let (status, color) = match (form.submitting, form.register) {
        (true, true) => ("Creating account...", Color::Yellow),
        (true, false) => ("Logging in...", Color::Yellow),
        (false, true) => ("Enter to create the account", Color::Gray),
        (false, false) => ("Enter to log in", Color::Gray),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(color))),
        chunks[3],
    );
}

/// Single-line text box; the focused one shows a cursor and accent border
pub(crate) fn input<'a>(ui: &AppState, label: &'a str, value: &str, focused: bool) -> Paragraph<'a> {
    let border = if focused {
        accent(ui).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::raw(value.to_string())];
    if focused {
        spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }

    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(format!(" {} ", label))
            .borders(Borders::ALL)
            .border_style(border),
    )
}
