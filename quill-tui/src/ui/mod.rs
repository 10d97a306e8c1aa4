//! UI rendering
//!
//! Pure rendering functions that turn UI state plus store state into a
//! frame. Nothing here changes state.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use libquill::store::State;
use libquill::{NotificationKind, Route};

use crate::app::AppState;

pub mod composer;
pub mod login;
pub mod posts;

/// Render the whole screen
pub fn render(frame: &mut Frame, ui: &AppState, data: &State) {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navbar
            Constraint::Min(3),    // View
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_navbar(frame, chunks[0], ui, data);

    match &ui.route {
        Route::Home => posts::render_home(frame, chunks[1], ui, data),
        Route::AllPosts => posts::render_all_posts(frame, chunks[1], ui, data),
        Route::Post { id } => posts::render_post(frame, chunks[1], ui, data, id),
        Route::Topic { term } => posts::render_topic(frame, chunks[1], ui, data, term),
        Route::YourPosts => posts::render_your_posts(frame, chunks[1], ui, data),
        Route::Login => login::render_login(frame, chunks[1], ui),
        Route::Create => composer::render_composer(frame, chunks[1], ui, data),
        Route::NotFound { path } => render_not_found(frame, chunks[1], path),
    }

    render_hints(frame, chunks[2], ui);

    if let Some(active) = &data.notification {
        render_toast(
            frame,
            area,
            active.notification.kind,
            &active.notification.content,
        );
    }

    if ui.help_visible {
        render_help_overlay(frame, area);
    }

    if let Some(error) = &ui.error {
        render_error_overlay(frame, area, error);
    }
}

/// Tab bar with the navigation routes and the signed-in user
fn render_navbar(frame: &mut Frame, area: Rect, ui: &AppState, data: &State) {
    let titles: Vec<Line> = Route::NAV
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let label = match route {
                Route::Login if data.is_logged_in() => "Account".to_string(),
                other => other.title(),
            };
            Line::from(format!("F{} {}", i + 2, label))
        })
        .collect();

    let user = match data.user() {
        Some(user) => format!(" {} ", user.username),
        None if data.session_checked => " not logged in ".to_string(),
        None => " ... ".to_string(),
    };

    let selected = Route::NAV.iter().position(|route| *route == ui.route);
    let mut tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Quill ")
                .title(ratatui::widgets::block::Title::from(user).alignment(Alignment::Right))
                .borders(Borders::ALL),
        )
        .highlight_style(accent(ui).add_modifier(Modifier::BOLD | Modifier::REVERSED));
    if let Some(index) = selected {
        tabs = tabs.select(index);
    }

    frame.render_widget(tabs, area);
}

fn render_hints(frame: &mut Frame, area: Rect, ui: &AppState) {
    let hints = match &ui.route {
        Route::Login => "Tab: switch field | Enter: submit | Ctrl+N: log in / sign up | Esc: back | F1: help",
        Route::Create => match ui.editor.step {
            libquill::EditorStep::Content => {
                "Ctrl+P: paragraph | Ctrl+T: type | Ctrl+N: details | Ctrl+S: publish | F1: help"
            }
            libquill::EditorStep::Details => {
                "Up/Down + Enter: topic | Ctrl+B: back | Ctrl+S: publish | F1: help"
            }
        },
        Route::Post { .. } => "l: like | d: delete | t: topic | b: back | r: refresh | q: quit",
        Route::AllPosts => "Enter: open | m: more | r: refresh | q: quit | F1: help",
        Route::Topic { .. } => "Enter: open | Tab: topics | b: back | q: quit | F1: help",
        _ => "Enter: open | r: refresh | q: quit | F1: help",
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, Style::default().fg(Color::Gray)))),
        area,
    );
}

fn render_not_found(frame: &mut Frame, area: Rect, path: &str) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Page not found",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Nothing lives at {}", path)),
        Line::from(""),
        Line::from("Press Enter to go home"),
    ])
    .block(Block::default().title(" Not found ").borders(Borders::ALL))
    .alignment(Alignment::Center);

    frame.render_widget(text, area);
}

/// Transient notification in the top-right corner
fn render_toast(frame: &mut Frame, area: Rect, kind: NotificationKind, content: &str) {
    let color = match kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
        NotificationKind::Info => Color::Cyan,
    };

    let wanted = content.chars().count().min(200) as u16 + 4;
    let width = wanted.min(area.width / 2).max(20).min(area.width);
    let toast_area = Rect {
        x: area.right().saturating_sub(width + 1).max(area.x),
        y: area.y + 1,
        width,
        height: 3.min(area.height.saturating_sub(1)),
    };

    let toast = Paragraph::new(content.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, toast_area);
    frame.render_widget(toast, toast_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Global:"),
        Line::from("  F1        - Toggle help"),
        Line::from("  F2-F6     - Home, All posts, Write, Your posts, Login"),
        Line::from("  Ctrl+R    - Refresh"),
        Line::from("  Esc       - Close overlay / back"),
        Line::from("  Ctrl+C    - Quit"),
        Line::from(""),
        Line::from("Reading:"),
        Line::from("  j/k, Up/Down - Move   Enter - Open   b - Back"),
        Line::from("  1-5       - Jump to a tab   q - Quit   o - Log out"),
        Line::from("  m         - Load older posts"),
        Line::from("  l / d / t - Like / delete own post / open its topic"),
        Line::from(""),
        Line::from("Login:"),
        Line::from("  Ctrl+N    - Switch between log in and new account"),
        Line::from(""),
        Line::from("Writing:"),
        Line::from("  Tab       - Next field"),
        Line::from("  Ctrl+P    - Add paragraph   Ctrl+T - Change its type"),
        Line::from("  Enter     - New line, or add item in a list"),
        Line::from("  Ctrl+N / Ctrl+B - Details step / back"),
        Line::from("  Ctrl+S    - Publish"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}

fn render_error_overlay(frame: &mut Frame, area: Rect, error: &str) {
    let popup_area = centered_rect(70, 30, area);

    let error_text = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from("Press Esc to dismiss"),
    ];

    let error_widget = Paragraph::new(error_text)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_widget, popup_area);
}

/// Highlight style, plain when colors are disabled
pub(crate) fn accent(ui: &AppState) -> Style {
    if ui.config.colors_enabled {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Centered rectangle taking the given percentages of `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
