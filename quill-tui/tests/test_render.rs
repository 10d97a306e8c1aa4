//! Rendering against an in-memory terminal

use std::time::Duration;

use chrono::Utc;
use libquill::store::{reduce as store_reduce, State};
use libquill::{Notification, Paragraph, Post, Route, Topic};
use quill_tui::app::AppState;
use quill_tui::ui::render;
use ratatui::{backend::TestBackend, Terminal};

fn draw(ui: &AppState, data: &State) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| render(frame, ui, data)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn post() -> Post {
    Post {
        id: 3,
        uuid: String::new(),
        title: "Borrowing".to_string(),
        description: "Notes on lifetimes".to_string(),
        text: String::new(),
        likes: 2,
        image_url: String::new(),
        created_at: None,
        user: None,
        topic: None,
        paragraphs: vec![
            Paragraph::Code("let x = &y;".to_string()),
            Paragraph::List(vec!["shared".to_string(), "unique".to_string()]),
        ],
    }
}

#[test]
fn test_home_lists_topics() {
    let data = store_reduce(
        State::new(),
        libquill::Action::TopicsLoaded(vec![Topic {
            uuid: String::new(),
            title: "Rust".to_string(),
            description: String::new(),
            url: "rust".to_string(),
        }]),
    );

    let screen = draw(&AppState::new(), &data);

    assert!(screen.contains("Welcome to Quill"));
    assert!(screen.contains("Rust"));
}

#[test]
fn test_post_view_renders_paragraphs() {
    let data = store_reduce(State::new(), libquill::Action::PostRequested("3".to_string()));
    let data = store_reduce(
        data,
        libquill::Action::PostLoaded {
            id: "3".to_string(),
            post: post(),
        },
    );

    let screen = draw(
        &AppState::at(Route::Post {
            id: "3".to_string(),
        }),
        &data,
    );

    assert!(screen.contains("Borrowing"));
    assert!(screen.contains("let x = &y;"));
    assert!(screen.contains("• unique"));
}

#[test]
fn test_post_fetch_error_shown_inline() {
    let data = store_reduce(State::new(), libquill::Action::PostRequested("9".to_string()));
    let data = store_reduce(
        data,
        libquill::Action::PostFailed {
            id: "9".to_string(),
            error: "Not found".to_string(),
        },
    );

    let screen = draw(
        &AppState::at(Route::Post {
            id: "9".to_string(),
        }),
        &data,
    );

    assert!(screen.contains("Could not load post"));
}

#[test]
fn test_login_masks_password() {
    let mut ui = AppState::at(Route::Login);
    ui.login.username = "ferris".to_string();
    ui.login.password = "hunter2".to_string();

    let screen = draw(&ui, &State::new());

    assert!(screen.contains("ferris"));
    assert!(!screen.contains("hunter2"));
    assert!(screen.contains("*******"));
}

#[test]
fn test_login_view_shows_register_mode() {
    let mut ui = AppState::at(Route::Login);
    assert!(draw(&ui, &State::new()).contains("Ctrl+N: create an account"));

    ui.login.register = true;
    let screen = draw(&ui, &State::new());
    assert!(screen.contains("Create account"));
    assert!(screen.contains("Enter to create the account"));
}

#[test]
fn test_notification_toast_visible() {
    let data = store_reduce(
        State::new(),
        libquill::Action::NotificationShown(
            Notification::success("Your post has successfully been published!")
                .shown_at(Utc::now(), Duration::from_secs(5)),
        ),
    );

    let screen = draw(&AppState::new(), &data);

    assert!(screen.contains("published"));
}

#[test]
fn test_unknown_path_renders_not_found() {
    let screen = draw(&AppState::at(Route::parse("/nowhere")), &State::new());

    assert!(screen.contains("Page not found"));
}
