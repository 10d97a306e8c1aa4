//! Composer flow driven by key presses
//!
//! Types a post the way a user would and checks what reaches the editor
//! and what the publish request carries.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libquill::store::{reduce as store_reduce, State};
use libquill::types::ParagraphKind;
use libquill::{EditorStep, Paragraph, Route, Store, Topic};
use quill_tui::app::{handle, map_key, Action, AppState, ComposerField, Effect};

fn press(state: AppState, data: &State, event: KeyEvent) -> AppState {
    match map_key(&state, data, event) {
        Some(action) => quill_tui::reduce(state, action),
        None => state,
    }
}

fn type_text(mut state: AppState, data: &State, text: &str) -> AppState {
    for c in text.chars() {
        state = press(state, data, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    state
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn topics() -> Vec<Topic> {
    ["Rust", "Operations", "Gardening"]
        .iter()
        .map(|title| Topic {
            uuid: String::new(),
            title: title.to_string(),
            description: String::new(),
            url: title.to_lowercase(),
        })
        .collect()
}

#[test]
fn test_title_and_description_fields() {
    let data = State::new();
    let state = AppState::at(Route::Create);

    let state = type_text(state, &data, "Hello");
    let state = press(state, &data, key(KeyCode::Tab));
    let state = type_text(state, &data, "A first post");
    let state = press(state, &data, key(KeyCode::Backspace));

    assert_eq!(state.editor.title, "Hello");
    assert_eq!(state.editor.description, "A first pos");
}

#[test]
fn test_paragraph_typing_and_newline() {
    let data = State::new();
    let state = AppState::at(Route::Create);

    let state = press(state, &data, ctrl('p'));
    assert_eq!(state.composer.field, ComposerField::Paragraph(0));

    let state = type_text(state, &data, "one");
    let state = press(state, &data, key(KeyCode::Enter));
    let state = type_text(state, &data, "two");

    assert_eq!(state.editor.paragraph(0).unwrap().content, "one\ntwo");
}

#[test]
fn test_kind_cycles_and_keeps_content() {
    let data = State::new();
    let state = press(AppState::at(Route::Create), &data, ctrl('p'));
    let state = type_text(state, &data, "fn main() {}");

    let state = press(state, &data, ctrl('t'));
    let paragraph = state.editor.paragraph(0).unwrap();

    assert_eq!(paragraph.kind, ParagraphKind::Code);
    assert_eq!(paragraph.content, "fn main() {}");
}

#[test]
fn test_list_paragraph_collects_items() {
    let data = State::new();
    let mut state = press(AppState::at(Route::Create), &data, ctrl('p'));
    for _ in 0..3 {
        state = press(state, &data, ctrl('t'));
    }
    assert_eq!(state.editor.paragraph(0).unwrap().kind, ParagraphKind::List);

    let state = type_text(state, &data, "milk");
    let state = press(state, &data, key(KeyCode::Enter));
    let state = type_text(state, &data, "eggs");
    let state = press(state, &data, key(KeyCode::Enter));

    assert_eq!(state.editor.paragraph(0).unwrap().items, vec!["milk", "eggs"]);
    assert!(state.composer.pending_item.is_empty());
}

#[test]
fn test_list_items_kept_when_cycling_back_to_text() {
    let data = State::new();
    let mut state = press(AppState::at(Route::Create), &data, ctrl('p'));
    for _ in 0..3 {
        state = press(state, &data, ctrl('t'));
    }
    let state = type_text(state, &data, "milk");
    let state = press(state, &data, key(KeyCode::Enter));
    let state = type_text(state, &data, "eggs");
    let state = press(state, &data, key(KeyCode::Enter));

    let state = press(state, &data, ctrl('t'));
    let paragraph = state.editor.paragraph(0).unwrap();

    assert_eq!(paragraph.kind, ParagraphKind::Text);
    assert_eq!(paragraph.content, "milk\neggs");
}

#[test]
fn test_details_step_topic_search_and_toggle() {
    let data = store_reduce(State::new(), libquill::Action::TopicsLoaded(topics()));
    let state = press(AppState::at(Route::Create), &data, ctrl('n'));
    assert_eq!(state.editor.step, EditorStep::Details);
    assert_eq!(state.composer.field, ComposerField::ImageUrl);

    let state = press(state, &data, key(KeyCode::Tab));
    let state = type_text(state, &data, "rat");
    assert_eq!(state.editor.matching_topics(data.topic_list()).len(), 1);

    let state = press(state, &data, key(KeyCode::Enter));
    assert_eq!(
        state.editor.selected_topic.as_ref().map(|t| t.title.as_str()),
        Some("Operations")
    );

    // Choosing it again clears the choice
    let state = press(state, &data, key(KeyCode::Enter));
    assert!(state.editor.selected_topic.is_none());
}

#[test]
fn test_previous_step_keeps_content() {
    let data = State::new();
    let state = type_text(AppState::at(Route::Create), &data, "Kept");
    let state = press(state, &data, ctrl('n'));
    let state = press(state, &data, ctrl('b'));

    assert_eq!(state.editor.step, EditorStep::Content);
    assert_eq!(state.editor.title, "Kept");
}

#[test]
fn test_publish_request_carries_editor() {
    let mut store = Store::new();
    let ui = type_text(AppState::at(Route::Create), store.state(), "Title");

    let (ui, effects) = handle(ui, &mut store, Action::Publish);

    assert!(ui.composer.publishing);
    match &effects[..] {
        [Effect::Publish { session, editor }] => {
            assert!(session.is_none());
            assert_eq!(editor.title, "Title");
        }
        other => panic!("unexpected effects {:?}", other),
    }
}

#[test]
fn test_finished_publish_opens_post_and_resets() {
    let mut store = Store::new();
    let ui = type_text(AppState::at(Route::Create), store.state(), "Title");
    let (ui, _) = handle(ui, &mut store, Action::Publish);

    let (ui, effects) = handle(ui, &mut store, Action::PublishFinished(Ok(12)));

    assert_eq!(ui.route, Route::Post { id: "12".to_string() });
    assert!(ui.editor.title.is_empty());
    assert!(!ui.composer.publishing);
    assert_eq!(effects, vec![Effect::FetchPost("12".to_string())]);
}

#[test]
fn test_failed_publish_keeps_draft() {
    let mut store = Store::new();
    let ui = type_text(AppState::at(Route::Create), store.state(), "Title");
    let (ui, _) = handle(ui, &mut store, Action::Publish);

    let (ui, _) = handle(
        ui,
        &mut store,
        Action::PublishFinished(Err("Please select a topic".to_string())),
    );

    assert_eq!(ui.route, Route::Create);
    assert_eq!(ui.editor.title, "Title");
    assert!(!ui.composer.publishing);
}

#[test]
fn test_submitted_post_matches_typed_content() {
    let data = store_reduce(State::new(), libquill::Action::TopicsLoaded(topics()));
    let state = type_text(AppState::at(Route::Create), &data, "Title");
    let state = press(state, &data, ctrl('p'));
    let state = type_text(state, &data, "Body");
    let state = press(state, &data, ctrl('n'));
    let state = press(state, &data, key(KeyCode::Enter));

    let post = state.editor.submit().unwrap();

    assert_eq!(post.title, "Title");
    assert_eq!(post.topic, "rust");
    assert_eq!(post.paragraphs, vec![Paragraph::Text("Body".to_string())]);
}
