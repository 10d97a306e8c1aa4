//! Keybindings
//!
//! Maps a key press, read against the current UI and store state, to the
//! high-level action it stands for. Keys that mean nothing in the current
//! view map to `None`.
//!
//! In the login and composer views plain characters are typed text, so
//! commands there use function keys or Ctrl.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libquill::store::State;
use libquill::{EditorStep, Route};

use super::actions::Action;
use super::effects::navigate;
use super::state::{AppState, ComposerField};

pub fn map_key(ui: &AppState, data: &State, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keybindings (work everywhere)
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::F(1) => return Some(Action::ToggleHelp),
        KeyCode::Esc if ui.error.is_some() => return Some(Action::DismissError),
        KeyCode::Esc if ui.help_visible => return Some(Action::HideHelp),
        _ => {}
    }

    // Overlays swallow everything else
    if ui.error.is_some() || ui.help_visible {
        return None;
    }

    match key.code {
        KeyCode::F(n @ 2..=6) => {
            return Some(navigate(Route::NAV[usize::from(n - 2)].clone(), data));
        }
        KeyCode::Char('r') if ctrl => return Some(Action::Refresh),
        KeyCode::Esc => return Some(Action::Back),
        _ => {}
    }

    match ui.route {
        Route::Login => login_key(ui, key),
        Route::Create => composer_key(ui, data, key),
        _ => browse_key(ui, data, key),
    }
}

/// Keys in the read-only views
fn browse_key(ui: &AppState, data: &State, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            return Some(navigate(Route::NAV[index].clone(), data));
        }
        KeyCode::Char('r') => return Some(Action::Refresh),
        KeyCode::Char('b') | KeyCode::Backspace => return Some(Action::Back),
        KeyCode::Char('o') => return Some(Action::Logout),
        KeyCode::Down | KeyCode::Char('j') => {
            return Some(Action::SelectNext {
                len: list_len(ui, data),
            })
        }
        KeyCode::Up | KeyCode::Char('k') => return Some(Action::SelectPrevious),
        KeyCode::Enter => return open_selected(ui, data),
        _ => {}
    }

    match (&ui.route, key.code) {
        (Route::AllPosts, KeyCode::Char('m')) => Some(Action::LoadMore),
        (Route::Topic { .. }, KeyCode::Tab) => Some(Action::ToggleSidePane),
        (Route::Post { id }, KeyCode::Char('l')) => data.post(id).map(|post| Action::Like(post.id)),
        (Route::Post { id }, KeyCode::Char('d')) => {
            let post = data.post(id)?;
            let user = data.user()?;
            post.is_owned_by(user).then_some(Action::Delete(post.id))
        }
        (Route::Post { id }, KeyCode::Char('t')) => {
            let term = data.post(id)?.topic.clone()?;
            Some(navigate(Route::Topic { term }, data))
        }
        (Route::YourPosts, KeyCode::Char('d')) => data
            .user_posts
            .ready()
            .and_then(|posts| posts.get(ui.selected))
            .map(|post| Action::Delete(post.id)),
        _ => None,
    }
}

fn login_key(ui: &AppState, key: KeyEvent) -> Option<Action> {
    if ui.login.submitting {
        return None;
    }

    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Some(Action::NextField),
        KeyCode::Enter => Some(Action::SubmitLogin),
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ToggleRegister)
        }
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if is_typed(key) => Some(Action::Input(c)),
        _ => None,
    }
}

fn composer_key(ui: &AppState, data: &State, key: KeyEvent) -> Option<Action> {
    if ui.composer.publishing {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let step = ui.editor.step;

    match key.code {
        KeyCode::Char('s') if ctrl => return Some(Action::Publish),
        KeyCode::Char('n') if ctrl && step == EditorStep::Content => {
            return Some(Action::NextStep)
        }
        KeyCode::Char('b') if ctrl && step == EditorStep::Details => {
            return Some(Action::PreviousStep)
        }
        KeyCode::Tab => return Some(Action::NextField),
        KeyCode::BackTab => return Some(Action::PreviousField),
        KeyCode::Backspace => return Some(Action::Backspace),
        _ => {}
    }

    match step {
        EditorStep::Content => match key.code {
            KeyCode::Char('p') if ctrl => Some(Action::AddParagraph),
            KeyCode::Char('t') if ctrl => match ui.composer.field {
                ComposerField::Paragraph(index) => ui
                    .editor
                    .paragraph(index)
                    .map(|p| Action::SetParagraphKind(p.kind.next())),
                _ => None,
            },
            KeyCode::Enter => match ui.composer.field {
                ComposerField::Paragraph(_) => Some(Action::Newline),
                _ => Some(Action::NextField),
            },
            KeyCode::Char(c) if is_typed(key) => Some(Action::Input(c)),
            _ => None,
        },
        EditorStep::Details => {
            let matching = ui.editor.matching_topics(data.topic_list());
            match key.code {
                KeyCode::Down => Some(Action::SelectNext {
                    len: matching.len(),
                }),
                KeyCode::Up => Some(Action::SelectPrevious),
                KeyCode::Enter => matching
                    .get(ui.composer.topic_cursor)
                    .map(|topic| Action::ToggleTopic((*topic).clone())),
                KeyCode::Char(c) if is_typed(key) => Some(Action::Input(c)),
                _ => None,
            }
        }
    }
}

/// Plain (possibly shifted) character meant as text
fn is_typed(key: KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Length of the list the cursor moves in
fn list_len(ui: &AppState, data: &State) -> usize {
    match &ui.route {
        Route::Home => data.topic_list().len(),
        Route::AllPosts => data.post_list().len(),
        Route::Topic { .. } if ui.side_focus => data.topic_list().len(),
        Route::Topic { term } => data.posts_in_topic(term).map_or(0, <[_]>::len),
        Route::YourPosts => data.user_posts.ready().map_or(0, Vec::len),
        // Scroll offset for the post text
        Route::Post { id } => data
            .post(id)
            .map_or(0, |post| crate::ui::posts::post_lines(post).len()),
        _ => 0,
    }
}

/// Enter on a list entry opens it
fn open_selected(ui: &AppState, data: &State) -> Option<Action> {
    let route = match &ui.route {
        Route::Home => topic_route(data, ui.selected)?,
        Route::Topic { .. } if ui.side_focus => topic_route(data, ui.side_selected)?,
        Route::AllPosts => post_route(data.post_list(), ui.selected)?,
        Route::Topic { term } => post_route(data.posts_in_topic(term)?, ui.selected)?,
        Route::YourPosts => post_route(data.user_posts.ready()?, ui.selected)?,
        Route::NotFound { .. } => Route::Home,
        _ => return None,
    };
    Some(navigate(route, data))
}

fn topic_route(data: &State, index: usize) -> Option<Route> {
    data.topic_list().get(index).map(|topic| Route::Topic {
        term: topic.url.clone(),
    })
}

fn post_route(posts: &[libquill::Post], index: usize) -> Option<Route> {
    posts.get(index).map(|post| Route::Post {
        id: post.route_id(),
    })
}
