//! Pure reducer for UI state transitions
//!
//! `(AppState, Action) -> AppState`. No I/O happens here: requests to the
//! backend are planned afterwards from the before/after states (see
//! `effects.rs`). Store actions pass through untouched.

use libquill::Route;

use super::actions::Action;
use super::state::{AppState, ComposerField, ComposerState, LoginField, LoginForm};
use libquill::types::ParagraphKind;

/// Views remembered for going back
const HISTORY_LIMIT: usize = 50;

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === Timing / side-effect only ===
        Action::Tick(_)
        | Action::Resize(_, _)
        | Action::Refresh
        | Action::LoadMore
        | Action::Like(_)
        | Action::Delete(_)
        | Action::Logout
        | Action::Store(_) => state,

        // === Navigation ===
        Action::Navigate(route) => navigate(state, route),

        Action::Back => {
            let mut history = state.history;
            match history.pop() {
                Some(route) => AppState {
                    route,
                    history,
                    selected: 0,
                    side_focus: false,
                    side_selected: 0,
                    ..state
                },
                None => AppState { history, ..state },
            }
        }

        Action::Quit if state.is_busy() => state,

        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ToggleHelp => AppState {
            help_visible: !state.help_visible,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        // === Lists ===
        Action::SelectNext { len } => {
            let last = len.saturating_sub(1);
            let mut state = state;
            let cursor = cursor_mut(&mut state);
            *cursor = (*cursor + 1).min(last);
            state
        }

        Action::SelectPrevious => {
            let mut state = state;
            let cursor = cursor_mut(&mut state);
            *cursor = cursor.saturating_sub(1);
            state
        }

        Action::ToggleSidePane => match state.route {
            Route::Topic { .. } => AppState {
                side_focus: !state.side_focus,
                ..state
            },
            _ => state,
        },

        // === Text input ===
        Action::Input(c) => edit_field(state, |text| text.push(c)),

        Action::Backspace => edit_field(state, |text| {
            text.pop();
        }),

        Action::Newline => match state.composer.field {
            ComposerField::Paragraph(index) if state.route == Route::Create => {
                let is_list = state
                    .editor
                    .paragraph(index)
                    .is_some_and(|p| p.kind == ParagraphKind::List);
                if is_list {
                    reduce(state, Action::AddListItem)
                } else {
                    edit_field(state, |text| text.push('\n'))
                }
            }
            _ => state,
        },

        Action::NextField => cycle_field(state, true),

        Action::PreviousField => cycle_field(state, false),

        // === Login ===
        Action::ToggleRegister if state.login.submitting => state,

        Action::ToggleRegister => AppState {
            login: LoginForm {
                register: !state.login.register,
                ..state.login
            },
            ..state
        },

        Action::SubmitLogin if state.login.submitting => state,

        Action::SubmitLogin => AppState {
            login: LoginForm {
                submitting: true,
                ..state.login
            },
            ..state
        },

        Action::LoginFinished { success } => {
            let state = AppState {
                login: LoginForm {
                    password: String::new(),
                    submitting: false,
                    register: state.login.register && !success,
                    field: if success {
                        LoginField::Username
                    } else {
                        LoginField::Password
                    },
                    ..state.login
                },
                ..state
            };
            if success && state.route == Route::Login {
                navigate(state, Route::Home)
            } else {
                state
            }
        }

        // === Composer ===
        Action::AddParagraph => {
            let mut state = state;
            state.editor.append_paragraph();
            let index = state.editor.paragraphs().len() - 1;
            AppState {
                composer: ComposerState {
                    field: ComposerField::Paragraph(index),
                    pending_item: String::new(),
                    ..state.composer
                },
                ..state
            }
        }

        Action::SetParagraphKind(kind) => match state.composer.field {
            ComposerField::Paragraph(index) => {
                let mut state = state;
                match state.editor.change_paragraph_kind(index, kind) {
                    Ok(()) => state,
                    Err(e) => AppState {
                        error: Some(e.to_string()),
                        ..state
                    },
                }
            }
            _ => state,
        },

        Action::AddListItem => match state.composer.field {
            ComposerField::Paragraph(index) => {
                let mut state = state;
                let item = std::mem::take(&mut state.composer.pending_item);
                match state.editor.append_list_item(index, &item) {
                    Ok(()) => state,
                    Err(e) => AppState {
                        error: Some(e.to_string()),
                        composer: ComposerState {
                            pending_item: item,
                            ..state.composer
                        },
                        ..state
                    },
                }
            }
            _ => state,
        },

        Action::NextStep => {
            let mut state = state;
            state.editor.next_step();
            AppState {
                composer: ComposerState {
                    field: ComposerField::ImageUrl,
                    topic_cursor: 0,
                    ..state.composer
                },
                ..state
            }
        }

        Action::PreviousStep => {
            let mut state = state;
            state.editor.previous_step();
            AppState {
                composer: ComposerState {
                    field: ComposerField::Title,
                    ..state.composer
                },
                ..state
            }
        }

        Action::ToggleTopic(topic) => {
            let mut state = state;
            if state.editor.is_selected(&topic) {
                state.editor.clear_topic();
            } else {
                state.editor.select_topic(topic);
            }
            state
        }

        Action::Publish if state.composer.publishing => state,

        Action::Publish => AppState {
            composer: ComposerState {
                publishing: true,
                ..state.composer
            },
            ..state
        },

        Action::PublishFinished(Ok(id)) => {
            let mut state = state;
            state.editor.reset();
            let state = AppState {
                composer: ComposerState::default(),
                ..state
            };
            navigate(state, Route::Post { id: id.to_string() })
        }

        Action::PublishFinished(Err(_)) => AppState {
            composer: ComposerState {
                publishing: false,
                ..state.composer
            },
            ..state
        },

        // === Errors ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState {
            error: None,
            ..state
        },
    }
}

fn navigate(state: AppState, route: Route) -> AppState {
    if route == state.route {
        return state;
    }

    let mut history = state.history;
    history.push(state.route);
    if history.len() > HISTORY_LIMIT {
        history.remove(0);
    }

    AppState {
        route,
        history,
        selected: 0,
        side_focus: false,
        side_selected: 0,
        help_visible: false,
        ..state
    }
}

/// The list cursor the current view moves
fn cursor_mut(state: &mut AppState) -> &mut usize {
    match state.route {
        Route::Create => &mut state.composer.topic_cursor,
        Route::Topic { .. } if state.side_focus => &mut state.side_selected,
        _ => &mut state.selected,
    }
}

/// Apply `edit` to whatever text field has focus
fn edit_field(mut state: AppState, edit: impl FnOnce(&mut String)) -> AppState {
    match state.route {
        Route::Login if !state.login.submitting => {
            match state.login.field {
                LoginField::Username => edit(&mut state.login.username),
                LoginField::Password => edit(&mut state.login.password),
            }
            state
        }
        Route::Create if !state.composer.publishing => {
            match state.composer.field {
                ComposerField::Title => {
                    let mut title = std::mem::take(&mut state.editor.title);
                    edit(&mut title);
                    state.editor.set_title(title);
                }
                ComposerField::Description => {
                    let mut description = std::mem::take(&mut state.editor.description);
                    edit(&mut description);
                    state.editor.set_description(description);
                }
                ComposerField::ImageUrl => {
                    let mut image_url = std::mem::take(&mut state.editor.image_url);
                    edit(&mut image_url);
                    state.editor.set_image_url(image_url);
                }
                ComposerField::TopicSearch => {
                    let mut query = std::mem::take(&mut state.editor.topic_search);
                    edit(&mut query);
                    state.editor.set_topic_search(query);
                    state.composer.topic_cursor = 0;
                }
                ComposerField::Paragraph(index) => {
                    let Some(kind) = state.editor.paragraph(index).map(|p| p.kind) else {
                        return state;
                    };
                    if kind == ParagraphKind::List {
                        edit(&mut state.composer.pending_item);
                    } else {
                        let mut content = state
                            .editor
                            .paragraph(index)
                            .map(|p| p.content.clone())
                            .unwrap_or_default();
                        edit(&mut content);
                        if let Err(e) = state.editor.edit_paragraph_content(index, content) {
                            state.error = Some(e.to_string());
                        }
                    }
                }
            }
            state
        }
        _ => state,
    }
}

fn cycle_field(state: AppState, forward: bool) -> AppState {
    match state.route {
        Route::Login => AppState {
            login: LoginForm {
                field: match state.login.field {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                },
                ..state.login
            },
            ..state
        },
        Route::Create => {
            let fields = composer_fields(&state);
            let current = fields
                .iter()
                .position(|field| *field == state.composer.field)
                .unwrap_or(0);
            let next = if forward {
                (current + 1) % fields.len()
            } else {
                (current + fields.len() - 1) % fields.len()
            };
            AppState {
                composer: ComposerState {
                    field: fields[next],
                    pending_item: String::new(),
                    ..state.composer
                },
                ..state
            }
        }
        _ => state,
    }
}

/// Focus order for the composer's current step
fn composer_fields(state: &AppState) -> Vec<ComposerField> {
    match state.editor.step {
        libquill::EditorStep::Content => {
            let mut fields = vec![ComposerField::Title, ComposerField::Description];
            fields.extend((0..state.editor.paragraphs().len()).map(ComposerField::Paragraph));
            fields
        }
        libquill::EditorStep::Details => {
            vec![ComposerField::ImageUrl, ComposerField::TopicSearch]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libquill::Topic;

    fn composing() -> AppState {
        AppState::at(Route::Create)
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = AppState::new();
        let state_clone = state.clone();

        let new_state = reduce(state_clone.clone(), Action::ShowError("boom".to_string()));

        assert!(state_clone.error.is_none());
        assert_eq!(new_state.error, Some("boom".to_string()));
    }

    #[test]
    fn test_navigate_and_back() {
        let state = reduce(AppState::new(), Action::Navigate(Route::AllPosts));
        let state = reduce(state, Action::SelectNext { len: 5 });
        assert_eq!(state.selected, 1);

        let state = reduce(
            state,
            Action::Navigate(Route::Post {
                id: "3".to_string(),
            }),
        );
        assert_eq!(state.selected, 0);
        assert_eq!(state.history, vec![Route::Home, Route::AllPosts]);

        let state = reduce(state, Action::Back);
        assert_eq!(state.route, Route::AllPosts);
        let state = reduce(state, Action::Back);
        let state = reduce(state, Action::Back);
        assert_eq!(state.route, Route::Home);
    }

    #[test]
    fn test_selection_clamped() {
        let mut state = AppState::at(Route::AllPosts);
        for _ in 0..10 {
            state = reduce(state, Action::SelectNext { len: 3 });
        }
        assert_eq!(state.selected, 2);

        let state = reduce(state, Action::SelectNext { len: 0 });
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_quit_blocked_while_publishing() {
        let state = reduce(composing(), Action::Publish);
        let state = reduce(state, Action::Quit);
        assert!(!state.should_quit);

        let state = reduce(state, Action::PublishFinished(Err("offline".to_string())));
        let state = reduce(state, Action::Quit);
        assert!(state.should_quit);
    }

    #[test]
    fn test_typing_into_paragraph() {
        let mut state = reduce(composing(), Action::AddParagraph);
        for c in "Hi".chars() {
            state = reduce(state, Action::Input(c));
        }
        state = reduce(state, Action::Newline);
        state = reduce(state, Action::Input('!'));

        assert_eq!(state.editor.paragraphs()[0].content, "Hi\n!");
    }

    #[test]
    fn test_list_paragraph_collects_items() {
        let mut state = reduce(composing(), Action::AddParagraph);
        state = reduce(state, Action::SetParagraphKind(ParagraphKind::List));
        for c in "milk".chars() {
            state = reduce(state, Action::Input(c));
        }
        state = reduce(state, Action::Newline);

        let paragraph = &state.editor.paragraphs()[0];
        assert_eq!(paragraph.items, vec!["milk"]);
        assert!(paragraph.content.is_empty());
        assert!(state.composer.pending_item.is_empty());
    }

    #[test]
    fn test_publish_success_resets_and_opens_post() {
        let mut state = composing();
        state.editor.set_title("Hello");
        state.editor.select_topic(Topic {
            uuid: String::new(),
            title: "Rust".to_string(),
            description: String::new(),
            url: "rust".to_string(),
        });
        let state = reduce(state, Action::Publish);
        assert!(state.composer.publishing);

        let state = reduce(state, Action::PublishFinished(Ok(7)));

        assert!(!state.composer.publishing);
        assert!(state.editor.title.is_empty());
        assert!(state.editor.selected_topic.is_none());
        assert_eq!(state.route, Route::Post { id: "7".to_string() });
    }

    #[test]
    fn test_login_failure_clears_password() {
        let mut state = AppState::at(Route::Login);
        state.login.username = "ferris".to_string();
        state.login.password = "wrong".to_string();

        let state = reduce(state, Action::SubmitLogin);
        assert!(state.login.submitting);

        let state = reduce(state, Action::LoginFinished { success: false });
        assert!(!state.login.submitting);
        assert!(state.login.password.is_empty());
        assert_eq!(state.login.field, LoginField::Password);
        assert_eq!(state.route, Route::Login);
    }

    #[test]
    fn test_register_mode_toggles_and_ends_on_success() {
        let state = reduce(AppState::at(Route::Login), Action::ToggleRegister);
        assert!(state.login.register);

        let state = reduce(state, Action::SubmitLogin);
        let ignored = reduce(state.clone(), Action::ToggleRegister);
        assert!(ignored.login.register);

        let failed = reduce(state.clone(), Action::LoginFinished { success: false });
        assert!(failed.login.register);

        let done = reduce(state, Action::LoginFinished { success: true });
        assert!(!done.login.register);
        assert_eq!(done.route, Route::Home);
    }
}
