//! Side-effect planning
//!
//! After the reducer has run, the event loop asks [`plan`] which backend
//! calls the transition calls for. Planning only looks at the action and
//! the states before and after it; running the effects is the job of
//! `services.rs`.

use chrono::{DateTime, Utc};
use libquill::store::{Loadable, State};
use libquill::{Notification, PostEditor, PostQuery, Route, Session};

use super::actions::Action;
use super::state::AppState;

/// Work for the service layer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchTopics,
    FetchPosts { query: PostQuery, append: bool },
    FetchPost(String),
    FetchTopicPosts(String),
    FetchUserPosts(Session),
    Login { username: String, password: String },
    Register { username: String, password: String },
    Logout,
    Publish {
        session: Option<Session>,
        editor: PostEditor,
    },
    Like { session: Session, id: u64 },
    Delete { session: Session, id: u64 },
    Notify(Notification),
    ExpireNotifications(DateTime<Utc>),
}

/// Effects caused by `action` taking the UI from `before` to `after`
pub fn plan(before: &AppState, after: &AppState, action: &Action, data: &State) -> Vec<Effect> {
    let mut effects = Vec::new();

    if before.route != after.route {
        effects.extend(enter(&after.route, data, false));
    }

    match action {
        Action::Refresh => effects.extend(enter(&after.route, data, true)),

        Action::Tick(now) => {
            if data
                .notification
                .as_ref()
                .is_some_and(|active| active.is_expired(*now))
            {
                effects.push(Effect::ExpireNotifications(*now));
            }
        }

        Action::LoadMore => {
            if let Some(query) = next_page(data) {
                effects.push(Effect::FetchPosts {
                    query,
                    append: true,
                });
            }
        }

        Action::Like(id) => effects.push(with_session(data, "like posts", |session| {
            Effect::Like { session, id: *id }
        })),

        Action::Delete(id) => effects.push(with_session(data, "delete posts", |session| {
            Effect::Delete { session, id: *id }
        })),

        Action::Logout if data.is_logged_in() => effects.push(Effect::Logout),

        Action::SubmitLogin if !before.login.submitting && after.login.submitting => {
            let username = after.login.username.clone();
            let password = after.login.password.clone();
            effects.push(if after.login.register {
                Effect::Register { username, password }
            } else {
                Effect::Login { username, password }
            });
        }

        Action::Publish if !before.composer.publishing && after.composer.publishing => {
            effects.push(Effect::Publish {
                session: data.session.clone(),
                editor: after.editor.clone(),
            });
        }

        _ => {}
    }

    effects
}

/// Data a view needs when it is shown. `force` refetches cached topics too.
pub fn enter(route: &Route, data: &State, force: bool) -> Vec<Effect> {
    let topics = if force || data.topics_needed() {
        Some(Effect::FetchTopics)
    } else {
        None
    };

    match route {
        Route::Home | Route::Create => topics.into_iter().collect(),
        Route::AllPosts => {
            let mut effects = vec![Effect::FetchPosts {
                query: PostQuery::newest(),
                append: false,
            }];
            effects.extend(topics);
            effects
        }
        Route::Post { id } => vec![Effect::FetchPost(id.clone())],
        Route::Topic { term } => {
            let mut effects = vec![Effect::FetchTopicPosts(term.clone())];
            effects.extend(topics);
            effects
        }
        Route::YourPosts => data
            .session
            .clone()
            .map(Effect::FetchUserPosts)
            .into_iter()
            .collect(),
        Route::Login | Route::NotFound { .. } => Vec::new(),
    }
}

/// Query for the next older page, if one may exist and none is loading
fn next_page(data: &State) -> Option<PostQuery> {
    if !data.has_more_posts || data.loading_more || !matches!(data.posts, Loadable::Ready(_)) {
        return None;
    }
    data.oldest_post_id().map(PostQuery::older_than)
}

fn with_session(data: &State, what: &str, effect: impl FnOnce(Session) -> Effect) -> Effect {
    match data.session.clone() {
        Some(session) => effect(session),
        None => Effect::Notify(Notification::error(format!("Log in to {}", what))),
    }
}

/// UI follow-up to a store action: re-check access to the current view
/// once the session changes, and load data that needed a session.
pub fn follow_store(ui: &AppState, data: &State, action: &libquill::Action) -> Option<Action> {
    use libquill::Action as StoreAction;

    if !matches!(
        action,
        StoreAction::SessionRestored(_) | StoreAction::LoggedIn(_) | StoreAction::LoggedOut
    ) {
        return None;
    }

    let guarded = ui.route.clone().guard(data.is_logged_in());
    if guarded != ui.route {
        return Some(Action::Navigate(guarded));
    }

    match (&ui.route, action) {
        (Route::YourPosts, StoreAction::SessionRestored(Some(_)) | StoreAction::LoggedIn(_)) => {
            Some(Action::Refresh)
        }
        _ => None,
    }
}

/// Navigation honouring the access rules once the session is known
pub fn navigate(route: Route, data: &State) -> Action {
    if data.session_checked {
        Action::Navigate(route.guard(data.is_logged_in()))
    } else {
        Action::Navigate(route)
    }
}
