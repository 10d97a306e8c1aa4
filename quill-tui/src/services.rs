//! Service layer adapter for the TUI
//!
//! Bridges the async [`BlogService`] and the synchronous event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle` owns a tokio runtime and the service
//! - Each backend effect runs as a spawned task
//! - Tasks dispatch into a [`ChannelDispatch`], which forwards store actions
//!   over a crossbeam channel; the event loop drains it and applies them to
//!   the store on the UI thread
//! - Outcomes the UI itself needs (login finished, post published) travel
//!   the same channel as UI actions
//!
//! # Example
//!
//! ```no_run
//! use libquill::{Config, Store};
//! use quill_tui::app::Effect;
//! use quill_tui::services::ServiceHandle;
//!
//! # fn example() -> quill_tui::error::Result<()> {
//! let services = ServiceHandle::from_config(&Config::load_or_default()?)?;
//! let mut store = Store::new();
//!
//! services.run(Effect::FetchTopics, &mut store);
//!
//! // In the event loop, apply whatever has arrived
//! for action in services.receiver().try_iter() {
//!     println!("{:?}", action);
//! }
//! # Ok(())
//! # }
//! ```

use crossbeam_channel::{unbounded, Receiver, Sender};
use libquill::store::{Dispatch, Store};
use libquill::{BlogService, Config};

use crate::app::{Action, Effect};
use crate::error::{Result, TuiError};

/// Dispatch target for background tasks
///
/// Store actions are wrapped and sent to the event loop, which owns the
/// store.
#[derive(Debug, Clone)]
pub struct ChannelDispatch(Sender<Action>);

impl ChannelDispatch {
    pub fn new(sender: Sender<Action>) -> Self {
        Self(sender)
    }

    /// Send a UI-level action
    pub fn send(&self, action: Action) {
        if self.0.send(action).is_err() {
            tracing::debug!("Event loop gone, dropping action");
        }
    }
}

impl Dispatch for ChannelDispatch {
    fn dispatch(&mut self, action: libquill::Action) {
        self.send(Action::Store(action));
    }
}

/// Service handle for TUI operations
pub struct ServiceHandle {
    service: BlogService,
    runtime: tokio::runtime::Runtime,
    tx: Sender<Action>,
    rx: Receiver<Action>,
}

impl ServiceHandle {
    pub fn new(service: BlogService) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| TuiError::Runtime(e.to_string()))?;

        let (tx, rx) = unbounded();

        Ok(Self {
            service,
            runtime,
            tx,
            rx,
        })
    }

    /// HTTP backend and session file from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(BlogService::from_config(config)?)
    }

    /// Actions produced by finished (or progressing) tasks
    pub fn receiver(&self) -> &Receiver<Action> {
        &self.rx
    }

    pub fn service(&self) -> &BlogService {
        &self.service
    }

    fn dispatcher(&self) -> ChannelDispatch {
        ChannelDispatch::new(self.tx.clone())
    }

    /// Look up the persisted session in the background
    pub fn restore_session(&self) {
        let service = self.service.clone();
        let mut dispatch = self.dispatcher();
        self.runtime.spawn(async move {
            if let Err(e) = service.restore_session(&mut dispatch).await {
                tracing::warn!("restore session failed: {}", e);
                dispatch.send(Action::ShowError(format!(
                    "Could not read the saved session: {}",
                    e
                )));
            }
        });
    }

    /// Carry out `effect`
    ///
    /// Local effects apply to `store` immediately; backend calls are
    /// spawned and report back through [`receiver`](Self::receiver).
    pub fn run(&self, effect: Effect, store: &mut Store) {
        tracing::debug!(?effect, "running effect");

        let service = self.service.clone();
        let mut dispatch = self.dispatcher();

        match effect {
            // === Local ===
            Effect::Notify(notification) => service.notify(store, notification),

            Effect::ExpireNotifications(now) => {
                store.dispatch(libquill::Action::NotificationsExpired(now))
            }

            Effect::Logout => log_failure("logout", service.logout(store)),

            // === Backend ===
            Effect::FetchTopics => {
                self.runtime.spawn(async move {
                    log_failure("fetch topics", service.fetch_topics(&mut dispatch).await);
                });
            }

            Effect::FetchPosts { query, append } => {
                self.runtime.spawn(async move {
                    log_failure(
                        "fetch posts",
                        service.fetch_posts(&mut dispatch, &query, append).await,
                    );
                });
            }

            Effect::FetchPost(id) => {
                self.runtime.spawn(async move {
                    log_failure("fetch post", service.fetch_post(&mut dispatch, &id).await);
                });
            }

            Effect::FetchTopicPosts(term) => {
                self.runtime.spawn(async move {
                    log_failure(
                        "fetch topic posts",
                        service.fetch_topic_posts(&mut dispatch, &term).await,
                    );
                });
            }

            Effect::FetchUserPosts(session) => {
                self.runtime.spawn(async move {
                    log_failure(
                        "fetch your posts",
                        service.fetch_user_posts(&mut dispatch, &session).await,
                    );
                });
            }

            Effect::Login { username, password } => {
                self.runtime.spawn(async move {
                    let result = service.login(&mut dispatch, &username, &password).await;
                    let success = result.is_ok();
                    log_failure("login", result);
                    dispatch.send(Action::LoginFinished { success });
                });
            }

            Effect::Register { username, password } => {
                self.runtime.spawn(async move {
                    let result = service.register(&mut dispatch, &username, &password).await;
                    let success = result.is_ok();
                    log_failure("register", result);
                    dispatch.send(Action::LoginFinished { success });
                });
            }

            Effect::Publish { session, editor } => {
                self.runtime.spawn(async move {
                    let result = service
                        .publish(&mut dispatch, session.as_ref(), &editor)
                        .await
                        .map(|post| post.id)
                        .map_err(|e| e.to_string());
                    dispatch.send(Action::PublishFinished(result));
                });
            }

            Effect::Like { session, id } => {
                self.runtime.spawn(async move {
                    log_failure("like", service.like_post(&mut dispatch, &session, id).await);
                });
            }

            Effect::Delete { session, id } => {
                self.runtime.spawn(async move {
                    log_failure(
                        "delete",
                        service.delete_post(&mut dispatch, &session, id).await,
                    );
                });
            }
        }
    }
}

/// Failures already reached the store as actions; keep a trace of them
fn log_failure<T>(what: &str, result: libquill::Result<T>) {
    if let Err(e) = result {
        tracing::warn!("{} failed: {}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libquill::api::mock::MockBlogApi;
    use libquill::session::MemorySessionStore;
    use libquill::Topic;
    use std::sync::Arc;
    use std::time::Duration;

    fn handle(api: &MockBlogApi) -> ServiceHandle {
        let service = BlogService::new(
            Arc::new(api.clone()),
            Arc::new(MemorySessionStore::new()),
        );
        ServiceHandle::new(service).unwrap()
    }

    fn next(services: &ServiceHandle) -> Action {
        services
            .receiver()
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_fetch_topics_reports_through_channel() {
        let api = MockBlogApi::with_topics(vec![Topic {
            uuid: String::new(),
            title: "Rust".to_string(),
            description: String::new(),
            url: "rust".to_string(),
        }]);
        let services = handle(&api);
        let mut store = Store::new();

        services.run(Effect::FetchTopics, &mut store);

        assert_eq!(next(&services), Action::Store(libquill::Action::TopicsRequested));
        match next(&services) {
            Action::Store(libquill::Action::TopicsLoaded(topics)) => assert_eq!(topics.len(), 1),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_failed_login_reports_finished() {
        let api = MockBlogApi::new();
        let services = handle(&api);
        let mut store = Store::new();

        services.run(
            Effect::Login {
                username: "ghost".to_string(),
                password: "boo".to_string(),
            },
            &mut store,
        );

        let finished = std::iter::from_fn(|| Some(next(&services)))
            .find(|action| matches!(action, Action::LoginFinished { .. }));
        assert_eq!(finished, Some(Action::LoginFinished { success: false }));
    }

    #[test]
    fn test_registration_reports_finished() {
        let api = MockBlogApi::new();
        let services = handle(&api);
        let mut store = Store::new();

        services.run(
            Effect::Register {
                username: "newcomer".to_string(),
                password: "quill-pw".to_string(),
            },
            &mut store,
        );

        let finished = std::iter::from_fn(|| Some(next(&services)))
            .find(|action| matches!(action, Action::LoginFinished { .. }));
        assert_eq!(finished, Some(Action::LoginFinished { success: true }));
        assert_eq!(api.call_count("register"), 1);
    }

    #[test]
    fn test_local_effects_apply_to_store() {
        let api = MockBlogApi::new();
        let services = handle(&api);
        let mut store = Store::new();

        services.run(
            Effect::Notify(libquill::Notification::info("hello")),
            &mut store,
        );

        assert!(store.state().notification.is_some());
        assert!(services.receiver().is_empty());
    }
}
