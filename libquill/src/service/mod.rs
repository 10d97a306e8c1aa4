//! Service layer for Quill
//!
//! [`BlogService`] holds the asynchronous action creators shared by the
//! terminal UI and the CLI. Each operation calls the backend through
//! [`BlogApi`], dispatches the store actions describing what happened and
//! returns the outcome as a `Result`, so callers can react without reading
//! the store back.
//!
//! Dispatch goes through the [`Dispatch`] trait: the CLI hands in a
//! [`Store`](crate::store::Store) directly, the TUI a channel leading to the
//! store owned by its UI thread.
//!
//! # Example
//!
//! ```no_run
//! use libquill::service::BlogService;
//! use libquill::store::Store;
//! use libquill::types::PostQuery;
//! use libquill::Config;
//!
//! # async fn example() -> libquill::Result<()> {
//! let service = BlogService::from_config(&Config::load_or_default()?)?;
//! let mut store = Store::new();
//!
//! service.restore_session(&mut store).await?;
//! service.fetch_posts(&mut store, &PostQuery::newest(), false).await?;
//!
//! for post in store.state().post_list() {
//!     println!("{} by {}", post.title, post.author_name());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::Utc;

use crate::api::http::HttpBlogApi;
use crate::api::BlogApi;
use crate::config::Config;
use crate::editor::PostEditor;
use crate::error::{ApiError, QuillError, Result, SessionError};
use crate::notification::{Notification, NotificationDurations};
use crate::session::{FileSessionStore, SessionStore};
use crate::store::{Action, Dispatch};
use crate::types::{LoginRequest, NewPost, Post, PostQuery, Session, Topic};

pub const PUBLISHED_MESSAGE: &str = "Your post has successfully been published!";

/// Action creators over a backend and a session store
#[derive(Clone)]
pub struct BlogService {
    api: Arc<dyn BlogApi>,
    sessions: Arc<dyn SessionStore>,
    durations: NotificationDurations,
}

impl BlogService {
    pub fn new(api: Arc<dyn BlogApi>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            sessions,
            durations: NotificationDurations::default(),
        }
    }

    /// HTTP backend and file session store as configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpBlogApi::from_config(config)?;
        let sessions = FileSessionStore::new(config.session_path());
        tracing::debug!(base_url = %api.base_url(), "blog service ready");

        Ok(Self::new(Arc::new(api), Arc::new(sessions))
            .with_durations(NotificationDurations::from(&config.notifications)))
    }

    pub fn with_durations(mut self, durations: NotificationDurations) -> Self {
        self.durations = durations;
        self
    }

    /// Show a notification for the duration configured for its kind
    pub fn notify<D: Dispatch>(&self, dispatch: &mut D, notification: Notification) {
        let duration = self.durations.for_kind(notification.kind);
        dispatch.dispatch(Action::NotificationShown(
            notification.shown_at(Utc::now(), duration),
        ));
    }

    // === Session ===

    /// Pick up the session persisted by an earlier run
    ///
    /// The stored token is checked against the backend. A rejected token is
    /// discarded; when the backend cannot be reached the stored session is
    /// kept so the user stays logged in while offline.
    pub async fn restore_session<D: Dispatch>(
        &self,
        dispatch: &mut D,
    ) -> Result<Option<Session>> {
        let stored = match self.sessions.load() {
            Ok(stored) => stored,
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                self.sessions.clear()?;
                None
            }
            Err(e) => {
                dispatch.dispatch(Action::SessionRestored(None));
                return Err(e.into());
            }
        };

        let Some(stored) = stored else {
            dispatch.dispatch(Action::SessionRestored(None));
            return Ok(None);
        };

        let session = match self.api.check_session(&stored.token).await {
            Ok(user) => {
                let session = Session {
                    token: stored.token,
                    user,
                };
                if session.user != stored.user {
                    self.sessions.save(&session)?;
                }
                Some(session)
            }
            Err(ApiError::Unauthorized(reason)) => {
                tracing::info!("Stored session rejected: {}", reason);
                self.sessions.clear()?;
                None
            }
            Err(e) => {
                tracing::warn!("Could not verify stored session, keeping it: {}", e);
                Some(stored)
            }
        };

        dispatch.dispatch(Action::SessionRestored(session.clone()));
        Ok(session)
    }

    pub async fn login<D: Dispatch>(
        &self,
        dispatch: &mut D,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        let request = self.credentials(dispatch, username, password)?;

        match self.api.login(&request).await {
            Ok(session) => self.begin_session(dispatch, session, "Welcome back"),
            Err(e) => {
                self.notify(dispatch, Notification::error(format!("Login failed: {}", e)));
                Err(e.into())
            }
        }
    }

    /// Create an account and log straight into it
    pub async fn register<D: Dispatch>(
        &self,
        dispatch: &mut D,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        let request = self.credentials(dispatch, username, password)?;

        if let Err(e) = self.api.register(&request).await {
            self.notify(
                dispatch,
                Notification::error(format!("Registration failed: {}", e)),
            );
            return Err(e.into());
        }
        tracing::info!(user = %request.username, "account created");

        match self.api.login(&request).await {
            Ok(session) => self.begin_session(dispatch, session, "Welcome"),
            Err(e) => {
                self.notify(
                    dispatch,
                    Notification::error(format!(
                        "Account created, but logging in failed: {}",
                        e
                    )),
                );
                Err(e.into())
            }
        }
    }

    fn credentials<D: Dispatch>(
        &self,
        dispatch: &mut D,
        username: &str,
        password: &str,
    ) -> Result<LoginRequest> {
        if username.trim().is_empty() || password.is_empty() {
            let error = QuillError::InvalidInput("Username and password are required".to_string());
            self.notify(dispatch, Notification::error(error.to_string()));
            return Err(error);
        }

        Ok(LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        })
    }

    fn begin_session<D: Dispatch>(
        &self,
        dispatch: &mut D,
        session: Session,
        greeting: &str,
    ) -> Result<Session> {
        self.sessions.save(&session)?;
        tracing::info!(user = %session.user.username, "logged in");
        dispatch.dispatch(Action::LoggedIn(session.clone()));
        self.notify(
            dispatch,
            Notification::success(format!("{}, {}!", greeting, session.user.username)),
        );
        Ok(session)
    }

    pub fn logout<D: Dispatch>(&self, dispatch: &mut D) -> Result<()> {
        self.sessions.clear()?;
        dispatch.dispatch(Action::LoggedOut);
        self.notify(dispatch, Notification::info("You have been logged out"));
        Ok(())
    }

    // === Fetches ===

    pub async fn fetch_topics<D: Dispatch>(&self, dispatch: &mut D) -> Result<Vec<Topic>> {
        dispatch.dispatch(Action::TopicsRequested);
        match self.api.fetch_topics().await {
            Ok(topics) => {
                dispatch.dispatch(Action::TopicsLoaded(topics.clone()));
                Ok(topics)
            }
            Err(e) => {
                dispatch.dispatch(Action::TopicsFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// One page of the listing; `append` adds it below what is loaded
    pub async fn fetch_posts<D: Dispatch>(
        &self,
        dispatch: &mut D,
        query: &PostQuery,
        append: bool,
    ) -> Result<Vec<Post>> {
        dispatch.dispatch(Action::PostsRequested { append });
        match self.api.fetch_posts(query).await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), ?query, "fetched posts");
                dispatch.dispatch(Action::PostsLoaded {
                    posts: posts.clone(),
                    append,
                });
                Ok(posts)
            }
            Err(e) => {
                dispatch.dispatch(Action::PostsFailed(e.to_string()));
                if append {
                    self.notify(
                        dispatch,
                        Notification::error(format!("Could not load more posts: {}", e)),
                    );
                }
                Err(e.into())
            }
        }
    }

    pub async fn fetch_post<D: Dispatch>(&self, dispatch: &mut D, id: &str) -> Result<Post> {
        dispatch.dispatch(Action::PostRequested(id.to_string()));
        match self.api.fetch_post(id).await {
            Ok(post) => {
                dispatch.dispatch(Action::PostLoaded {
                    id: id.to_string(),
                    post: post.clone(),
                });
                Ok(post)
            }
            Err(e) => {
                dispatch.dispatch(Action::PostFailed {
                    id: id.to_string(),
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    pub async fn fetch_topic_posts<D: Dispatch>(
        &self,
        dispatch: &mut D,
        term: &str,
    ) -> Result<Vec<Post>> {
        dispatch.dispatch(Action::TopicPostsRequested(term.to_string()));
        match self.api.fetch_topic_posts(term).await {
            Ok(posts) => {
                dispatch.dispatch(Action::TopicPostsLoaded {
                    term: term.to_string(),
                    posts: posts.clone(),
                });
                Ok(posts)
            }
            Err(e) => {
                dispatch.dispatch(Action::TopicPostsFailed {
                    term: term.to_string(),
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    pub async fn fetch_user_posts<D: Dispatch>(
        &self,
        dispatch: &mut D,
        session: &Session,
    ) -> Result<Vec<Post>> {
        dispatch.dispatch(Action::UserPostsRequested);
        match self.api.fetch_user_posts(&session.token).await {
            Ok(posts) => {
                dispatch.dispatch(Action::UserPostsLoaded(posts.clone()));
                Ok(posts)
            }
            Err(e) => {
                dispatch.dispatch(Action::UserPostsFailed(e.to_string()));
                self.expire_if_unauthorized(dispatch, &e);
                Err(e.into())
            }
        }
    }

    // === Mutations ===

    /// Send a create request; the notification reflects the actual outcome
    pub async fn create_post<D: Dispatch>(
        &self,
        dispatch: &mut D,
        session: &Session,
        post: &NewPost,
    ) -> Result<Post> {
        match self.api.create_post(&session.token, post).await {
            Ok(created) => {
                tracing::info!(id = created.id, topic = %post.topic, "published post");
                dispatch.dispatch(Action::PostCreated(created.clone()));
                self.notify(dispatch, Notification::success(PUBLISHED_MESSAGE));
                Ok(created)
            }
            Err(e) => {
                tracing::warn!("Publishing failed: {}", e);
                self.notify(
                    dispatch,
                    Notification::error(format!("Could not publish your post: {}", e)),
                );
                self.expire_if_unauthorized(dispatch, &e);
                Err(e.into())
            }
        }
    }

    /// Validate the editor and publish its content
    ///
    /// Nothing is sent when the editor does not validate (no topic selected,
    /// empty title) or nobody is logged in. The editor is left untouched
    /// either way; reset it once this returns `Ok`.
    pub async fn publish<D: Dispatch>(
        &self,
        dispatch: &mut D,
        session: Option<&Session>,
        editor: &PostEditor,
    ) -> Result<Post> {
        let Some(session) = session else {
            self.notify(dispatch, Notification::error("Log in to publish a post"));
            return Err(SessionError::NotLoggedIn.into());
        };

        let post = match editor.submit() {
            Ok(post) => post,
            Err(e) => {
                self.notify(dispatch, Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        self.create_post(dispatch, session, &post).await
    }

    pub async fn like_post<D: Dispatch>(
        &self,
        dispatch: &mut D,
        session: &Session,
        id: u64,
    ) -> Result<Post> {
        match self.api.like_post(&session.token, id).await {
            Ok(post) => {
                dispatch.dispatch(Action::PostUpdated(post.clone()));
                Ok(post)
            }
            Err(e) => {
                self.notify(dispatch, Notification::error(format!("Could not like post: {}", e)));
                self.expire_if_unauthorized(dispatch, &e);
                Err(e.into())
            }
        }
    }

    pub async fn delete_post<D: Dispatch>(
        &self,
        dispatch: &mut D,
        session: &Session,
        id: u64,
    ) -> Result<()> {
        match self.api.delete_post(&session.token, id).await {
            Ok(()) => {
                tracing::info!(id, "deleted post");
                dispatch.dispatch(Action::PostDeleted(id));
                self.notify(dispatch, Notification::success("Post deleted"));
                Ok(())
            }
            Err(e) => {
                self.notify(
                    dispatch,
                    Notification::error(format!("Could not delete post: {}", e)),
                );
                self.expire_if_unauthorized(dispatch, &e);
                Err(e.into())
            }
        }
    }

    /// A rejected token ends the session locally as well
    fn expire_if_unauthorized<D: Dispatch>(&self, dispatch: &mut D, error: &ApiError) {
        if !matches!(error, ApiError::Unauthorized(_)) {
            return;
        }
        if let Err(e) = self.sessions.clear() {
            tracing::warn!("Failed to clear expired session: {}", e);
        }
        dispatch.dispatch(Action::LoggedOut);
    }
}

impl std::fmt::Debug for BlogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogService")
            .field("durations", &self.durations)
            .finish_non_exhaustive()
    }
}
