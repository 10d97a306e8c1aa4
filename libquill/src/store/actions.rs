//! Store actions
//!
//! Actions describe something that happened: a request went out, a response
//! came back, the user signed in. The reducer turns them into new state.

use chrono::{DateTime, Utc};

use crate::notification::ActiveNotification;
use crate::types::{Post, Session, Topic};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // === Session ===
    /// Persisted session looked up on startup (None when absent or rejected)
    SessionRestored(Option<Session>),

    LoggedIn(Session),

    LoggedOut,

    // === Topics ===
    TopicsRequested,

    TopicsLoaded(Vec<Topic>),

    TopicsFailed(String),

    // === Post listing ===
    /// `append` is true when paging in older posts
    PostsRequested { append: bool },

    PostsLoaded { posts: Vec<Post>, append: bool },

    PostsFailed(String),

    // === Single post ===
    PostRequested(String),

    PostLoaded { id: String, post: Post },

    PostFailed { id: String, error: String },

    // === Topic posts ===
    TopicPostsRequested(String),

    TopicPostsLoaded { term: String, posts: Vec<Post> },

    TopicPostsFailed { term: String, error: String },

    // === User posts ===
    UserPostsRequested,

    UserPostsLoaded(Vec<Post>),

    UserPostsFailed(String),

    // === Mutations ===
    PostCreated(Post),

    /// A post changed on the backend (e.g. liked)
    PostUpdated(Post),

    PostDeleted(u64),

    // === Notifications ===
    NotificationShown(ActiveNotification),

    /// Clock advanced; drop the notification if it has run out
    NotificationsExpired(DateTime<Utc>),

    NotificationDismissed,
}
