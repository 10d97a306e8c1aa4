//! Store state
//!
//! Plain data; every change goes through the reducer (see `reducer.rs`).

use crate::notification::ActiveNotification;
use crate::types::{Post, Session, Topic, User};

/// Number of posts the backend returns per page
pub const PAGE_SIZE: usize = 10;

/// Lifecycle of data fetched from the backend
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    NotAsked,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Data requested for one specific key (post id, topic url)
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub key: String,
    pub data: Loadable<T>,
}

/// Root store state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub session: Option<Session>,

    /// Whether the persisted session has been looked up yet
    pub session_checked: bool,

    /// Topic list, fetched once per store lifetime
    pub topics: Loadable<Vec<Topic>>,

    /// Newest-first listing for the all-posts view
    pub posts: Loadable<Vec<Post>>,

    /// An older page is being fetched
    pub loading_more: bool,

    /// Last page was full, so older posts may exist
    pub has_more_posts: bool,

    pub current_post: Option<Keyed<Post>>,

    pub topic_posts: Option<Keyed<Vec<Post>>>,

    /// Posts written by the signed-in user
    pub user_posts: Loadable<Vec<Post>>,

    pub notification: Option<ActiveNotification>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Topics are fetched only when nothing is cached or in flight
    pub fn topics_needed(&self) -> bool {
        matches!(self.topics, Loadable::NotAsked | Loadable::Failed(_))
    }

    pub fn topic_list(&self) -> &[Topic] {
        self.topics.ready().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn post_list(&self) -> &[Post] {
        self.posts.ready().map(Vec::as_slice).unwrap_or_default()
    }

    /// Id of the oldest post loaded, used as the paging cursor
    pub fn oldest_post_id(&self) -> Option<u64> {
        self.post_list().iter().map(|post| post.id).min()
    }

    /// The post loaded for `id`, if that is what the single-post view asked for
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.current_post
            .as_ref()
            .filter(|keyed| keyed.key == id)
            .and_then(|keyed| keyed.data.ready())
    }

    /// Posts loaded for topic `term`
    pub fn posts_in_topic(&self, term: &str) -> Option<&[Post]> {
        self.topic_posts
            .as_ref()
            .filter(|keyed| keyed.key == term)
            .and_then(|keyed| keyed.data.ready())
            .map(Vec::as_slice)
    }
}
