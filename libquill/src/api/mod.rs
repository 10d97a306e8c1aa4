//! Blog backend abstraction
//!
//! [`BlogApi`] is the boundary to the backend that owns posts, topics and
//! accounts. [`http::HttpBlogApi`] talks to the real JSON API;
//! [`mock::MockBlogApi`] keeps everything in memory for tests.
//!
//! # Examples
//!
//! ```no_run
//! use libquill::api::{BlogApi, http::HttpBlogApi};
//! use libquill::Config;
//!
//! # async fn example() -> Result<(), libquill::error::ApiError> {
//! let api = HttpBlogApi::from_config(&Config::default_config())?;
//!
//! for topic in api.fetch_topics().await? {
//!     println!("{} ({})", topic.title, topic.url);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{LoginRequest, NewPost, Post, PostQuery, Session, Topic, User};

pub mod http;

// Mock backend is available for all builds (not just tests) to support integration tests
pub mod mock;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the blog backend offers
///
/// Methods taking a `token` require an authenticated session and fail with
/// [`ApiError::Unauthorized`] when the token is missing or stale.
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// All topics
    async fn fetch_topics(&self) -> ApiResult<Vec<Topic>>;

    /// Posts filed under the topic with url `term`
    async fn fetch_topic_posts(&self, term: &str) -> ApiResult<Vec<Post>>;

    /// One page of the newest-first post listing
    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>>;

    /// A single post including its paragraphs
    async fn fetch_post(&self, id: &str) -> ApiResult<Post>;

    /// Posts written by the token's owner
    async fn fetch_user_posts(&self, token: &str) -> ApiResult<Vec<Post>>;

    async fn create_post(&self, token: &str, post: &NewPost) -> ApiResult<Post>;

    /// Add a like; returns the updated post
    async fn like_post(&self, token: &str, id: u64) -> ApiResult<Post>;

    /// Delete a post the token's owner wrote
    async fn delete_post(&self, token: &str, id: u64) -> ApiResult<()>;

    /// Create an account; log in afterwards to get a session
    async fn register(&self, request: &LoginRequest) -> ApiResult<()>;

    async fn login(&self, request: &LoginRequest) -> ApiResult<Session>;

    /// Resolve a token to its user, failing if the token is no longer valid
    async fn check_session(&self, token: &str) -> ApiResult<User>;
}
