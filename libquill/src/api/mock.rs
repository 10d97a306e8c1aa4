//! In-memory blog backend for testing
//!
//! Behaves like the real backend closely enough to drive the service layer
//! and front ends without a network: paging by cursor, owner checks on
//! delete, bearer tokens issued at login. It can also be told to fail every
//! call, or to wait before answering.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use super::{ApiResult, BlogApi};
use crate::error::ApiError;
use crate::store::PAGE_SIZE;
use crate::types::{LoginRequest, NewPost, Post, PostQuery, Session, Topic, User};

#[derive(Debug, Default)]
struct Backend {
    topics: Vec<Topic>,
    posts: Vec<Post>,
    accounts: Vec<(String, String, User)>,
    tokens: HashMap<String, User>,
    next_post_id: u64,
}

/// Mock backend
///
/// Clones share the same data, so a test can keep one handle for assertions
/// while the service owns another.
#[derive(Debug, Clone, Default)]
pub struct MockBlogApi {
    backend: Arc<Mutex<Backend>>,

    /// When set, every call fails with this error
    failure: Arc<Mutex<Option<ApiError>>>,

    /// Delay before completing operations (simulates network latency)
    delay: Duration,

    /// Number of calls per operation name
    calls: Arc<Mutex<HashMap<&'static str, usize>>>,

    /// Create requests received, in order
    created: Arc<Mutex<Vec<NewPost>>>,
}

impl MockBlogApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with the given topics already present
    pub fn with_topics(topics: Vec<Topic>) -> Self {
        let api = Self::new();
        api.lock().topics = topics;
        api
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register an account that can log in
    pub fn add_account(&self, username: &str, password: &str) -> User {
        let user = User {
            uuid: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            url: username.to_lowercase(),
            created: Some(chrono::Utc::now()),
        };
        self.lock()
            .accounts
            .push((username.to_string(), password.to_string(), user.clone()));
        user
    }

    /// Issue a token for `user` without going through login
    pub fn issue_token(&self, user: &User) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.lock().tokens.insert(token.clone(), user.clone());
        token
    }

    /// Store a post as if it had been published earlier; returns its id
    pub fn seed_post(&self, mut post: Post) -> u64 {
        let mut backend = self.lock();
        if post.id == 0 {
            backend.next_post_id += 1;
            post.id = backend.next_post_id;
        } else {
            backend.next_post_id = backend.next_post_id.max(post.id);
        }
        let id = post.id;
        backend.posts.push(post);
        id
    }

    /// Make every following call fail (None restores normal behaviour)
    pub fn fail_with(&self, error: Option<ApiError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    /// How many times `operation` (the trait method name) was called
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Create requests received so far
    pub fn created_posts(&self) -> Vec<NewPost> {
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    async fn begin(&self, operation: &'static str) -> ApiResult<()> {
        *self
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(operation)
            .or_insert(0) += 1;

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn authorize(&self, token: &str) -> ApiResult<User> {
        self.lock()
            .tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("invalid token".to_string()))
    }

    fn newest_first(posts: &[Post]) -> Vec<Post> {
        let mut posts = posts.to_vec();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts
    }
}

#[async_trait]
impl BlogApi for MockBlogApi {
    async fn fetch_topics(&self) -> ApiResult<Vec<Topic>> {
        self.begin("fetch_topics").await?;
        Ok(self.lock().topics.clone())
    }

    async fn fetch_topic_posts(&self, term: &str) -> ApiResult<Vec<Post>> {
        self.begin("fetch_topic_posts").await?;
        let backend = self.lock();
        if !backend.topics.iter().any(|t| t.url == term) {
            return Err(ApiError::NotFound(format!("topic {}", term)));
        }
        let posts: Vec<Post> = backend
            .posts
            .iter()
            .filter(|p| p.topic.as_deref() == Some(term))
            .cloned()
            .collect();
        Ok(Self::newest_first(&posts)
            .into_iter()
            .take(PAGE_SIZE)
            .collect())
    }

    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>> {
        self.begin("fetch_posts").await?;
        let backend = self.lock();
        let posts = Self::newest_first(&backend.posts)
            .into_iter()
            .filter(|p| match (query.cursor, query.recent) {
                (None, _) => true,
                (Some(cursor), false) => p.id < cursor,
                (Some(cursor), true) => p.id > cursor,
            })
            .take(PAGE_SIZE)
            .map(|p| Post {
                paragraphs: Vec::new(),
                ..p
            })
            .collect();
        Ok(posts)
    }

    async fn fetch_post(&self, id: &str) -> ApiResult<Post> {
        self.begin("fetch_post").await?;
        let backend = self.lock();
        backend
            .posts
            .iter()
            .find(|p| p.id.to_string() == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))
    }

    async fn fetch_user_posts(&self, token: &str) -> ApiResult<Vec<Post>> {
        self.begin("fetch_user_posts").await?;
        let user = self.authorize(token)?;
        let backend = self.lock();
        let posts: Vec<Post> = backend
            .posts
            .iter()
            .filter(|p| p.is_owned_by(&user))
            .cloned()
            .collect();
        Ok(Self::newest_first(&posts))
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> ApiResult<Post> {
        self.begin("create_post").await?;
        let user = self.authorize(token)?;

        let mut backend = self.lock();
        if !backend.topics.iter().any(|t| t.url == post.topic) {
            return Err(ApiError::BadRequest(format!("unknown topic {}", post.topic)));
        }

        backend.next_post_id += 1;
        let created = Post {
            id: backend.next_post_id,
            uuid: uuid::Uuid::new_v4().to_string(),
            title: post.title.clone(),
            description: post.description.clone(),
            text: String::new(),
            likes: 0,
            image_url: post.image_url.clone(),
            created_at: Some(chrono::Utc::now()),
            user: Some(user),
            topic: Some(post.topic.clone()),
            paragraphs: post.paragraphs.clone(),
        };
        backend.posts.push(created.clone());
        drop(backend);

        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(post.clone());
        Ok(created)
    }

    async fn like_post(&self, token: &str, id: u64) -> ApiResult<Post> {
        self.begin("like_post").await?;
        self.authorize(token)?;
        let mut backend = self.lock();
        let post = backend
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))?;
        post.likes += 1;
        Ok(post.clone())
    }

    async fn delete_post(&self, token: &str, id: u64) -> ApiResult<()> {
        self.begin("delete_post").await?;
        let user = self.authorize(token)?;
        let mut backend = self.lock();
        let index = backend
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("post {}", id)))?;
        if !backend.posts[index].is_owned_by(&user) {
            return Err(ApiError::Forbidden("not your post".to_string()));
        }
        backend.posts.remove(index);
        Ok(())
    }

    async fn register(&self, request: &LoginRequest) -> ApiResult<()> {
        self.begin("register").await?;
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::BadRequest("username and password required".to_string()));
        }
        let taken = self
            .lock()
            .accounts
            .iter()
            .any(|(username, _, _)| *username == request.username);
        if taken {
            return Err(ApiError::BadRequest(format!(
                "username {} is taken",
                request.username
            )));
        }
        self.add_account(&request.username, &request.password);
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<Session> {
        self.begin("login").await?;
        let user = self
            .lock()
            .accounts
            .iter()
            .find(|(username, password, _)| {
                *username == request.username && *password == request.password
            })
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| ApiError::Unauthorized("wrong username or password".to_string()))?;

        let token = self.issue_token(&user);
        Ok(Session { token, user })
    }

    async fn check_session(&self, token: &str) -> ApiResult<User> {
        self.begin("check_session").await?;
        self.authorize(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Paragraph;

    fn topic(url: &str) -> Topic {
        Topic {
            uuid: String::new(),
            title: url.to_uppercase(),
            description: String::new(),
            url: url.to_string(),
        }
    }

    fn post(id: u64, topic: &str) -> Post {
        Post {
            id,
            uuid: String::new(),
            title: format!("Post {}", id),
            description: String::new(),
            text: String::new(),
            likes: 0,
            image_url: String::new(),
            created_at: None,
            user: None,
            topic: Some(topic.to_string()),
            paragraphs: vec![Paragraph::Text("body".to_string())],
        }
    }

    #[tokio::test]
    async fn test_paging_by_cursor() {
        let api = MockBlogApi::with_topics(vec![topic("ai")]);
        for id in 1..=15 {
            api.seed_post(post(id, "ai"));
        }

        let first = api.fetch_posts(&PostQuery::newest()).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].id, 15);
        assert!(first[0].paragraphs.is_empty());

        let older = api.fetch_posts(&PostQuery::older_than(6)).await.unwrap();
        let ids: Vec<u64> = older.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);

        let newer = api.fetch_posts(&PostQuery::newer_than(13)).await.unwrap();
        assert_eq!(newer.len(), 2);
    }

    #[tokio::test]
    async fn test_login_and_token_check() {
        let api = MockBlogApi::new();
        let user = api.add_account("ferris", "crab");

        let wrong = api
            .login(&LoginRequest {
                username: "ferris".to_string(),
                password: "lobster".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(ApiError::Unauthorized(_))));

        let session = api
            .login(&LoginRequest {
                username: "ferris".to_string(),
                password: "crab".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user, user);
        assert_eq!(api.check_session(&session.token).await.unwrap(), user);
        assert!(api.check_session("bogus").await.is_err());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let api = MockBlogApi::new();
        let request = LoginRequest {
            username: "ferris".to_string(),
            password: "crab".to_string(),
        };

        api.register(&request).await.unwrap();
        assert!(matches!(
            api.register(&request).await,
            Err(ApiError::BadRequest(_))
        ));

        let session = api.login(&request).await.unwrap();
        assert_eq!(session.user.username, "ferris");
        assert_eq!(api.call_count("register"), 2);
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let api = MockBlogApi::with_topics(vec![topic("ai")]);
        let alice = api.add_account("alice", "pw");
        let bob = api.add_account("bob", "pw");
        let mut owned = post(1, "ai");
        owned.user = Some(alice.clone());
        api.seed_post(owned);

        let bob_token = api.issue_token(&bob);
        assert!(matches!(
            api.delete_post(&bob_token, 1).await,
            Err(ApiError::Forbidden(_))
        ));

        let alice_token = api.issue_token(&alice);
        api.delete_post(&alice_token, 1).await.unwrap();
        assert_eq!(api.post_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_injection_counts_calls() {
        let api = MockBlogApi::new();
        api.fail_with(Some(ApiError::Network("offline".to_string())));

        assert!(api.fetch_topics().await.is_err());
        assert_eq!(api.call_count("fetch_topics"), 1);

        api.fail_with(None);
        assert!(api.fetch_topics().await.is_ok());
        assert_eq!(api.call_count("fetch_topics"), 2);
    }
}
