//! HTTP client for the blog backend.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiResult, BlogApi};
use crate::config::Config;
use crate::error::ApiError;
use crate::types::{LoginRequest, NewPost, Post, PostQuery, Session, Topic, User};

/// HTTP client for the blog backend.
#[derive(Debug, Clone)]
pub struct HttpBlogApi {
    base_url: Url,
    client: Client,
}

/// Body of `POST /posts/{id}/like`; the backend requires the field
#[derive(Debug, Serialize)]
struct LikeRequest<'a> {
    text: &'a str,
}

impl HttpBlogApi {
    /// Create with explicit base URL and request timeout
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> ApiResult<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(trimmed.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(config.api.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Full URL for an API path given as segments
    ///
    /// Each segment is percent-encoded, so an id cannot escape its place in
    /// the path. Empty, `.` and `..` segments are rejected.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ApiError::InvalidUrl(format!("bad path segment {:?}", bad)));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request with optional auth header.
    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> ApiResult<reqwest::RequestBuilder> {
        let mut req = self.client.request(method, self.endpoint(segments)?);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    fn like_request(&self, token: &str, id: u64) -> ApiResult<reqwest::RequestBuilder> {
        let id = id.to_string();
        Ok(self
            .request(Method::POST, &["posts", &id, "like"], Some(token))?
            .json(&LikeRequest { text: "like" }))
    }

    fn topic_posts_request(&self, term: &str) -> ApiResult<reqwest::RequestBuilder> {
        Ok(self
            .request(Method::GET, &["posts"], None)?
            .query(&topic_query_params(term)))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = req.send().await?;
        tracing::debug!(status = %response.status(), url = %response.url(), "backend response");
        Ok(response)
    }

    /// Handle response, converting HTTP errors to ApiError.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status, body))
        }
    }

    /// Handle a response whose body is not needed (204 No Content and the like).
    async fn handle_empty_response(response: reqwest::Response) -> ApiResult<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(status_error(status, body))
        }
    }
}

/// Map a non-success status and its body to an [`ApiError`]
pub fn status_error(status: StatusCode, body: String) -> ApiError {
    let detail = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no details")
            .to_string()
    } else {
        body
    };

    match status {
        StatusCode::BAD_REQUEST => ApiError::BadRequest(detail),
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(detail),
        StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        _ => ApiError::Server(format!("{}: {}", status, detail)),
    }
}

/// Query string for a listing page
pub fn post_query_params(query: &PostQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(cursor) = query.cursor {
        params.push(("cursor", cursor.to_string()));
        if query.recent {
            params.push(("recent", "1".to_string()));
        }
    }
    params
}

/// Query string selecting the posts of one topic
pub fn topic_query_params(term: &str) -> Vec<(&'static str, String)> {
    vec![("topic", term.to_string())]
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn fetch_topics(&self) -> ApiResult<Vec<Topic>> {
        let response = self.send(self.request(Method::GET, &["topics"], None)?).await?;
        Self::handle_response(response).await
    }

    async fn fetch_topic_posts(&self, term: &str) -> ApiResult<Vec<Post>> {
        let response = self.send(self.topic_posts_request(term)?).await?;
        Self::handle_response(response).await
    }

    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>> {
        let req = self
            .request(Method::GET, &["posts"], None)?
            .query(&post_query_params(query));
        let response = self.send(req).await?;
        Self::handle_response(response).await
    }

    async fn fetch_post(&self, id: &str) -> ApiResult<Post> {
        let response = self
            .send(self.request(Method::GET, &["posts", id], None)?)
            .await?;
        Self::handle_response(response).await
    }

    async fn fetch_user_posts(&self, token: &str) -> ApiResult<Vec<Post>> {
        let response = self
            .send(self.request(Method::GET, &["posts", "your"], Some(token))?)
            .await?;
        Self::handle_response(response).await
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> ApiResult<Post> {
        let req = self.request(Method::POST, &["posts"], Some(token))?.json(post);
        let response = self.send(req).await?;
        Self::handle_response(response).await
    }

    async fn like_post(&self, token: &str, id: u64) -> ApiResult<Post> {
        let response = self.send(self.like_request(token, id)?).await?;
        Self::handle_response(response).await
    }

    async fn delete_post(&self, token: &str, id: u64) -> ApiResult<()> {
        let id = id.to_string();
        let response = self
            .send(self.request(Method::DELETE, &["posts", &id], Some(token))?)
            .await?;
        Self::handle_empty_response(response).await
    }

    async fn register(&self, request: &LoginRequest) -> ApiResult<()> {
        let req = self
            .request(Method::POST, &["auth", "register"], None)?
            .json(request);
        let response = self.send(req).await?;
        Self::handle_empty_response(response).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<Session> {
        let req = self
            .request(Method::POST, &["auth", "login"], None)?
            .json(request);
        let response = self.send(req).await?;
        Self::handle_response(response).await
    }

    async fn check_session(&self, token: &str) -> ApiResult<User> {
        let response = self
            .send(self.request(Method::GET, &["auth", "check"], Some(token))?)
            .await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api() -> HttpBlogApi {
        HttpBlogApi::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = api();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(
            api.endpoint(&["posts", "3"]).unwrap().as_str(),
            "http://localhost:8080/api/posts/3"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let api = HttpBlogApi::new("http://localhost:8080", Duration::from_secs(5)).unwrap();
        assert_eq!(
            api.endpoint(&["topics"]).unwrap().as_str(),
            "http://localhost:8080/topics"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = api().endpoint(&["posts", "a/b?c#d"]).unwrap();
        assert_eq!(url.path(), "/api/posts/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_endpoint_rejects_dot_segments() {
        for id in ["..", ".", ""] {
            assert!(matches!(
                api().endpoint(&["posts", id]),
                Err(ApiError::InvalidUrl(_))
            ));
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBlogApi::new("not a url", Duration::from_secs(5)),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_like_request_sends_text_body() {
        let request = api().like_request("tok", 7).unwrap().build().unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:8080/api/posts/7/like");
        assert_eq!(request.headers()["authorization"], "Bearer tok");
        assert_eq!(request.headers()["content-type"], "application/json");

        let body = request.body().and_then(|body| body.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "like" }));
    }

    #[test]
    fn test_topic_posts_request_uses_query() {
        assert_eq!(
            topic_query_params("self-improvement"),
            vec![("topic", "self-improvement".to_string())]
        );

        let request = api().topic_posts_request("c++").unwrap().build().unwrap();
        assert_eq!(request.url().path(), "/api/posts");
        assert_eq!(request.url().query(), Some("topic=c%2B%2B"));
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "no such post".to_string()),
            ApiError::NotFound("no such post".to_string())
        );
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized("Unauthorized".to_string())
        );
        assert_eq!(
            status_error(StatusCode::FORBIDDEN, String::new()),
            ApiError::Forbidden("Forbidden".to_string())
        );
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST, "bad topic".to_string()),
            ApiError::BadRequest("bad topic".to_string())
        );
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            ApiError::Server(msg) if msg.starts_with("500")
        ));
    }

    #[test]
    fn test_post_query_params() {
        assert!(post_query_params(&PostQuery::newest()).is_empty());
        assert_eq!(
            post_query_params(&PostQuery::older_than(40)),
            vec![("cursor", "40".to_string())]
        );
        assert_eq!(
            post_query_params(&PostQuery::newer_than(40)),
            vec![("cursor", "40".to_string()), ("recent", "1".to_string())]
        );
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let mut config = Config::default_config();
        config.api.base_url = "https://blog.example.com/api".to_string();

        let api = HttpBlogApi::from_config(&config).unwrap();
        assert_eq!(api.base_url(), "https://blog.example.com/api");
    }
}
