//! Path routing
//!
//! Maps URL-style paths onto the views a front end can show. Matching is
//! static with one parameter segment for single posts and single topics.
//!
//! | path            | route                  |
//! |-----------------|------------------------|
//! | `/`             | [`Route::Home`]        |
//! | `/login`        | [`Route::Login`]       |
//! | `/all`          | [`Route::AllPosts`]    |
//! | `/blog/:id`     | [`Route::Post`]        |
//! | `/topic/:term`  | [`Route::Topic`]       |
//! | `/create`       | [`Route::Create`]      |
//! | `/your-blogs`   | [`Route::YourPosts`]   |
//! | anything else   | [`Route::NotFound`]    |

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    AllPosts,
    Post { id: String },
    Topic { term: String },
    Create,
    YourPosts,
    NotFound { path: String },
}

impl Route {
    /// Routes listed in the navigation bar, in display order
    pub const NAV: [Route; 5] = [
        Route::Home,
        Route::AllPosts,
        Route::Create,
        Route::YourPosts,
        Route::Login,
    ];

    /// Resolve a path. Query strings, fragments and one trailing slash are ignored.
    pub fn parse(path: &str) -> Route {
        let without_query = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = without_query.trim_start_matches('/');
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["all"] => Route::AllPosts,
            ["blog", id] if !id.is_empty() => Route::Post { id: id.to_string() },
            ["topic", term] if !term.is_empty() => Route::Topic {
                term: term.to_string(),
            },
            ["create"] => Route::Create,
            ["your-blogs"] => Route::YourPosts,
            _ => Route::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::AllPosts => "/all".to_string(),
            Route::Post { id } => format!("/blog/{}", id),
            Route::Topic { term } => format!("/topic/{}", term),
            Route::Create => "/create".to_string(),
            Route::YourPosts => "/your-blogs".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Short label for navigation and window titles
    pub fn title(&self) -> String {
        match self {
            Route::Home => "Home".to_string(),
            Route::Login => "Login".to_string(),
            Route::AllPosts => "All posts".to_string(),
            Route::Post { id } => format!("Post {}", id),
            Route::Topic { term } => format!("Topic: {}", term),
            Route::Create => "Write".to_string(),
            Route::YourPosts => "Your posts".to_string(),
            Route::NotFound { .. } => "Not found".to_string(),
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Create | Route::YourPosts)
    }

    /// Apply access rules: signed-out users are sent to the login view
    /// from gated routes, signed-in users skip the login view.
    pub fn guard(self, has_session: bool) -> Route {
        match self {
            route if route.requires_session() && !has_session => Route::Login,
            Route::Login if has_session => Route::Home,
            route => route,
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::Home
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl From<&str> for Route {
    fn from(path: &str) -> Self {
        Route::parse(path)
    }
}
