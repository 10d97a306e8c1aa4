//! Quill - a terminal client for topic-grouped blogs
//!
//! This library holds everything the front ends share: the data model, the
//! post editor, topic search, routing, the store, the backend client and the
//! action creators that tie them together.

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod notification;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod topics;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use editor::{EditorStep, ParagraphId, PostEditor};
pub use error::{QuillError, Result};
pub use notification::{Notification, NotificationKind};
pub use router::Route;
pub use service::BlogService;
pub use store::{Action, Dispatch, State, Store};
pub use types::{NewPost, Paragraph, ParagraphKind, Post, PostQuery, Session, Topic, User};
