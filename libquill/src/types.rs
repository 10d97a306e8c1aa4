//! Core types for Quill
//!
//! These mirror the JSON the blog backend produces and accepts. Field names
//! follow the backend (`image_url` on posts it returns, `imageURL` on the
//! create request).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator the backend uses to pack list items into one content string.
/// Every item is followed by the separator, including the last one.
pub const LIST_SEPARATOR: &str = "|LIST|";

/// A published post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Legacy free-text body; newer posts carry paragraphs instead
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<User>,
    /// Url of the owning topic, when the backend includes it
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl Post {
    /// Route id used in `/blog/:id`
    pub fn route_id(&self) -> String {
        self.id.to_string()
    }

    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("anonymous")
    }

    /// Whether `user` wrote this post
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user.as_ref().is_some_and(|author| author.uuid == user.uuid)
    }
}

/// Kind of a content block
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphKind {
    Text,
    Code,
    Quote,
    List,
}

impl ParagraphKind {
    pub const ALL: [ParagraphKind; 4] = [
        ParagraphKind::Text,
        ParagraphKind::Code,
        ParagraphKind::Quote,
        ParagraphKind::List,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParagraphKind::Text => "text",
            ParagraphKind::Code => "code",
            ParagraphKind::Quote => "quote",
            ParagraphKind::List => "list",
        }
    }

    /// The kind after this one, wrapping around (used by the kind selector)
    pub fn next(&self) -> Self {
        match self {
            ParagraphKind::Text => ParagraphKind::Code,
            ParagraphKind::Code => ParagraphKind::Quote,
            ParagraphKind::Quote => ParagraphKind::List,
            ParagraphKind::List => ParagraphKind::Text,
        }
    }
}

impl std::fmt::Display for ParagraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParagraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ParagraphKind::Text),
            "code" => Ok(ParagraphKind::Code),
            "quote" => Ok(ParagraphKind::Quote),
            "list" => Ok(ParagraphKind::List),
            other => Err(format!(
                "Unknown paragraph type '{}'. Valid types: text, code, quote, list",
                other
            )),
        }
    }
}

/// One typed content block of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireParagraph", into = "WireParagraph")]
pub enum Paragraph {
    Text(String),
    Code(String),
    Quote(String),
    List(Vec<String>),
}

impl Paragraph {
    pub fn kind(&self) -> ParagraphKind {
        match self {
            Paragraph::Text(_) => ParagraphKind::Text,
            Paragraph::Code(_) => ParagraphKind::Code,
            Paragraph::Quote(_) => ParagraphKind::Quote,
            Paragraph::List(_) => ParagraphKind::List,
        }
    }

    /// Content as the backend stores it
    pub fn wire_content(&self) -> String {
        match self {
            Paragraph::Text(s) | Paragraph::Code(s) | Paragraph::Quote(s) => s.clone(),
            Paragraph::List(items) => encode_list(items),
        }
    }
}

/// `{"type": ..., "content": ...}` as exchanged with the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireParagraph {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

impl TryFrom<WireParagraph> for Paragraph {
    type Error = String;

    fn try_from(wire: WireParagraph) -> Result<Self, Self::Error> {
        let kind: ParagraphKind = wire.kind.parse()?;
        Ok(match kind {
            ParagraphKind::Text => Paragraph::Text(wire.content),
            ParagraphKind::Code => Paragraph::Code(wire.content),
            ParagraphKind::Quote => Paragraph::Quote(wire.content),
            ParagraphKind::List => Paragraph::List(decode_list(&wire.content)),
        })
    }
}

impl From<Paragraph> for WireParagraph {
    fn from(paragraph: Paragraph) -> Self {
        WireParagraph {
            kind: paragraph.kind().as_str().to_string(),
            content: paragraph.wire_content(),
        }
    }
}

/// Pack list items into the backend's delimited form
pub fn encode_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", item.as_ref(), LIST_SEPARATOR))
        .collect()
}

/// Unpack delimited list content, dropping empty entries
pub fn decode_list(content: &str) -> Vec<String> {
    content
        .split(LIST_SEPARATOR)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A category posts are grouped under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    #[serde(default)]
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Identifier used in `/topic/:term` and in create requests
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub uuid: String,
    pub username: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// An authenticated user and the bearer token the backend issued
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Body of `POST /auth/login` and `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /posts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Topic url
    pub topic: String,
    pub paragraphs: Vec<Paragraph>,
}

/// Which page of the post listing to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Id to page from; `None` means the newest posts
    pub cursor: Option<u64>,
    /// With a cursor: fetch posts newer than it instead of older
    pub recent: bool,
}

impl PostQuery {
    pub fn newest() -> Self {
        Self::default()
    }

    pub fn older_than(id: u64) -> Self {
        Self {
            cursor: Some(id),
            recent: false,
        }
    }

    pub fn newer_than(id: u64) -> Self {
        Self {
            cursor: Some(id),
            recent: true,
        }
    }
}
