//! Post drafts read from TOML files
//!
//! ```toml
//! title = "Ownership in practice"
//! description = "Notes from a week of refactoring"
//! image_url = ""
//! topic = "rust"
//!
//! [[paragraphs]]
//! type = "text"
//! content = "Moves are cheap."
//!
//! [[paragraphs]]
//! type = "list"
//! items = ["Box", "Rc", "Arc"]
//! ```

use libquill::error::EditorError;
use libquill::types::LIST_SEPARATOR;
use libquill::{ParagraphKind, PostEditor, Topic};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Draft {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub image_url: String,

    /// Topic url, e.g. `rust`
    pub topic: Option<String>,

    #[serde(default)]
    pub paragraphs: Vec<DraftParagraph>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftParagraph {
    /// Defaults to text
    #[serde(rename = "type")]
    pub kind: Option<ParagraphKind>,

    #[serde(default)]
    pub content: String,

    /// List paragraphs only
    #[serde(default)]
    pub items: Vec<String>,
}

impl Draft {
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Checks that need no backend: a topic is named, the title is set and
    /// no list item holds the list separator
    pub fn validate(&self) -> Result<&str, EditorError> {
        let topic = self
            .topic
            .as_deref()
            .filter(|topic| !topic.trim().is_empty())
            .ok_or(EditorError::MissingTopic)?;

        if self.title.trim().is_empty() {
            return Err(EditorError::MissingTitle);
        }

        if let Some(index) = self.paragraphs.iter().position(|paragraph| {
            paragraph.kind == Some(ParagraphKind::List)
                && (paragraph.content.contains(LIST_SEPARATOR)
                    || paragraph.items.iter().any(|item| item.contains(LIST_SEPARATOR)))
        }) {
            return Err(EditorError::ListSeparator(index));
        }

        Ok(topic)
    }

    /// Fill an editor the way the composer would, with `topic` selected
    pub fn to_editor(&self, topic: Option<Topic>) -> Result<PostEditor, EditorError> {
        let mut editor = PostEditor::new();
        editor.set_title(self.title.as_str());
        editor.set_description(self.description.as_str());
        editor.set_image_url(self.image_url.as_str());

        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            editor.append_paragraph();
            editor.edit_paragraph_content(index, paragraph.content.as_str())?;
            editor.change_paragraph_kind(index, paragraph.kind.unwrap_or(ParagraphKind::Text))?;

            // Content lines of a list come first, then its items
            if paragraph.kind == Some(ParagraphKind::List) {
                for item in &paragraph.items {
                    editor.append_list_item(index, item)?;
                }
            }
        }

        if let Some(topic) = topic {
            editor.select_topic(topic);
        }

        Ok(editor)
    }
}
