//! Post editor form state
//!
//! Holds everything the composer collects before a post is published: an
//! ordered, append-only list of typed paragraphs plus title, description,
//! image and topic. Editing is addressed by paragraph index. Nothing here
//! performs I/O; `submit` only packages the form into a [`NewPost`].

use crate::error::EditorError;
use crate::topics::filter_topics;
use crate::types::{NewPost, Paragraph, ParagraphKind, Topic, LIST_SEPARATOR};

/// Identifier of a paragraph within one editor session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParagraphId(pub u64);

/// A paragraph being composed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorParagraph {
    pub id: ParagraphId,
    pub kind: ParagraphKind,
    /// Raw text as typed; kept verbatim across kind changes
    pub content: String,
    /// Items of a list paragraph, empty for every other kind
    pub items: Vec<String>,
}

/// Non-blank lines of `content`, trimmed, as list items
fn content_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl EditorParagraph {
    /// Strip editor bookkeeping, keeping only kind and content
    pub fn to_paragraph(&self) -> Paragraph {
        match self.kind {
            ParagraphKind::Text => Paragraph::Text(self.content.clone()),
            ParagraphKind::Code => Paragraph::Code(self.content.clone()),
            ParagraphKind::Quote => Paragraph::Quote(self.content.clone()),
            ParagraphKind::List => Paragraph::List(self.items.clone()),
        }
    }
}

/// The two pages of the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorStep {
    /// Title, description and paragraphs
    #[default]
    Content,
    /// Topic, image and publish
    Details,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostEditor {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub selected_topic: Option<Topic>,
    pub topic_search: String,
    pub step: EditorStep,
    paragraphs: Vec<EditorParagraph>,
    next_id: u64,
}

impl PostEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraphs(&self) -> &[EditorParagraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&EditorParagraph> {
        self.paragraphs.get(index)
    }

    /// Append an empty text paragraph and return its id
    pub fn append_paragraph(&mut self) -> ParagraphId {
        let id = ParagraphId(self.next_id);
        self.next_id += 1;
        self.paragraphs.push(EditorParagraph {
            id,
            kind: ParagraphKind::Text,
            content: String::new(),
            items: Vec::new(),
        });
        id
    }

    fn paragraph_mut(&mut self, index: usize) -> Result<&mut EditorParagraph, EditorError> {
        self.paragraphs
            .get_mut(index)
            .ok_or(EditorError::NoSuchParagraph(index))
    }

    pub fn edit_paragraph_content(
        &mut self,
        index: usize,
        content: impl Into<String>,
    ) -> Result<(), EditorError> {
        let paragraph = self.paragraph_mut(index)?;
        paragraph.content = content.into();
        if paragraph.kind == ParagraphKind::List {
            paragraph.items = content_lines(&paragraph.content);
        }
        Ok(())
    }

    /// Retype a paragraph
    ///
    /// Turning a paragraph into a list makes each non-blank line of its
    /// content an item. Leaving a list keeps the content verbatim unless items
    /// were added since, in which case the content becomes one item per line.
    pub fn change_paragraph_kind(
        &mut self,
        index: usize,
        kind: ParagraphKind,
    ) -> Result<(), EditorError> {
        let paragraph = self.paragraph_mut(index)?;
        let was_list = paragraph.kind == ParagraphKind::List;
        let is_list = kind == ParagraphKind::List;

        if !was_list && is_list {
            paragraph.items = content_lines(&paragraph.content);
        } else if was_list && !is_list {
            let items = std::mem::take(&mut paragraph.items);
            if items != content_lines(&paragraph.content) {
                paragraph.content = items.join("\n");
            }
        }

        paragraph.kind = kind;
        Ok(())
    }

    /// Add an item to a list paragraph. Blank items are ignored; items
    /// holding the list separator are rejected.
    pub fn append_list_item(&mut self, index: usize, item: &str) -> Result<(), EditorError> {
        let paragraph = self.paragraph_mut(index)?;
        if paragraph.kind != ParagraphKind::List {
            return Err(EditorError::NotAList(index));
        }
        let item = item.trim();
        if item.contains(LIST_SEPARATOR) {
            return Err(EditorError::ListSeparator(index));
        }
        if !item.is_empty() {
            paragraph.items.push(item.to_string());
        }
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_image_url(&mut self, image_url: impl Into<String>) {
        self.image_url = image_url.into();
    }

    pub fn set_topic_search(&mut self, query: impl Into<String>) {
        self.topic_search = query.into();
    }

    pub fn select_topic(&mut self, topic: Topic) {
        self.selected_topic = Some(topic);
    }

    pub fn clear_topic(&mut self) {
        self.selected_topic = None;
    }

    pub fn is_selected(&self, topic: &Topic) -> bool {
        self.selected_topic
            .as_ref()
            .is_some_and(|selected| selected.url == topic.url)
    }

    /// Topics matching the current search string
    pub fn matching_topics<'a>(&self, topics: &'a [Topic]) -> Vec<&'a Topic> {
        filter_topics(topics, &self.topic_search)
    }

    pub fn next_step(&mut self) {
        self.step = EditorStep::Details;
    }

    pub fn previous_step(&mut self) {
        self.step = EditorStep::Content;
    }

    /// Package the form into a create request.
    ///
    /// Fails without touching the form when no topic is selected or the
    /// title is blank.
    pub fn submit(&self) -> Result<NewPost, EditorError> {
        let topic = self
            .selected_topic
            .as_ref()
            .ok_or(EditorError::MissingTopic)?;

        if self.title.trim().is_empty() {
            return Err(EditorError::MissingTitle);
        }

        if let Some(index) = self.paragraphs.iter().position(|p| {
            p.kind == ParagraphKind::List && p.items.iter().any(|i| i.contains(LIST_SEPARATOR))
        }) {
            return Err(EditorError::ListSeparator(index));
        }

        Ok(NewPost {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            topic: topic.url.clone(),
            paragraphs: self
                .paragraphs
                .iter()
                .map(EditorParagraph::to_paragraph)
                .collect(),
        })
    }

    /// Start over after a successful publish. Ids keep increasing.
    pub fn reset(&mut self) {
        let next_id = self.next_id;
        *self = Self {
            next_id,
            ..Self::default()
        };
    }
}
