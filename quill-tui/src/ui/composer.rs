//! Post composer: content step and details step

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use libquill::editor::EditorParagraph;
use libquill::store::State;
use libquill::types::ParagraphKind;
use libquill::EditorStep;

use super::accent;
use super::login::input;
use crate::app::{AppState, ComposerField};

pub fn render_composer(frame: &mut Frame, area: Rect, ui: &AppState, data: &State) {
    match ui.editor.step {
        EditorStep::Content => render_content(frame, area, ui),
        EditorStep::Details => render_details(frame, area, ui, data),
    }
}

fn render_content(frame: &mut Frame, area: Rect, ui: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Description
            Constraint::Min(3),    // Paragraphs
        ])
        .split(area);

    let field = ui.composer.field;
    frame.render_widget(
        input(ui, "Title", &ui.editor.title, field == ComposerField::Title),
        chunks[0],
    );
    frame.render_widget(
        input(
            ui,
            "Description",
            &ui.editor.description,
            field == ComposerField::Description,
        ),
        chunks[1],
    );

    let mut lines = Vec::new();
    for (index, paragraph) in ui.editor.paragraphs().iter().enumerate() {
        let focused = field == ComposerField::Paragraph(index);
        lines.extend(paragraph_block(ui, paragraph, focused));
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No paragraphs yet. Ctrl+P adds one.",
            Style::default().fg(Color::Gray),
        )));
    }

    // Keep the focused paragraph in view
    let focus_line = match field {
        ComposerField::Paragraph(index) => ui
            .editor
            .paragraphs()
            .iter()
            .take(index)
            .map(|p| paragraph_height(ui, p) + 1)
            .sum::<usize>(),
        _ => 0,
    };
    let visible = usize::from(chunks[2].height.saturating_sub(2));
    let scroll = focus_line.saturating_sub(visible / 2);

    let body = Paragraph::new(lines)
        .block(Block::default().title(" Paragraphs ").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(body, chunks[2]);
}

fn paragraph_block(ui: &AppState, paragraph: &EditorParagraph, focused: bool) -> Vec<Line<'static>> {
    let label_style = if focused {
        accent(ui).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "> " } else { "  " };

    let mut lines = vec![Line::from(Span::styled(
        format!("{}[{}]", marker, paragraph.kind.as_str()),
        label_style,
    ))];

    match paragraph.kind {
        ParagraphKind::List => {
            lines.extend(
                paragraph
                    .items
                    .iter()
                    .map(|item| Line::from(format!("    • {}", item))),
            );
            if focused {
                lines.push(Line::from(vec![
                    Span::raw(format!("    + {}", ui.composer.pending_item)),
                    Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                ]));
            }
        }
        kind => {
            let style = match kind {
                ParagraphKind::Code => Style::default().fg(Color::Green),
                ParagraphKind::Quote => Style::default().add_modifier(Modifier::ITALIC),
                _ => Style::default(),
            };
            let mut content: Vec<Line> = paragraph
                .content
                .split('\n')
                .map(|line| Line::from(Span::styled(format!("    {}", line), style)))
                .collect();
            if focused {
                if let Some(last) = content.last_mut() {
                    last.spans.push(Span::styled(
                        "_",
                        Style::default().add_modifier(Modifier::SLOW_BLINK),
                    ));
                }
            }
            lines.extend(content);
        }
    }

    lines
}

fn paragraph_height(ui: &AppState, paragraph: &EditorParagraph) -> usize {
    paragraph_block(ui, paragraph, false).len()
}

fn render_details(frame: &mut Frame, area: Rect, ui: &AppState, data: &State) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Image URL
            Constraint::Length(3), // Topic search
            Constraint::Min(3),    // Matching topics
            Constraint::Length(3), // Summary
        ])
        .split(area);

    let field = ui.composer.field;
    frame.render_widget(
        input(
            ui,
            "Image URL",
            &ui.editor.image_url,
            field == ComposerField::ImageUrl,
        ),
        chunks[0],
    );
    frame.render_widget(
        input(
            ui,
            "Search topics",
            &ui.editor.topic_search,
            field == ComposerField::TopicSearch,
        ),
        chunks[1],
    );

    let matching = ui.editor.matching_topics(data.topic_list());
    let block = Block::default().title(" Topics ").borders(Borders::ALL);
    if matching.is_empty() {
        let message = if data.topics.is_loading() {
            "Loading topics..."
        } else {
            "No topic matches."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::Gray))).block(block),
            chunks[2],
        );
    } else {
        let items: Vec<ListItem> = matching
            .iter()
            .map(|topic| {
                let check = if ui.editor.is_selected(topic) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", check, topic.title))
            })
            .collect();
        let last = items.len() - 1;
        let list = List::new(items)
            .block(block)
            .highlight_style(accent(ui).add_modifier(Modifier::REVERSED));
        let mut state =
            ListState::default().with_selected(Some(ui.composer.topic_cursor.min(last)));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let topic = ui
        .editor
        .selected_topic
        .as_ref()
        .map_or("none".to_string(), |topic| topic.title.clone());
    let mut summary = vec![Span::raw(format!("Topic: {}", topic))];
    if ui.composer.publishing {
        summary.push(Span::styled(
            "   Publishing...",
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(summary))
            .block(Block::default().borders(Borders::ALL)),
        chunks[3],
    );
}
