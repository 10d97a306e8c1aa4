//! Reading views: home, post listings, single post, topic page

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use libquill::store::{Loadable, State};
use libquill::{Paragraph as PostParagraph, Post, Topic};

use super::accent;
use crate::app::AppState;

pub fn render_home(frame: &mut Frame, area: Rect, ui: &AppState, data: &State) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let greeting = match data.user() {
        Some(user) => format!("Welcome back, {}.", user.username),
        None => "Welcome to Quill.".to_string(),
    };
    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            greeting,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Read what people write about the topics below, or press F4 to write"),
        Line::from("something yourself."),
    ])
    .block(Block::default().title(" Home ").borders(Borders::ALL))
    .wrap(Wrap { trim: true });
    frame.render_widget(welcome, chunks[0]);

    render_topic_list(frame, chunks[1], ui, data, ui.selected, true, None);
}

pub fn render_all_posts(frame: &mut Frame, area: Rect, ui: &AppState, data: &State) {
    let footer = if data.loading_more {
        " Loading older posts... "
    } else if data.has_more_posts {
        " m: load more "
    } else {
        ""
    };

    let block = Block::default()
        .title(" All posts ")
        .title(
            ratatui::widgets::block::Title::from(footer)
                .position(ratatui::widgets::block::Position::Bottom),
        )
        .borders(Borders::ALL);

    render_post_list(frame, area, ui, &data.posts, ui.selected, true, block);
}

pub fn render_your_posts(frame: &mut Frame, area: Rect, ui: &AppState, data: &State) {
    let block = Block::default()
        .title(" Your posts ")
        .title(
            ratatui::widgets::block::Title::from(" d: delete ")
                .position(ratatui::widgets::block::Position::Bottom),
        )
        .borders(Borders::ALL);

    render_post_list(frame, area, ui, &data.user_posts, ui.selected, true, block);
}

pub fn render_topic(frame: &mut Frame, area: Rect, ui: &AppState, data: &State, term: &str) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let topic = libquill::topics::find_by_url(data.topic_list(), term);
    let title = topic.map_or_else(|| term.to_string(), |t| t.title.clone());

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);

    let description = topic.map(|t| t.description.clone()).unwrap_or_default();
    frame.render_widget(
        Paragraph::new(description)
            .block(
                Block::default()
                    .title(format!(" {} ", title))
                    .borders(Borders::ALL),
            )
            .wrap(Wrap { trim: true }),
        main[0],
    );

    let posts = match &data.topic_posts {
        Some(keyed) if keyed.key == term => keyed.data.clone(),
        _ => Loadable::Loading,
    };
    render_post_list(
        frame,
        main[1],
        ui,
        &posts,
        ui.selected,
        !ui.side_focus,
        Block::default().title(" Posts ").borders(Borders::ALL),
    );

    render_topic_list(
        frame,
        columns[1],
        ui,
        data,
        ui.side_selected,
        ui.side_focus,
        Some(term),
    );
}

pub fn render_post(frame: &mut Frame, area: Rect, ui: &AppState, data: &State, id: &str) {
    let block = Block::default().borders(Borders::ALL);

    let current = data.current_post.as_ref().filter(|keyed| keyed.key == id);
    let widget = match current.map(|keyed| &keyed.data) {
        Some(Loadable::Ready(post)) => {
            let scroll = u16::try_from(ui.selected).unwrap_or(u16::MAX);
            Paragraph::new(post_lines(post))
                .block(block.title(format!(" {} ", post.title)))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0))
        }
        Some(Loadable::Failed(error)) => status_text(block, &format!("Could not load post: {}", error)),
        _ => status_text(block, "Loading..."),
    };

    frame.render_widget(widget, area);
}

/// Full text of a post as display lines
pub fn post_lines(post: &Post) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            post.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(meta(post), Style::default().fg(Color::Gray))),
    ];

    if !post.description.is_empty() {
        lines.push(Line::from(Span::styled(
            post.description.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    if !post.image_url.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("[image] {}", post.image_url),
            Style::default().fg(Color::Blue),
        )));
    }
    lines.push(Line::from(""));

    if post.paragraphs.is_empty() {
        lines.extend(post.text.lines().map(|line| Line::from(line.to_string())));
    }

    for paragraph in &post.paragraphs {
        lines.extend(paragraph_lines(paragraph));
        lines.push(Line::from(""));
    }

    lines
}

fn paragraph_lines(paragraph: &PostParagraph) -> Vec<Line<'static>> {
    match paragraph {
        PostParagraph::Text(content) => content
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect(),
        PostParagraph::Code(content) => {
            let code = Style::default().fg(Color::Green);
            content
                .lines()
                .map(|line| {
                    Line::from(vec![
                        Span::styled("  | ", Style::default().fg(Color::DarkGray)),
                        Span::styled(line.to_string(), code),
                    ])
                })
                .collect()
        }
        PostParagraph::Quote(content) => content
            .lines()
            .map(|line| {
                Line::from(Span::styled(
                    format!("  > {}", line),
                    Style::default().add_modifier(Modifier::ITALIC),
                ))
            })
            .collect(),
        PostParagraph::List(items) => items
            .iter()
            .map(|item| Line::from(format!("  • {}", item)))
            .collect(),
    }
}

fn meta(post: &Post) -> String {
    let mut parts = vec![format!("by {}", post.author_name())];
    if let Some(created) = post.created_at {
        parts.push(created.format("%Y-%m-%d").to_string());
    }
    parts.push(format!("{} likes", post.likes));
    if let Some(topic) = &post.topic {
        parts.push(format!("in {}", topic));
    }
    parts.join(" · ")
}

fn render_post_list(
    frame: &mut Frame,
    area: Rect,
    ui: &AppState,
    posts: &Loadable<Vec<Post>>,
    selected: usize,
    focused: bool,
    block: Block,
) {
    let posts = match posts {
        Loadable::Ready(posts) if posts.is_empty() => {
            frame.render_widget(status_text(block, "No posts yet."), area);
            return;
        }
        Loadable::Ready(posts) => posts,
        Loadable::Failed(error) => {
            frame.render_widget(status_text(block, &format!("Could not load posts: {}", error)), area);
            return;
        }
        Loadable::NotAsked | Loadable::Loading => {
            frame.render_widget(status_text(block, "Loading..."), area);
            return;
        }
    };

    let items: Vec<ListItem> = posts
        .iter()
        .map(|post| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    post.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(meta(post), Style::default().fg(Color::Gray))),
            ])
        })
        .collect();

    render_list(frame, area, ui, items, selected, focused, block);
}

fn render_topic_list(
    frame: &mut Frame,
    area: Rect,
    ui: &AppState,
    data: &State,
    selected: usize,
    focused: bool,
    current: Option<&str>,
) {
    let block = Block::default().title(" Topics ").borders(Borders::ALL);

    let topics: &[Topic] = match &data.topics {
        Loadable::Ready(topics) => topics,
        Loadable::Failed(error) => {
            frame.render_widget(status_text(block, &format!("Could not load topics: {}", error)), area);
            return;
        }
        _ => {
            frame.render_widget(status_text(block, "Loading..."), area);
            return;
        }
    };

    let items: Vec<ListItem> = topics
        .iter()
        .map(|topic| {
            let style = if current == Some(topic.url.as_str()) {
                accent(ui)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(topic.title.clone(), style)))
        })
        .collect();

    render_list(frame, area, ui, items, selected, focused, block);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    ui: &AppState,
    items: Vec<ListItem>,
    selected: usize,
    focused: bool,
    block: Block,
) {
    let last = items.len().saturating_sub(1);
    let highlight = if focused {
        accent(ui).add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(selected.min(last)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn status_text<'a>(block: Block<'a>, message: &str) -> Paragraph<'a> {
    Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Gray),
    )))
    .block(block)
    .wrap(Wrap { trim: true })
}
