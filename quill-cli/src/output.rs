//! Text and JSON rendering of command results

use anyhow::Result;
use clap::ValueEnum;
use libquill::{Paragraph, Post, Topic, User};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_posts(posts: &[Post], format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(posts),
        Format::Text => {
            for post in posts {
                println!("{}", post_summary(post));
            }
            Ok(())
        }
    }
}

pub fn print_post(post: &Post, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(post),
        Format::Text => {
            println!("{}", post.title);
            println!("{}", post_meta(post));
            if !post.description.is_empty() {
                println!();
                println!("{}", post.description);
            }
            if !post.image_url.is_empty() {
                println!("[image] {}", post.image_url);
            }
            println!();

            if post.paragraphs.is_empty() && !post.text.is_empty() {
                println!("{}", post.text);
            }
            for paragraph in &post.paragraphs {
                println!("{}", paragraph_text(paragraph));
                println!();
            }
            Ok(())
        }
    }
}

pub fn print_topics(topics: &[&Topic], format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(topics),
        Format::Text => {
            for topic in topics {
                if topic.description.is_empty() {
                    println!("{:<20} {}", topic.url, topic.title);
                } else {
                    println!("{:<20} {} - {}", topic.url, topic.title, topic.description);
                }
            }
            Ok(())
        }
    }
}

pub fn print_user(user: &User, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(user),
        Format::Text => {
            println!("{}", user.username);
            Ok(())
        }
    }
}

/// One line per post: id, date, title, author
fn post_summary(post: &Post) -> String {
    let date = post
        .created_at
        .map(|created| created.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>6} | {} | {} | {}",
        post.id,
        date,
        post.title,
        post.author_name()
    )
}

fn post_meta(post: &Post) -> String {
    let mut parts = vec![format!("by {}", post.author_name())];
    if let Some(created) = post.created_at {
        parts.push(created.format("%Y-%m-%d %H:%M").to_string());
    }
    parts.push(format!("{} likes", post.likes));
    if let Some(topic) = &post.topic {
        parts.push(format!("topic: {}", topic));
    }
    parts.join(" | ")
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    match paragraph {
        Paragraph::Text(content) => content.clone(),
        Paragraph::Code(content) => indent(content, "    "),
        Paragraph::Quote(content) => indent(content, "> "),
        Paragraph::List(items) => items
            .iter()
            .map(|item| format!("  - {}", item))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn indent(content: &str, prefix: &str) -> String {
    content
        .lines()
        .map(|line| format!("{}{}", prefix, line))
        .collect::<Vec<_>>()
        .join("\n")
}
