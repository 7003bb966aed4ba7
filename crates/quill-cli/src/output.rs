// crates/quill-cli/src/output.rs
//
// Output formatting utilities for the Quill CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use quill_core::{Post, User};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// A row in the post listing table.
#[derive(Tabled)]
pub struct PostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Published")]
    published: bool,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Post> for PostRow {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            title: truncate(&post.title, 40),
            published: post.published,
            author: post.author_id.to_string(),
            updated: post.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// A row in the user table.
#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Render posts in the requested format.
pub fn render_posts(posts: &[Post], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(&posts),
        OutputFormat::Table => {
            let rows: Vec<PostRow> = posts.iter().map(PostRow::from).collect();
            format_table(&rows)
        }
    }
}

/// Render a single post: a one-row table followed by its content.
pub fn render_post(post: &Post, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(post),
        OutputFormat::Table => format!(
            "{}\n\n{}",
            format_table(&[PostRow::from(post)]),
            post.content
        ),
    }
}

pub fn render_user(user: &User, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(user),
        OutputFormat::Table => format_table(&[UserRow::from(user)]),
    }
}

/// Truncate a string to the given number of characters, appending "..." if truncated.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
