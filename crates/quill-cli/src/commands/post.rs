// crates/quill-cli/src/commands/post.rs
//
// `quill post` subcommands.

use clap::Subcommand;
use serde_json::{json, Map, Value};

use quill_core::{DeleteResult, Page, Post, PostWithAuthor};

use crate::output::{self, OutputFormat};
use crate::rpc_client::RpcClient;

/// Post subcommands.
#[derive(Debug, Subcommand)]
pub enum PostCmd {
    /// List one page of posts in creation order.
    List {
        /// Page number, starting at 1.
        #[arg(long)]
        page: Option<u64>,

        /// Posts per page (1-100).
        #[arg(long)]
        page_size: Option<u64>,
    },

    /// Show a single post.
    Get {
        /// Post id.
        id: String,

        /// Include the author record.
        #[arg(long)]
        with_author: bool,
    },

    /// Create a post.
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        /// Author user id.
        #[arg(long)]
        author: String,

        #[arg(long)]
        published: bool,
    },

    /// Update fields of an existing post. Omitted flags are left as they are.
    Update {
        /// Post id.
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        published: Option<bool>,
    },

    /// Delete a post.
    Delete {
        /// Post id.
        id: String,
    },

    /// List every post written by one author.
    ByAuthor {
        /// Author user id.
        author: String,
    },
}

/// Run a post subcommand.
pub async fn run(
    client: &RpcClient,
    cmd: &PostCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PostCmd::List { page, page_size } => {
            let result: Page<Post> = client
                .call("getPosts", list_params(*page, *page_size))
                .await?;
            if format == OutputFormat::Json {
                println!("{}", output::format_json(&result));
            } else {
                println!("{}", output::render_posts(&result.data, format));
                println!(
                    "Page {} ({} per page), {} total{}",
                    result.page,
                    result.page_size,
                    result.total,
                    if result.has_more { ", more available" } else { "" }
                );
            }
        }
        PostCmd::Get { id, with_author } => {
            if *with_author {
                let result: PostWithAuthor = client.call("getPostWithAuthor", json!(id)).await?;
                if format == OutputFormat::Json {
                    println!("{}", output::format_json(&result));
                } else {
                    println!("{}", output::render_post(&result.post, format));
                    println!();
                    println!("{}", output::render_user(&result.author, format));
                }
            } else {
                let post: Post = client.call("getPostById", json!(id)).await?;
                println!("{}", output::render_post(&post, format));
            }
        }
        PostCmd::Create {
            title,
            content,
            author,
            published,
        } => {
            let params = json!({
                "title": title,
                "content": content,
                "authorId": author,
                "published": published,
            });
            let post: Post = client.call("createPost", params).await?;
            println!("{}", output::render_post(&post, format));
        }
        PostCmd::Update {
            id,
            title,
            content,
            published,
        } => {
            let params = update_params(id, title.as_deref(), content.as_deref(), *published);
            let post: Post = client.call("updatePost", params).await?;
            println!("{}", output::render_post(&post, format));
        }
        PostCmd::Delete { id } => {
            let result: DeleteResult = client.call("deletePost", json!(id)).await?;
            if format == OutputFormat::Json {
                println!("{}", output::format_json(&result));
            } else {
                println!("Deleted post {}", id);
            }
        }
        PostCmd::ByAuthor { author } => {
            let posts: Vec<Post> = client.call("getUserPosts", json!(author)).await?;
            println!("{}", output::render_posts(&posts, format));
        }
    }

    Ok(())
}

fn list_params(page: Option<u64>, page_size: Option<u64>) -> Value {
    let mut params = Map::new();
    if let Some(page) = page {
        params.insert("page".to_string(), json!(page));
    }
    if let Some(size) = page_size {
        params.insert("pageSize".to_string(), json!(size));
    }
    Value::Object(params)
}

fn update_params(
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
    published: Option<bool>,
) -> Value {
    let mut params = Map::new();
    params.insert("id".to_string(), json!(id));
    if let Some(title) = title {
        params.insert("title".to_string(), json!(title));
    }
    if let Some(content) = content {
        params.insert("content".to_string(), json!(content));
    }
    if let Some(published) = published {
        params.insert("published".to_string(), json!(published));
    }
    Value::Object(params)
}
