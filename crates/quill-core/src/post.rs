// crates/quill-core/src/post.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{PostId, UserId};
use crate::user::User;
use crate::validation::{Length, ObjectReader, Schema, ValidationError};

/// Longest allowed post title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier, fixed at creation.
    pub id: PostId,
    /// Title, 1 to 200 characters.
    pub title: String,
    /// Body text, never empty.
    pub content: String,
    /// Whether the post is publicly visible.
    pub published: bool,
    /// Author reference. Not checked against the user collection.
    pub author_id: UserId,
    /// Creation timestamp. Never changes after creation.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a new post from validated input with a freshly generated id.
    /// Both timestamps are set to `now`.
    pub fn create(input: CreatePostInput, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::generate(),
            title: input.title,
            content: input.content,
            published: input.published,
            author_id: input.author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A post together with its resolved author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: User,
}

/// Input of `createPost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    /// Defaults to `false` when absent.
    pub published: bool,
    pub author_id: UserId,
}

impl Schema for CreatePostInput {
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ObjectReader::new(raw);
        let title = reader.required_string("title", Length::between(1, MAX_TITLE_LEN));
        let content = reader.required_string("content", Length::at_least(1));
        let published = reader.optional_bool("published").unwrap_or(false);
        let author_id = reader.required_uuid("authorId");
        let violations = reader.finish();

        match (title, content, author_id) {
            (Some(title), Some(content), Some(author_id)) if violations.is_empty() => Ok(Self {
                title,
                content,
                published,
                author_id: UserId::from_uuid(author_id),
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// The optional fields of a post that `updatePost` may overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostPatch {
    /// Merge the provided fields over `post` and stamp `updated_at`.
    /// Fields left as `None` are untouched; `id`, `author_id` and
    /// `created_at` are never modified. `updated_at` never moves backwards,
    /// even if the wall clock does.
    pub fn apply(&self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        post.updated_at = now.max(post.updated_at);
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.published.is_none()
    }
}

/// Input of `updatePost`: target id plus a partial set of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePostInput {
    pub id: PostId,
    #[serde(flatten)]
    pub patch: PostPatch,
}

impl Schema for UpdatePostInput {
    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ObjectReader::new(raw);
        let id = reader.required_uuid("id");
        let title = reader.optional_string("title", Length::between(1, MAX_TITLE_LEN));
        let content = reader.optional_string("content", Length::at_least(1));
        let published = reader.optional_bool("published");
        let violations = reader.finish();

        match id {
            Some(id) if violations.is_empty() => Ok(Self {
                id: PostId::from_uuid(id),
                patch: PostPatch {
                    title,
                    content,
                    published,
                },
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// Result of `deletePost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}
