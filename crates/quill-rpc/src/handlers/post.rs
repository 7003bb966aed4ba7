// crates/quill-rpc/src/handlers/post.rs
//
// Post handlers: getPosts, getPostById, createPost, updatePost, deletePost,
// getUserPosts, getPostWithAuthor.

use chrono::Utc;

use quill_core::error::QuillError;
use quill_core::ids::{PostId, UserId};
use quill_core::pagination::{Page, Pagination};
use quill_core::post::{CreatePostInput, DeleteResult, Post, PostWithAuthor, UpdatePostInput};
use quill_core::traits::{PostStore, UserStore};

fn post_not_found(id: &PostId) -> QuillError {
    QuillError::NotFound(format!("post {}", id))
}

// ---------------------------------------------------------------------------
// getPosts
// ---------------------------------------------------------------------------

/// Handle a getPosts request.
///
/// An out-of-range page yields empty `data`, never an error.
pub async fn handle_list_posts<S>(store: &S, pagination: Pagination) -> Result<Page<Post>, QuillError>
where
    S: PostStore + ?Sized,
{
    let posts = store.list_posts().await?;
    Ok(pagination.apply(posts))
}

// ---------------------------------------------------------------------------
// getPostById
// ---------------------------------------------------------------------------

/// Handle a getPostById request.
pub async fn handle_get_post<S>(store: &S, id: PostId) -> Result<Post, QuillError>
where
    S: PostStore + ?Sized,
{
    store.get_post(&id).await?.ok_or_else(|| post_not_found(&id))
}

// ---------------------------------------------------------------------------
// createPost
// ---------------------------------------------------------------------------

/// Handle a createPost request.
///
/// The author id is stored as given; no existence check against users.
pub async fn handle_create_post<S>(store: &S, input: CreatePostInput) -> Result<Post, QuillError>
where
    S: PostStore + ?Sized,
{
    let post = Post::create(input, Utc::now());
    store.insert_post(post.clone()).await?;
    tracing::info!(post_id = %post.id, author_id = %post.author_id, "post created");
    Ok(post)
}

// ---------------------------------------------------------------------------
// updatePost
// ---------------------------------------------------------------------------

/// Handle an updatePost request: merge the provided fields only.
pub async fn handle_update_post<S>(store: &S, input: UpdatePostInput) -> Result<Post, QuillError>
where
    S: PostStore + ?Sized,
{
    if input.patch.is_empty() {
        tracing::debug!(post_id = %input.id, "updatePost with no fields, refreshing updatedAt only");
    }

    let updated = store
        .update_post(&input.id, &input.patch, Utc::now())
        .await?
        .ok_or_else(|| post_not_found(&input.id))?;

    tracing::info!(post_id = %updated.id, "post updated");
    Ok(updated)
}

// ---------------------------------------------------------------------------
// deletePost
// ---------------------------------------------------------------------------

/// Handle a deletePost request. Deleting an absent id is always `NotFound`.
pub async fn handle_delete_post<S>(store: &S, id: PostId) -> Result<DeleteResult, QuillError>
where
    S: PostStore + ?Sized,
{
    store.remove_post(&id).await?.ok_or_else(|| post_not_found(&id))?;
    tracing::info!(post_id = %id, "post deleted");
    Ok(DeleteResult { success: true })
}

// ---------------------------------------------------------------------------
// getUserPosts
// ---------------------------------------------------------------------------

/// Handle a getUserPosts request. An author with no posts gets an empty list.
pub async fn handle_list_user_posts<S>(store: &S, author: UserId) -> Result<Vec<Post>, QuillError>
where
    S: PostStore + ?Sized,
{
    store.list_posts_by_author(&author).await
}

// ---------------------------------------------------------------------------
// getPostWithAuthor
// ---------------------------------------------------------------------------

/// Handle a getPostWithAuthor request.
///
/// Fails with `NotFound` when either the post or its author is missing.
pub async fn handle_get_post_with_author<S>(store: &S, id: PostId) -> Result<PostWithAuthor, QuillError>
where
    S: PostStore + UserStore + ?Sized,
{
    let post = handle_get_post(store, id).await?;
    let author = store
        .get_user(&post.author_id)
        .await?
        .ok_or_else(|| QuillError::NotFound(format!("author {} of post {}", post.author_id, id)))?;
    Ok(PostWithAuthor { post, author })
}
