// crates/quill-rpc/src/handlers/user.rs
//
// User handlers: createUser, getUserById.

use chrono::Utc;

use quill_core::error::QuillError;
use quill_core::ids::UserId;
use quill_core::traits::UserStore;
use quill_core::user::{CreateUserInput, User};

/// Handle a createUser request.
pub async fn handle_create_user<S>(store: &S, input: CreateUserInput) -> Result<User, QuillError>
where
    S: UserStore + ?Sized,
{
    let user = User::register(input, Utc::now());
    store.insert_user(user.clone()).await?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Handle a getUserById request.
pub async fn handle_get_user<S>(store: &S, id: UserId) -> Result<User, QuillError>
where
    S: UserStore + ?Sized,
{
    store
        .get_user(&id)
        .await?
        .ok_or_else(|| QuillError::NotFound(format!("user {}", id)))
}
