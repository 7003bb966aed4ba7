// crates/quill-core/src/event.rs

use serde::{Deserialize, Serialize};

use crate::ids::PostId;
use crate::post::Post;
use crate::user::User;

/// Emitted after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiEvent {
    PostCreated(Post),
    PostUpdated(Post),
    PostDeleted { id: PostId },
    UserRegistered(User),
}

impl ApiEvent {
    /// Wire tag of this event (e.g. `POST_CREATED`).
    pub fn kind(&self) -> &'static str {
        match self {
            ApiEvent::PostCreated(_) => "POST_CREATED",
            ApiEvent::PostUpdated(_) => "POST_UPDATED",
            ApiEvent::PostDeleted { .. } => "POST_DELETED",
            ApiEvent::UserRegistered(_) => "USER_REGISTERED",
        }
    }
}
