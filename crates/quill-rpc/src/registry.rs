// crates/quill-rpc/src/registry.rs
//
// The procedure registry: the fixed set of named procedures, each bound to
// an input schema and a handler.
//
// Every call goes through `dispatch_handler`, which decodes the raw params
// with the procedure's schema before the handler can run. A rejected input
// therefore never reaches the store.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use quill_core::error::QuillError;
use quill_core::event::ApiEvent;
use quill_core::ids::{PostId, UserId};
use quill_core::pagination::Pagination;
use quill_core::post::{CreatePostInput, UpdatePostInput};
use quill_core::user::CreateUserInput;
use quill_core::validation::Schema;
use quill_store::InMemoryStore;

use crate::handlers;

/// Subscriber for domain events. The daemon uses it to log mutations;
/// tests use it to observe them.
pub type EventCallback = Arc<dyn Fn(ApiEvent) + Send + Sync>;

// ---------------------------------------------------------------------------
// Procedure catalogue
// ---------------------------------------------------------------------------

/// Whether a procedure reads or mutates the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

/// Every procedure the registry can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    GetPosts,
    GetPostById,
    CreatePost,
    UpdatePost,
    DeletePost,
    GetUserPosts,
    CreateUser,
    GetUserById,
    GetPostWithAuthor,
}

impl Procedure {
    pub const ALL: [Procedure; 9] = [
        Procedure::GetPosts,
        Procedure::GetPostById,
        Procedure::CreatePost,
        Procedure::UpdatePost,
        Procedure::DeletePost,
        Procedure::GetUserPosts,
        Procedure::CreateUser,
        Procedure::GetUserById,
        Procedure::GetPostWithAuthor,
    ];

    /// Name callers use to invoke the procedure.
    pub fn name(&self) -> &'static str {
        match self {
            Procedure::GetPosts => "getPosts",
            Procedure::GetPostById => "getPostById",
            Procedure::CreatePost => "createPost",
            Procedure::UpdatePost => "updatePost",
            Procedure::DeletePost => "deletePost",
            Procedure::GetUserPosts => "getUserPosts",
            Procedure::CreateUser => "createUser",
            Procedure::GetUserById => "getUserById",
            Procedure::GetPostWithAuthor => "getPostWithAuthor",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            Procedure::CreatePost
            | Procedure::UpdatePost
            | Procedure::DeletePost
            | Procedure::CreateUser => ProcedureKind::Mutation,
            Procedure::GetPosts
            | Procedure::GetPostById
            | Procedure::GetUserPosts
            | Procedure::GetUserById
            | Procedure::GetPostWithAuthor => ProcedureKind::Query,
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ProcedureRegistry
// ---------------------------------------------------------------------------

/// Binds each [`Procedure`] to its schema and handler over one store.
///
/// The store is constructed by the caller and handed in; the registry never
/// creates or reaches for a global one.
#[derive(Clone)]
pub struct ProcedureRegistry {
    store: Arc<InMemoryStore>,
    event_callback: Option<EventCallback>,
}

impl fmt::Debug for ProcedureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureRegistry")
            .field("posts", &self.store.post_count().ok())
            .field("users", &self.store.user_count().ok())
            .field("events_enabled", &self.event_callback.is_some())
            .finish()
    }
}

impl ProcedureRegistry {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            event_callback: None,
        }
    }

    /// Set the subscriber notified after each successful mutation.
    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    /// The store this registry operates on.
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    fn emit(&self, event: ApiEvent) {
        if let Some(cb) = &self.event_callback {
            cb(event);
        }
    }

    /// Invoke a procedure by name with raw JSON params.
    pub async fn call(&self, name: &str, params: &Value) -> Result<Value, QuillError> {
        let procedure = Procedure::from_name(name)
            .ok_or_else(|| QuillError::UnknownProcedure(name.to_string()))?;
        self.invoke(procedure, params).await
    }

    /// Invoke a resolved procedure with raw JSON params.
    pub async fn invoke(&self, procedure: Procedure, params: &Value) -> Result<Value, QuillError> {
        tracing::debug!(procedure = %procedure, kind = ?procedure.kind(), "dispatching procedure");

        let store = self.store.as_ref();
        let result = match procedure {
            Procedure::GetPosts => {
                dispatch_handler(params, |r: Pagination| async move {
                    handlers::post::handle_list_posts(store, r).await
                })
                .await
            }
            Procedure::GetPostById => {
                dispatch_handler(params, |r: PostId| async move {
                    handlers::post::handle_get_post(store, r).await
                })
                .await
            }
            Procedure::CreatePost => {
                dispatch_handler(params, |r: CreatePostInput| async move {
                    let post = handlers::post::handle_create_post(store, r).await?;
                    self.emit(ApiEvent::PostCreated(post.clone()));
                    Ok::<_, QuillError>(post)
                })
                .await
            }
            Procedure::UpdatePost => {
                dispatch_handler(params, |r: UpdatePostInput| async move {
                    let post = handlers::post::handle_update_post(store, r).await?;
                    self.emit(ApiEvent::PostUpdated(post.clone()));
                    Ok::<_, QuillError>(post)
                })
                .await
            }
            Procedure::DeletePost => {
                dispatch_handler(params, |r: PostId| async move {
                    let result = handlers::post::handle_delete_post(store, r).await?;
                    self.emit(ApiEvent::PostDeleted { id: r });
                    Ok::<_, QuillError>(result)
                })
                .await
            }
            Procedure::GetUserPosts => {
                dispatch_handler(params, |r: UserId| async move {
                    handlers::post::handle_list_user_posts(store, r).await
                })
                .await
            }
            Procedure::CreateUser => {
                dispatch_handler(params, |r: CreateUserInput| async move {
                    let user = handlers::user::handle_create_user(store, r).await?;
                    self.emit(ApiEvent::UserRegistered(user.clone()));
                    Ok::<_, QuillError>(user)
                })
                .await
            }
            Procedure::GetUserById => {
                dispatch_handler(params, |r: UserId| async move {
                    handlers::user::handle_get_user(store, r).await
                })
                .await
            }
            Procedure::GetPostWithAuthor => {
                dispatch_handler(params, |r: PostId| async move {
                    handlers::post::handle_get_post_with_author(store, r).await
                })
                .await
            }
        };

        if let Err(e) = &result {
            tracing::warn!(procedure = %procedure, code = e.code(), "procedure failed: {}", e);
        }
        result
    }
}

/// Generic dispatch helper: decode params with the request type's schema,
/// call the handler, and serialize the result to JSON.
async fn dispatch_handler<Req, Resp, F, Fut>(params: &Value, handler: F) -> Result<Value, QuillError>
where
    Req: Schema,
    Resp: Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Resp, QuillError>>,
{
    let request = Req::decode(params)?;
    let response = handler(request).await?;
    Ok(serde_json::to_value(response)?)
}
