// crates/quill-core/src/lib.rs
//
// quill-core: Core types, validation schemas, and store traits for Quill.
//
// This is the leaf crate every other crate in the workspace depends on. It
// defines the post/user data model, the typed procedure inputs and the
// schemas that decode them from raw JSON, the shared error type, and the
// store traits implemented by quill-store.

pub mod error;
pub mod event;
pub mod ids;
pub mod pagination;
pub mod post;
pub mod traits;
pub mod user;
pub mod validation;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use quill_core::Post;`

pub use error::QuillError;
pub use event::ApiEvent;
pub use ids::{PostId, UserId};
pub use pagination::{Page, Pagination};
pub use post::{CreatePostInput, DeleteResult, Post, PostPatch, PostWithAuthor, UpdatePostInput};
pub use traits::{PostStore, UserStore};
pub use user::{CreateUserInput, User};
pub use validation::{Schema, ValidationError, Violation, ViolationKind};
