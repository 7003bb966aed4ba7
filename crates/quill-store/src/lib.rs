// crates/quill-store/src/lib.rs
//
// quill-store: Storage layer for Quill.
//
// Provides the in-memory, process-lifetime backend for the post and user
// collections defined by the store traits in quill-core.

pub mod memory;

// Re-export key types for ergonomic access from downstream crates.
pub use memory::InMemoryStore;
