// crates/quill-cli/src/commands/mod.rs
//
// Command module declarations for the Quill CLI.

pub mod post;
pub mod status;
pub mod user;
