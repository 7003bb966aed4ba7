// crates/quill-rpc/src/handlers/mod.rs
//
// Handler modules for all procedures. Handlers receive inputs that have
// already passed their schema; they only talk to the store.

pub mod post;
pub mod user;
