// crates/quill-rpc/src/lib.rs
//
// quill-rpc: procedure registry, handlers, and RPC server for Quill.
//
// Procedures are invoked by name with raw JSON params. The registry decodes
// the params with the procedure's schema, runs the handler against the
// in-memory store, and the server wraps results in a JSON envelope served
// over tonic.

pub mod handlers;
pub mod middleware;
pub mod registry;
pub mod server;

// Re-export the main types for ergonomic access.
pub use registry::{EventCallback, Procedure, ProcedureKind, ProcedureRegistry};
pub use server::{JsonRpcRequest, JsonRpcResponse, QuillRpcServer, RpcConfig, RpcErrorBody, RPC_PATH};
