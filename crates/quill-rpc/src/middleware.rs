// crates/quill-rpc/src/middleware.rs
//
// Interceptors applied in front of the JSON-RPC service.

use tonic::{Request, Status};

/// Logging interceptor for incoming requests.
///
/// Records request metadata at debug level; the procedure name is only known
/// after the body is decoded and is logged by the registry.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    tracing::debug!(metadata = ?req.metadata(), "incoming RPC request");
    Ok(req)
}
