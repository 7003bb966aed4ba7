// crates/quill-rpc/src/server.rs
//
// RPC server setup: QuillRpcServer and RpcConfig.
//
// A single tonic service accepts JSON-encoded `{method, params}` envelopes
// over HTTP/1 or HTTP/2, hands them to the ProcedureRegistry, and returns a
// JSON `{success, result, error}` envelope. No proto codegen is involved;
// tonic provides the transport and interceptor plumbing only.

use std::future::Future;
use std::net::SocketAddr;

use http::header::{HeaderValue, CONTENT_TYPE};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::transport::Server;
use tonic::Status;

use quill_core::error::QuillError;
use quill_core::validation::Violation;

use crate::middleware;
use crate::registry::ProcedureRegistry;

/// HTTP path clients POST envelopes to. tonic routes by `/{service}/{method}`.
pub const RPC_PATH: &str = "/quill.rpc.QuillService/Call";

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50051,
        }
    }
}

impl RpcConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC Envelope
// ---------------------------------------------------------------------------

/// A request envelope: procedure name plus raw, unvalidated params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// The procedure to invoke (e.g., "getPosts", "createPost").
    pub method: String,
    /// Raw input for the procedure. Absent params decode as `null`.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Error half of the response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorBody {
    /// Stable code, e.g. "VALIDATION_ERROR" or "NOT_FOUND".
    pub code: String,
    pub message: String,
    /// Every rejected field, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl From<&QuillError> for RpcErrorBody {
    fn from(err: &QuillError) -> Self {
        let violations = match err {
            QuillError::Validation(v) => v.violations.clone(),
            _ => Vec::new(),
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            violations,
        }
    }
}

/// A response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// The result data (if success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error details (if not success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl JsonRpcResponse {
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(value),
            error: None,
        }
    }

    pub fn from_error(err: &QuillError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(RpcErrorBody::from(err)),
        }
    }

    /// Response for a body that is not a well-formed envelope.
    pub fn parse_error(message: String) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(RpcErrorBody {
                code: "PARSE_ERROR".to_string(),
                message,
                violations: Vec::new(),
            }),
        }
    }
}

/// Run one envelope through the registry.
pub async fn dispatch(registry: &ProcedureRegistry, request: JsonRpcRequest) -> JsonRpcResponse {
    match registry.call(&request.method, &request.params).await {
        Ok(value) => JsonRpcResponse::ok(value),
        Err(err) => JsonRpcResponse::from_error(&err),
    }
}

// ---------------------------------------------------------------------------
// QuillRpcServer
// ---------------------------------------------------------------------------

/// The RPC server for Quill. Owns the registry and serves it over tonic.
#[derive(Debug, Clone)]
pub struct QuillRpcServer {
    config: RpcConfig,
    registry: ProcedureRegistry,
}

impl QuillRpcServer {
    pub fn new(config: RpcConfig, registry: ProcedureRegistry) -> Self {
        Self { config, registry }
    }

    /// Start the RPC server and serve until the process is terminated.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start the RPC server and serve until `signal` resolves.
    pub async fn start_with_shutdown<F>(&self, signal: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()>,
    {
        let addr = self.config.socket_addr()?;

        tracing::info!("Quill RPC server starting on {}", addr);

        Server::builder()
            .accept_http1(true)
            .add_service(tonic::service::interceptor::InterceptedService::new(
                QuillJsonRpcServer::new(self.registry.clone()),
                middleware::logging_interceptor,
            ))
            .serve_with_shutdown(addr, signal)
            .await?;

        tracing::info!("Quill RPC server stopped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------
// One service, one implicit method. Request and response bodies are raw
// JSON envelopes rather than protobuf messages.

/// The tonic service wrapper. Reads the request body as a JSON envelope,
/// dispatches it, and writes the JSON response envelope.
#[derive(Debug, Clone)]
pub struct QuillJsonRpcServer {
    registry: ProcedureRegistry,
}

impl QuillJsonRpcServer {
    pub fn new(registry: ProcedureRegistry) -> Self {
        Self { registry }
    }
}

impl tonic::server::NamedService for QuillJsonRpcServer {
    const NAME: &'static str = "quill.rpc.QuillService";
}

impl<B> tower_service::Service<http::Request<B>> for QuillJsonRpcServer
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let registry = self.registry.clone();

        Box::pin(async move {
            let body_bytes = match collect_body(req.into_body()).await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!("Failed to read request body: {}", e);
                    let resp =
                        JsonRpcResponse::parse_error(format!("Failed to read request body: {}", e));
                    return Ok(build_response(encode(&resp)));
                }
            };

            let rpc_request: JsonRpcRequest = match serde_json::from_slice(&body_bytes) {
                Ok(r) => r,
                Err(e) => {
                    let resp = JsonRpcResponse::parse_error(format!("Invalid request envelope: {}", e));
                    return Ok(build_response(encode(&resp)));
                }
            };

            let rpc_response = dispatch(&registry, rpc_request).await;
            Ok(build_response(encode(&rpc_response)))
        })
    }
}

fn encode(resp: &JsonRpcResponse) -> Vec<u8> {
    serde_json::to_vec(resp).unwrap_or_default()
}

/// Collect the body of an HTTP request into bytes.
async fn collect_body<B>(body: B) -> Result<Vec<u8>, String>
where
    B: HttpBody + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B::Data: Send,
{
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    loop {
        match std::future::poll_fn(|cx| HttpBody::poll_frame(body.as_mut(), cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    use bytes::Buf;
                    collected.extend_from_slice(data.chunk());
                }
            }
            Some(Err(e)) => return Err(e.into().to_string()),
            None => break,
        }
    }

    Ok(collected)
}

/// Build an HTTP 200 response with the given JSON body.
fn build_response(json: Vec<u8>) -> http::Response<tonic::body::BoxBody> {
    let body = tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    );

    let mut response = http::Response::new(body);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quill_store::InMemoryStore;
    use serde_json::json;
    use tower_service::Service;

    fn registry() -> ProcedureRegistry {
        ProcedureRegistry::new(Arc::new(InMemoryStore::new()))
    }

    async fn post_raw(server: &mut QuillJsonRpcServer, body: &str) -> JsonRpcResponse {
        let req = http::Request::builder()
            .method("POST")
            .uri(RPC_PATH)
            .body(http_body_util::Full::new(bytes::Bytes::from(body.to_string())))
            .unwrap();
        let resp = server.call(req).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_default_config_addr() {
        let addr = RpcConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 50051);
    }

    #[test]
    fn test_request_params_default_to_null() {
        let req: JsonRpcRequest = serde_json::from_str(r#"{"method":"getPosts"}"#).unwrap();
        assert!(req.params.is_null());
    }

    #[test]
    fn test_envelope_omits_absent_half() {
        let ok = serde_json::to_value(JsonRpcResponse::ok(json!({ "success": true }))).unwrap();
        assert_eq!(ok, json!({ "success": true, "result": { "success": true } }));

        let err = serde_json::to_value(JsonRpcResponse::from_error(&QuillError::NotFound(
            "post 1".to_string(),
        )))
        .unwrap();
        assert!(err.get("result").is_none());
        assert_eq!(err["error"]["code"], "NOT_FOUND");
        assert!(err["error"].get("violations").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_validation_error_envelope() {
        let resp = dispatch(
            &registry(),
            JsonRpcRequest {
                method: "getPosts".to_string(),
                params: json!({ "page": 0, "pageSize": 500 }),
            },
        )
        .await;

        assert!(!resp.success);
        assert!(resp.result.is_none());
        let err = resp.error.unwrap();
        assert_eq!(err.code, "VALIDATION_ERROR");
        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["page", "pageSize"]);
    }

    #[tokio::test]
    async fn test_http_roundtrip_get_posts_without_params() {
        let mut server = QuillJsonRpcServer::new(registry());
        let resp = post_raw(&mut server, r#"{"method":"getPosts"}"#).await;

        assert!(resp.success);
        assert_eq!(
            resp.result.unwrap(),
            json!({ "data": [], "page": 1, "pageSize": 10, "total": 0, "hasMore": false })
        );
    }

    #[tokio::test]
    async fn test_http_malformed_envelope_is_parse_error() {
        let mut server = QuillJsonRpcServer::new(registry());
        let resp = post_raw(&mut server, "{not json").await;

        assert!(!resp.success);
        assert_eq!(resp.error.unwrap().code, "PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_http_unknown_method() {
        let mut server = QuillJsonRpcServer::new(registry());
        let resp = post_raw(&mut server, r#"{"method":"nope","params":{}}"#).await;

        let err = resp.error.unwrap();
        assert_eq!(err.code, "UNKNOWN_PROCEDURE");
        assert!(err.violations.is_empty());
    }
}
