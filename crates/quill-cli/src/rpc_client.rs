// crates/quill-cli/src/rpc_client.rs
//
// Lightweight JSON-RPC client that POSTs envelopes to the quill-daemon.

use serde::de::DeserializeOwned;
use thiserror::Error;

use quill_rpc::{JsonRpcRequest, JsonRpcResponse, RpcErrorBody, RPC_PATH};

/// Failure of a single procedure call.
#[derive(Debug, Error)]
pub enum RpcCallError {
    /// The daemon could not be reached or answered with a non-envelope body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The procedure ran and reported an error.
    #[error("{}", format_remote(.0))]
    Remote(RpcErrorBody),

    /// The result did not have the expected shape.
    #[error("unexpected result: {0}")]
    Decode(#[from] serde_json::Error),
}

fn format_remote(err: &RpcErrorBody) -> String {
    let mut out = format!("{}: {}", err.code, err.message);
    for v in &err.violations {
        out.push_str(&format!("\n  - {}", v));
    }
    out
}

/// Client bound to one daemon endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: String,
    http: reqwest::Client,
}

impl RpcClient {
    /// `endpoint` is the daemon base URL, e.g. `http://localhost:50051`.
    pub fn new(endpoint: &str) -> Self {
        Self {
            url: rpc_url(endpoint),
            http: reqwest::Client::new(),
        }
    }

    /// Send a call and return the raw response envelope.
    pub async fn call_raw(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<JsonRpcResponse, RpcCallError> {
        let request = JsonRpcRequest {
            method: method.to_string(),
            params,
        };

        let resp = self.http.post(&self.url).json(&request).send().await?;
        let rpc_response: JsonRpcResponse = resp.json().await?;
        Ok(rpc_response)
    }

    /// Send a call and decode the result, turning error envelopes into `Err`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcCallError> {
        let response = self.call_raw(method, params).await?;
        into_result(response)
    }
}

fn rpc_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), RPC_PATH)
}

fn into_result<T: DeserializeOwned>(response: JsonRpcResponse) -> Result<T, RpcCallError> {
    if let Some(err) = response.error {
        return Err(RpcCallError::Remote(err));
    }
    let value = response.result.unwrap_or(serde_json::Value::Null);
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{Violation, ViolationKind};

    #[test]
    fn test_rpc_url_joins_path() {
        assert_eq!(
            rpc_url("http://localhost:50051/"),
            "http://localhost:50051/quill.rpc.QuillService/Call"
        );
        assert_eq!(
            rpc_url("http://localhost:50051"),
            "http://localhost:50051/quill.rpc.QuillService/Call"
        );
    }

    #[test]
    fn test_into_result_maps_error_envelope() {
        let response = JsonRpcResponse {
            success: false,
            result: None,
            error: Some(RpcErrorBody {
                code: "VALIDATION_ERROR".to_string(),
                message: "Validation error: title: required field is missing".to_string(),
                violations: vec![Violation::new("title", ViolationKind::Missing)],
            }),
        };
        let err = into_result::<serde_json::Value>(response).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("VALIDATION_ERROR"));
        assert!(text.contains("- title: required field is missing"));
    }

    #[test]
    fn test_into_result_decodes_success() {
        let response = JsonRpcResponse {
            success: true,
            result: Some(serde_json::json!({ "success": true })),
            error: None,
        };
        let out: quill_core::DeleteResult = into_result(response).unwrap();
        assert!(out.success);
    }
}
