// crates/quill-rpc/tests/http_server.rs
//
// End-to-end test: start the tonic server on a local port and drive it with
// plain HTTP/1 JSON POSTs, the way quill-cli does.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::oneshot;

use quill_rpc::{JsonRpcRequest, JsonRpcResponse, ProcedureRegistry, QuillRpcServer, RpcConfig, RPC_PATH};
use quill_store::InMemoryStore;

/// Reserve a free port by binding to port 0 and releasing it.
fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn call(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: serde_json::Value,
) -> JsonRpcResponse {
    let request = JsonRpcRequest {
        method: method.to_string(),
        params,
    };
    client
        .post(url)
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn serves_procedures_over_http() {
    let port = free_port();
    let config = RpcConfig {
        host: "127.0.0.1".to_string(),
        port,
    };
    let server = QuillRpcServer::new(config, ProcedureRegistry::new(Arc::new(InMemoryStore::new())));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .start_with_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
            .map_err(|e| e.to_string())
    });

    let url = format!("http://127.0.0.1:{}{}", port, RPC_PATH);
    let client = reqwest::Client::new();

    // Wait for the listener to come up.
    let mut ready = false;
    for _ in 0..50 {
        if client.post(&url).body("{}").send().await.is_ok() {
            ready = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(ready, "server did not start");

    let created = call(
        &client,
        &url,
        "createPost",
        json!({ "title": "Over the wire", "content": "Hello", "authorId": uuid::Uuid::now_v7().to_string() }),
    )
    .await;
    assert!(created.success, "{:?}", created.error);
    let post = created.result.unwrap();
    assert_eq!(post["published"], false);

    let listed = call(&client, &url, "getPosts", serde_json::Value::Null).await;
    assert!(listed.success);
    let page = listed.result.unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["id"], post["id"]);

    let missing = call(&client, &url, "getPostById", json!(uuid::Uuid::now_v7().to_string())).await;
    assert!(!missing.success);
    assert_eq!(missing.error.unwrap().code, "NOT_FOUND");

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
