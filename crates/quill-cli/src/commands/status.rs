// crates/quill-cli/src/commands/status.rs
//
// `quill status`: check the daemon answers and list its procedures.

use serde_json::json;

use quill_rpc::{Procedure, ProcedureKind};

use crate::rpc_client::RpcClient;

/// Run the status command.
///
/// Reachability is probed with a `getPosts` call for a single post, which
/// also reports the number of stored posts.
pub async fn run(client: &RpcClient, endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Quill v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Daemon Status");
    println!("-------------");
    println!("  RPC endpoint: {}", endpoint);

    match client.call_raw("getPosts", json!({ "pageSize": 1 })).await {
        Ok(resp) if resp.success => {
            let total = resp
                .result
                .as_ref()
                .and_then(|r| r.get("total"))
                .and_then(|t| t.as_u64())
                .unwrap_or(0);
            println!("  Connection:   OK");
            println!("  Posts:        {}", total);
        }
        Ok(resp) => {
            let reason = resp.error.map(|e| e.message).unwrap_or_default();
            println!("  Connection:   OK (probe failed: {})", reason);
        }
        Err(e) => {
            println!("  Connection:   Unreachable ({})", e);
        }
    }

    println!();
    println!("Procedures");
    println!("----------");
    for procedure in Procedure::ALL {
        let kind = match procedure.kind() {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        };
        println!("  {:<20} {}", procedure.name(), kind);
    }

    Ok(())
}
