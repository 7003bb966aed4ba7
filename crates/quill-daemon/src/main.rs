// crates/quill-daemon/src/main.rs
//
// Binary entrypoint for the Quill daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, constructs
// the in-memory store and procedure registry, and serves RPC until Ctrl-C.

mod config;

use std::sync::Arc;

use clap::Parser;
use config::DaemonConfig;

use quill_core::ApiEvent;
use quill_rpc::{ProcedureRegistry, QuillRpcServer, RpcConfig};
use quill_store::InMemoryStore;

/// Quill daemon: serves the post/user procedures over JSON-RPC.
#[derive(Parser, Debug)]
#[command(name = "quill-daemon", version = "0.1.0", about = "Quill procedure server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.quill/config.toml")]
    config: String,

    /// Override the RPC bind host from the config file.
    #[arg(long)]
    host: Option<String>,

    /// Override the RPC port from the config file.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is read before tracing so its log level can seed the filter.
    let config_path = expand_tilde(&args.config);
    let loaded = DaemonConfig::load(&config_path);
    let mut daemon_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => DaemonConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&daemon_config.log_level)),
        )
        .init();

    match &loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", config_path),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    // CLI flags override the config file values.
    if let Some(host) = args.host {
        daemon_config.rpc_host = host;
    }
    if let Some(port) = args.port {
        daemon_config.rpc_port = port;
    }

    tracing::info!("Quill Daemon v0.1.0");
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.rpc_host,
        daemon_config.rpc_port
    );

    // The store lives exactly as long as this process.
    let store = Arc::new(InMemoryStore::new());
    let mut registry = ProcedureRegistry::new(store);
    if daemon_config.log_events {
        registry = registry.with_event_callback(Arc::new(log_event));
    }

    let rpc_config = RpcConfig {
        host: daemon_config.rpc_host.clone(),
        port: daemon_config.rpc_port,
    };
    let server = QuillRpcServer::new(rpc_config, registry);

    server
        .start_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

/// Event subscriber installed when `log_events` is enabled.
fn log_event(event: ApiEvent) {
    match &event {
        ApiEvent::PostCreated(post) | ApiEvent::PostUpdated(post) => {
            tracing::info!(event = event.kind(), post_id = %post.id, title = %post.title, "domain event")
        }
        ApiEvent::PostDeleted { id } => {
            tracing::info!(event = event.kind(), post_id = %id, "domain event")
        }
        ApiEvent::UserRegistered(user) => {
            tracing::info!(event = event.kind(), user_id = %user.id, "domain event")
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
