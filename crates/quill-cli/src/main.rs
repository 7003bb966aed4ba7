// crates/quill-cli/src/main.rs
//
// CLI entrypoint for the Quill developer tools.
//
// Every subcommand maps onto one procedure call against a running
// quill-daemon.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};
use commands::post::PostCmd;
use commands::user::UserCmd;
use output::OutputFormat;
use rpc_client::RpcClient;

/// Quill CLI: call blog procedures on a quill-daemon.
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    version = "0.1.0",
    about = "Quill CLI for calling post and user procedures over JSON-RPC"
)]
struct Cli {
    /// RPC endpoint for the quill-daemon.
    #[arg(long, global = true, default_value = "http://localhost:50051")]
    rpc: String,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Post procedures: list, get, create, update, delete.
    #[command(subcommand)]
    Post(PostCmd),

    /// User procedures: create, get.
    #[command(subcommand)]
    User(UserCmd),

    /// Check that the daemon answers and list the known procedures.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = RpcClient::new(&cli.rpc);
    let format = OutputFormat::from_json_flag(cli.json);

    match &cli.command {
        Commands::Post(cmd) => commands::post::run(&client, cmd, format).await?,
        Commands::User(cmd) => commands::user::run(&client, cmd, format).await?,
        Commands::Status => commands::status::run(&client, &cli.rpc).await?,
    }

    Ok(())
}
