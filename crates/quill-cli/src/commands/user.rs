// crates/quill-cli/src/commands/user.rs
//
// `quill user` subcommands.

use clap::Subcommand;
use serde_json::json;

use quill_core::User;

use crate::output::{self, OutputFormat};
use crate::rpc_client::RpcClient;

/// User subcommands.
#[derive(Debug, Subcommand)]
pub enum UserCmd {
    /// Register a user.
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,
    },

    /// Show a user by id.
    Get {
        id: String,
    },
}

/// Run a user subcommand.
pub async fn run(
    client: &RpcClient,
    cmd: &UserCmd,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let user: User = match cmd {
        UserCmd::Create { email, name } => {
            client
                .call("createUser", json!({ "email": email, "name": name }))
                .await?
        }
        UserCmd::Get { id } => client.call("getUserById", json!(id)).await?,
    };
    println!("{}", output::render_user(&user, format));
    Ok(())
}
