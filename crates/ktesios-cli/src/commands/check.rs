//! Check command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ktesios_client::RepositoryClient;

use super::ServerArgs;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    server: ServerArgs,
}

/// Runs the check command.
///
/// # Errors
///
/// Returns an error when the server cannot be reached or rejects the
/// configured credentials.
pub async fn run(args: &CheckArgs) -> Result<()> {
    let config = args.server.to_config()?;
    let url = config.server_url.clone();
    let client = RepositoryClient::new(config).context("Failed to create repository client")?;
    client
        .check()
        .await
        .with_context(|| format!("Server check failed for {url}"))?;
    println!("{url}: OK");
    Ok(())
}
