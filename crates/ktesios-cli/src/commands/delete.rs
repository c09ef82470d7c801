//! Delete command implementation.
//!
//! Collects every component id under a group/artifact pair, then
//! deletes them one call at a time. The first failing delete aborts
//! the remainder.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ktesios_client::{RepositoryClient, search};

use super::ServerArgs;

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Repository to delete from
    #[arg(short, long)]
    repository: String,

    /// Coordinate group
    #[arg(short, long)]
    group: String,

    /// Coordinate artifact id; every version under it is deleted
    #[arg(short, long)]
    artifact: String,
}

/// Runs the delete command.
///
/// # Errors
///
/// Returns an error when the repository is missing or a delete call
/// fails; components already deleted stay deleted.
pub async fn run(args: &DeleteArgs) -> Result<()> {
    let config = args.server.to_config()?;
    let client = RepositoryClient::new(config).context("Failed to create repository client")?;

    let repo = client
        .repository_details(&args.repository)
        .await
        .context("Failed to fetch repository details")?;

    let ids = search::collect_component_ids(&client, &repo, &args.group, &args.artifact).await?;
    if ids.is_empty() {
        println!("No components matched; nothing to delete");
        return Ok(());
    }

    info!(
        repository = %args.repository,
        group = %args.group,
        artifact = %args.artifact,
        components = ids.len(),
        "Deleting components"
    );
    client.delete_components(&ids).await?;
    println!("Deleted {} components", ids.len());
    Ok(())
}
