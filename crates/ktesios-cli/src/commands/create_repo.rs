//! Create-image-repo command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ktesios_client::artifact_handler;

use super::ServerArgs;

/// Arguments for the create-image-repo command.
#[derive(Args)]
pub struct CreateRepoArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Image repository name (e.g. `platform/web`)
    #[arg(short, long)]
    repository: String,

    /// Create the repository with immutable tags
    #[arg(long)]
    immutable: bool,
}

/// Runs the create-image-repo command.
///
/// # Errors
///
/// Returns an error when the registry rejects the creation.
pub async fn run(args: &CreateRepoArgs) -> Result<()> {
    let kind = args.server.registry_kind()?;
    let (registry, server_id) = args.server.to_registry()?;

    let handler = artifact_handler(kind);
    let result = handler
        .create_image_repository(&registry, &server_id, &args.repository, !args.immutable)
        .await
        .context("Failed to ensure image repository")?;

    if result.existed {
        println!("Image repository exists: {}", args.repository);
    } else {
        println!("Image repository created: {}", args.repository);
    }
    Ok(())
}
