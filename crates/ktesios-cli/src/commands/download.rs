//! Download command implementation.
//!
//! Resolves a download plan (a single file when the location names
//! one, otherwise every asset of the version) and streams each entry
//! to disk.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ktesios_client::model::{component_prefix, file_name_of};
use ktesios_client::{DownloadFile, RepositoryClient, search};

use super::ServerArgs;

/// Arguments for the download command.
#[derive(Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Source repository name
    #[arg(short, long)]
    repository: String,

    /// Coordinate group
    #[arg(short, long)]
    group: String,

    /// Coordinate artifact id
    #[arg(short, long)]
    artifact: String,

    /// Version to download
    #[arg(short, long)]
    version: String,

    /// Target location: a directory for all assets, or a file path for
    /// a single named asset
    #[arg(short, long, default_value = ".")]
    location: PathBuf,

    /// Cap on assets resolved through the asset search
    #[arg(long, default_value = "50")]
    max_assets: usize,
}

/// Runs the download command.
///
/// # Errors
///
/// Returns an error when the repository is missing, the asset search
/// fails, or a file cannot be written.
pub async fn run(args: &DownloadArgs) -> Result<()> {
    let config = args.server.to_config()?;
    let client = RepositoryClient::new(config).context("Failed to create repository client")?;

    let repo = client
        .repository_details(&args.repository)
        .await
        .context("Failed to fetch repository details")?;

    info!(
        repository = %args.repository,
        group = %args.group,
        artifact = %args.artifact,
        version = %args.version,
        location = %args.location.display(),
        "Resolving download plan"
    );
    let started = Instant::now();

    let downloads = if is_file_target(&args.location) {
        let file_name = args
            .location
            .file_name()
            .and_then(|n| n.to_str())
            .context("Location has no file name")?;
        let url = format!(
            "{}{}{}/{file_name}",
            repo.url,
            component_prefix(&args.group, &args.artifact),
            args.version
        );
        vec![DownloadFile::new(url, &args.location)]
    } else {
        let assets = search::collect_assets(
            &client,
            &repo,
            &args.group,
            &args.artifact,
            &args.version,
            args.max_assets,
        )
        .await?;
        assets
            .into_iter()
            .map(|asset| {
                let target = args.location.join(file_name_of(&asset.path));
                DownloadFile::new(asset.download_url, target)
            })
            .collect()
    };

    if downloads.is_empty() {
        println!("No assets found to download");
        return Ok(());
    }

    client.download(&downloads).await?;

    for task in &downloads {
        println!("Downloaded {}", task.path.display());
    }
    println!("Download took {}ms", started.elapsed().as_millis());
    Ok(())
}

/// A location names a single file when it carries an extension and is
/// not an existing directory.
fn is_file_target(location: &std::path::Path) -> bool {
    location.extension().is_some() && !location.is_dir()
}
