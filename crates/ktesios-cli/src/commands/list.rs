//! List command implementation.
//!
//! Prints version/tag candidates for a `group:artifact[:filter]`
//! coordinate, one per line, through the backend selected by the
//! registry kind and docker flag.

use anyhow::{Context, Result};
use clap::Args;

use ktesios_client::{DEFAULT_CANDIDATE_LIMIT, choice_handler};

use super::ServerArgs;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Coordinate option: `group:artifact[:filter]`, where the filter
    /// is a `*`/`?` wildcard over versions or tags
    pub option: String,

    /// Repository to search (generic backend only)
    #[arg(short, long, default_value = "")]
    repository: String,

    /// Cap on listed candidates
    #[arg(short, long, default_value_t = DEFAULT_CANDIDATE_LIMIT)]
    limit: usize,
}

/// Runs the list command.
///
/// # Errors
///
/// Returns an error when the backend cannot be reached or the option
/// string is malformed.
pub async fn run(args: &ListArgs) -> Result<()> {
    let kind = args.server.registry_kind()?;
    let (registry, server_id) = args.server.to_registry()?;

    let handler = choice_handler(kind);
    let candidates = handler
        .list_candidates(
            &registry,
            &server_id,
            &args.option,
            &args.repository,
            args.limit,
        )
        .await
        .context("Failed to list candidates")?;

    if candidates.is_empty() {
        println!("No candidates found");
        return Ok(());
    }
    for candidate in candidates {
        println!("{candidate}");
    }
    Ok(())
}
