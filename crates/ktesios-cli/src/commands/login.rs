//! Login command implementation.
//!
//! Resolves registry login credentials and prints them as JSON for
//! scripting (`docker login -u … -p …`).

use anyhow::{Context, Result};
use clap::Args;

use ktesios_client::artifact_handler;

use super::ServerArgs;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    #[command(flatten)]
    server: ServerArgs,
}

/// Runs the login command.
///
/// # Errors
///
/// Returns an error when no credentials can be resolved for the
/// configured registry.
pub async fn run(args: &LoginArgs) -> Result<()> {
    let kind = args.server.registry_kind()?;
    let (registry, server_id) = args.server.to_registry()?;

    let handler = artifact_handler(kind);
    let login = handler
        .login_password(&registry, &server_id)
        .await
        .context("Failed to resolve login credentials")?;

    println!("{}", serde_json::to_string_pretty(&login)?);
    Ok(())
}
