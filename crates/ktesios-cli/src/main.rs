//! Ktesios CLI - Command-line interface for the Ktesios artifact
//! repository client.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ktesios=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => commands::check::run(&args).await,
        Commands::Publish(args) => commands::publish::run(&args).await,
        Commands::Download(args) => commands::download::run(&args).await,
        Commands::Delete(args) => commands::delete::run(&args).await,
        Commands::List(args) => commands::list::run(&args).await,
        Commands::Login(args) => commands::login::run(&args).await,
        Commands::CreateImageRepo(args) => commands::create_repo::run(&args).await,
        Commands::Version => {
            println!("ktesios {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
