//! CLI commands and argument parsing.

pub mod check;
pub mod create_repo;
pub mod delete;
pub mod download;
pub mod list;
pub mod login;
pub mod publish;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

use ktesios_client::{ConfigRegistry, Registry, RepoServerConfig};

/// Ktesios - Artifact repository client
#[derive(Parser)]
#[command(name = "ktesios")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check connectivity to a repository server
    Check(check::CheckArgs),

    /// Upload workspace files as a component
    Publish(publish::PublishArgs),

    /// Download a component's assets
    Download(download::DownloadArgs),

    /// Delete every component under a group/artifact pair
    Delete(delete::DeleteArgs),

    /// List version/tag candidates for a group:artifact pair
    List(list::ListArgs),

    /// Resolve registry login credentials
    Login(login::LoginArgs),

    /// Ensure an image repository exists
    CreateImageRepo(create_repo::CreateRepoArgs),

    /// Print version information
    Version,
}

/// Server connection arguments shared by every command.
#[derive(Args)]
pub struct ServerArgs {
    /// Identifier the server is registered under
    #[arg(long, default_value = "default")]
    pub server_id: String,

    /// Repository server base URL (e.g. `https://nexus.example.com`)
    #[arg(short = 'u', long, env = "KTESIOS_SERVER_URL")]
    pub server_url: String,

    /// Username for basic authentication (access key id for ECR)
    #[arg(long, env = "KTESIOS_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication (secret access key for ECR)
    #[arg(long, env = "KTESIOS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Registry kind: nexus or ecr
    #[arg(long, default_value = "nexus")]
    pub registry: String,

    /// AWS region, required for the ecr registry kind
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Address the server through its Docker-compatible endpoint
    #[arg(long)]
    pub docker: bool,

    /// Accept invalid TLS certificates (self-signed endpoints)
    #[arg(long)]
    pub insecure: bool,
}

impl ServerArgs {
    /// Parses the registry kind.
    pub fn registry_kind(&self) -> Result<Registry> {
        match Registry::parse(&self.registry) {
            Some(kind) => Ok(kind),
            None => bail!("unknown registry kind '{}', expected nexus or ecr", self.registry),
        }
    }

    /// Builds the server configuration from the arguments.
    pub fn to_config(&self) -> Result<RepoServerConfig> {
        let mut config = RepoServerConfig::new(&self.server_id, &self.server_url)
            .with_registry(self.registry_kind()?)
            .with_docker(self.docker);
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            config = config.with_basic_auth(username, password);
        }
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if self.insecure {
            config = config.insecure();
        }
        Ok(config)
    }

    /// Builds a one-entry configuration registry and returns it with
    /// the server id to resolve.
    pub fn to_registry(&self) -> Result<(ConfigRegistry, String)> {
        let config = self.to_config()?;
        let server_id = config.server_id.clone();
        let mut registry = ConfigRegistry::new();
        registry.insert(config);
        Ok((registry, server_id))
    }
}
