//! # Ktesios Client
//!
//! Artifact-repository client and version resolution engine.
//!
//! This crate discovers, searches, uploads, downloads, and deletes
//! versioned artifacts (raw files, maven2 packages, and container
//! images) across heterogeneous backends: a Nexus-style repository
//! manager with a REST search/upload API, its Docker-compatible
//! registry endpoint, and AWS Elastic Container Registry.
//!
//! ## Features
//!
//! - **Bounded pagination**: cursor-driven search loops capped at 50
//!   pages and the caller's result limit, with insertion-ordered
//!   deduplication
//! - **Version resolution**: explicit versions, or versions derived
//!   from raw storage paths, with signature artifacts excluded
//! - **Batched uploads**: multipart bodies built three file parts at a
//!   time under a twelve-file operation cap
//! - **One choice contract**: three incompatible listing protocols
//!   behind a single candidate-list interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ktesios_client::{RepoServerConfig, RepositoryClient, search};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RepoServerConfig::new("releases", "https://nexus.example.com")
//!         .with_basic_auth("deploy", "secret");
//!     let client = RepositoryClient::new(config)?;
//!
//!     let repo = client.repository_details("releases").await?;
//!     let versions =
//!         search::collect_versions(&client, &repo, "com.example", "app", 100, None).await?;
//!     for candidate in versions {
//!         println!("{candidate}");
//!     }
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod choice;
pub mod client;
pub mod config;
pub mod ecr;
pub mod error;
pub mod filter;
pub mod model;
pub mod search;
pub mod transport;
pub mod upload;

pub use choice::{
    ArtifactChoiceHandler, ArtifactHandler, ChoiceOption, CreateImageRepository,
    DEFAULT_CANDIDATE_LIMIT, LoginPassword, artifact_handler, choice_handler,
};
pub use client::RepositoryClient;
pub use config::{ConfigRegistry, Registry, RepoServerConfig};
pub use ecr::EcrClient;
pub use error::ClientError;
pub use filter::GlobFilter;
pub use model::{
    AssetDetails, ComponentDetails, DownloadFile, FileUpload, RepositoryDetails, RepositoryFormat,
    RepositoryType, SearchAssetsReq, SearchComponentsReq, TagList, UploadComponentReq,
};
pub use search::MAX_SEARCH_PAGES;
pub use upload::{MAX_UPLOAD_FILES, PARTS_PER_BODY};
