//! Backend abstraction for artifact choice listing.
//!
//! Three listing protocols hide behind one contract: the generic search
//! backend, the Docker-compatible tag endpoint, and ECR. Each produces
//! the same flat, order-significant candidate list. Handlers resolve
//! their endpoint from an explicit [`ConfigRegistry`]; nothing here
//! reaches for ambient state.

use async_trait::async_trait;
use serde::Serialize;

use crate::client::RepositoryClient;
use crate::config::{ConfigRegistry, Registry, RepoServerConfig};
use crate::ecr::{EcrArtifactHandler, EcrChoiceHandler};
use crate::error::ClientError;
use crate::filter::{self, GlobFilter};
use crate::search;

/// Default cap on listed candidates.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 100;

/// Parsed `group:artifact[:filter]` option string.
#[derive(Debug)]
pub struct ChoiceOption {
    /// Coordinate group; may be blank for single-segment image names.
    pub group_id: String,

    /// Coordinate artifact id.
    pub artifact_id: String,

    /// Optional wildcard filter over versions/tags; present only when
    /// the third segment is non-blank.
    pub version_filter: Option<GlobFilter>,
}

impl ChoiceOption {
    /// Parses an option string.
    ///
    /// # Examples
    ///
    /// ```
    /// use ktesios_client::choice::ChoiceOption;
    ///
    /// let option = ChoiceOption::parse("com.example:app:app-*").unwrap();
    /// assert_eq!(option.group_id, "com.example");
    /// assert_eq!(option.artifact_id, "app");
    /// assert!(option.version_filter.is_some());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] when the artifact segment is
    /// missing or blank, or the filter pattern cannot be compiled.
    pub fn parse(option: &str) -> Result<Self, ClientError> {
        let mut segments = option.splitn(3, ':');
        let group_id = segments.next().unwrap_or_default().trim().to_string();
        let artifact_id = segments
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ClientError::validation(format!(
                    "option '{option}' must have the form group:artifact[:filter]"
                ))
            })?
            .to_string();
        let version_filter = match segments.next().map(str::trim).filter(|s| !s.is_empty()) {
            Some(pattern) => Some(GlobFilter::new(pattern)?),
            None => None,
        };
        Ok(Self {
            group_id,
            artifact_id,
            version_filter,
        })
    }

    /// Image repository name: `group/artifact`, or just the artifact
    /// when the group is blank.
    #[must_use]
    pub fn repository_name(&self) -> String {
        if self.group_id.is_empty() {
            self.artifact_id.clone()
        } else {
            format!("{}/{}", self.group_id, self.artifact_id)
        }
    }

    /// Returns true when the candidate passes the optional filter.
    #[must_use]
    pub fn admits(&self, candidate: &str) -> bool {
        filter::admits(self.version_filter.as_ref(), candidate)
    }
}

/// Lists version/tag candidates for a `group:artifact` pair.
#[async_trait]
pub trait ArtifactChoiceHandler: Send + Sync {
    /// Returns at most `limit` candidate strings, deduplicated and
    /// order-significant.
    async fn list_candidates(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
        option: &str,
        repository: &str,
        limit: usize,
    ) -> Result<Vec<String>, ClientError>;
}

/// Resolved registry login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPassword {
    /// Login username.
    pub username: String,

    /// Login password or token.
    pub password: String,

    /// Registry endpoint to log in against, scheme stripped.
    pub repository_uri: String,
}

/// Outcome of an image-repository creation request.
#[derive(Debug, Clone, Copy)]
pub struct CreateImageRepository {
    /// True when the repository already existed.
    pub existed: bool,
}

/// Registry-level operations beyond candidate listing.
#[async_trait]
pub trait ArtifactHandler: Send + Sync {
    /// Resolves login credentials for the registry.
    async fn login_password(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
    ) -> Result<LoginPassword, ClientError>;

    /// Ensures an image repository exists, creating it when the
    /// registry supports that.
    async fn create_image_repository(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
        repository: &str,
        mutable: bool,
    ) -> Result<CreateImageRepository, ClientError>;
}

pub(crate) fn lookup<'a>(
    registry: &'a ConfigRegistry,
    server_id: &str,
) -> Result<&'a RepoServerConfig, ClientError> {
    registry
        .get(server_id)
        .ok_or_else(|| ClientError::not_found(format!("server '{server_id}'")))
}

/// Choice handler for the Nexus-style server: component search for
/// regular repositories, the Docker-compatible tag endpoint for docker
/// configurations.
pub struct NexusChoiceHandler;

#[async_trait]
impl ArtifactChoiceHandler for NexusChoiceHandler {
    async fn list_candidates(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
        option: &str,
        repository: &str,
        limit: usize,
    ) -> Result<Vec<String>, ClientError> {
        let config = lookup(registry, server_id)?;
        let choice = ChoiceOption::parse(option)?;
        let client = RepositoryClient::new(config.clone())?;

        if config.docker {
            let tag_list = client.list_docker_tags(&choice.repository_name()).await?;
            let host = config.host();
            let mut candidates = Vec::new();
            // The endpoint returns tags oldest first; read in reverse so
            // the newest land on top.
            for tag in tag_list.tags.iter().rev() {
                if candidates.len() >= limit {
                    break;
                }
                if filter::is_signature_tag(tag) || !choice.admits(tag) {
                    continue;
                }
                candidates.push(format!("{host}/{}:{tag}", tag_list.name));
            }
            return Ok(candidates);
        }

        let repo = client.repository_details(repository).await?;
        search::collect_versions(
            &client,
            &repo,
            &choice.group_id,
            &choice.artifact_id,
            limit,
            choice.version_filter.as_ref(),
        )
        .await
    }
}

/// Registry operations for the Nexus-style server.
pub struct NexusArtifactHandler;

#[async_trait]
impl ArtifactHandler for NexusArtifactHandler {
    async fn login_password(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
    ) -> Result<LoginPassword, ClientError> {
        let config = lookup(registry, server_id)?;
        let (username, password) = config.basic_credentials().ok_or_else(|| {
            ClientError::validation(format!(
                "server '{server_id}' has no Basic credentials to log in with"
            ))
        })?;
        Ok(LoginPassword {
            username,
            password,
            repository_uri: config.host().to_string(),
        })
    }

    async fn create_image_repository(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
        repository: &str,
        _mutable: bool,
    ) -> Result<CreateImageRepository, ClientError> {
        // Image repositories on the server are provisioned out of band;
        // report them as already existing.
        lookup(registry, server_id)?;
        tracing::debug!(repository, "Image repository assumed to exist");
        Ok(CreateImageRepository { existed: true })
    }
}

/// Selects the choice handler for a registry kind.
#[must_use]
pub fn choice_handler(kind: Registry) -> Box<dyn ArtifactChoiceHandler> {
    match kind {
        Registry::Nexus => Box::new(NexusChoiceHandler),
        Registry::Ecr => Box::new(EcrChoiceHandler),
    }
}

/// Selects the registry-operations handler for a registry kind.
#[must_use]
pub fn artifact_handler(kind: Registry) -> Box<dyn ArtifactHandler> {
    match kind {
        Registry::Nexus => Box::new(NexusArtifactHandler),
        Registry::Ecr => Box::new(EcrArtifactHandler),
    }
}
