//! AWS Elastic Container Registry backend.
//!
//! The ECR listing protocol is two-step: describe the repository to
//! obtain its canonical URI, then page through the image list with an
//! opaque next-token. A missing repository means an empty candidate
//! list, not an error.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexSet;

use aws_sdk_ecr::error::DisplayErrorContext;
use aws_sdk_ecr::types::ImageTagMutability;

use crate::choice::{
    ArtifactChoiceHandler, ArtifactHandler, ChoiceOption, CreateImageRepository, LoginPassword,
    lookup,
};
use crate::config::{ConfigRegistry, RepoServerConfig};
use crate::error::ClientError;
use crate::filter;

/// Upper bound on image-list pages fetched in one listing.
pub const MAX_IMAGE_PAGES: usize = 10;

/// Entries requested per image-list page.
pub const IMAGE_PAGE_SIZE: i32 = 500;

/// Thin wrapper over the ECR SDK client, configured from a
/// [`RepoServerConfig`].
#[derive(Debug)]
pub struct EcrClient {
    inner: aws_sdk_ecr::Client,
}

impl EcrClient {
    /// Connects using the configuration's region, endpoint, and
    /// optional static credentials; without static credentials the
    /// ambient AWS credential chain applies (environment, profile,
    /// instance role).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] when no region is
    /// configured.
    pub async fn connect(config: &RepoServerConfig) -> Result<Self, ClientError> {
        let region = config.region.clone().ok_or_else(|| {
            ClientError::validation("region is required for the ECR registry kind")
        })?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region));
        if let Some((access_key, secret_key)) = config.basic_credentials() {
            loader = loader.credentials_provider(aws_sdk_ecr::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "ktesios-static",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_ecr::config::Builder::from(&shared);
        if !config.server_url.trim().is_empty() {
            builder = builder.endpoint_url(&config.server_url);
        }
        Ok(Self {
            inner: aws_sdk_ecr::Client::from_conf(builder.build()),
        })
    }

    /// Returns the canonical URI of a repository, or `None` when the
    /// repository does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Registry`] for any service failure other
    /// than repository-not-found.
    pub async fn repository_uri(
        &self,
        repository_name: &str,
    ) -> Result<Option<String>, ClientError> {
        match self
            .inner
            .describe_repositories()
            .repository_names(repository_name)
            .send()
            .await
        {
            Ok(resp) => Ok(resp
                .repositories()
                .first()
                .and_then(|r| r.repository_uri().map(ToString::to_string))),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_repository_not_found_exception())
                {
                    tracing::warn!(repository = repository_name, "Repository not found");
                    Ok(None)
                } else {
                    Err(ClientError::registry(DisplayErrorContext(err)))
                }
            }
        }
    }

    /// Fetches one page of image tags. Untagged images are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Registry`] on service failure.
    pub async fn image_tags_page(
        &self,
        repository_name: &str,
        next_token: Option<String>,
    ) -> Result<(Vec<String>, Option<String>), ClientError> {
        let resp = self
            .inner
            .list_images()
            .repository_name(repository_name)
            .max_results(IMAGE_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| ClientError::registry(DisplayErrorContext(e)))?;
        let tags = resp
            .image_ids()
            .iter()
            .filter_map(|id| id.image_tag().map(ToString::to_string))
            .collect();
        Ok((tags, resp.next_token().map(ToString::to_string)))
    }

    /// Decodes the registry authorization token into login credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Registry`] when the service fails or the
    /// token is not a base64 `user:password` pair.
    pub async fn login_password(&self) -> Result<LoginPassword, ClientError> {
        let resp = self
            .inner
            .get_authorization_token()
            .send()
            .await
            .map_err(|e| ClientError::registry(DisplayErrorContext(e)))?;
        let data = resp.authorization_data();
        let [auth] = data else {
            return Err(ClientError::registry(format!(
                "expected one authorization data entry, got {}",
                data.len()
            )));
        };
        let token = auth
            .authorization_token()
            .ok_or_else(|| ClientError::registry("authorization data carries no token"))?;
        let decoded = BASE64
            .decode(token)
            .map_err(|e| ClientError::registry(format!("authorization token is not base64: {e}")))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| ClientError::registry(format!("authorization token is not UTF-8: {e}")))?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| ClientError::registry("authorization token is not user:password"))?;
        Ok(LoginPassword {
            username: username.to_string(),
            password: password.to_string(),
            repository_uri: auth
                .proxy_endpoint()
                .unwrap_or_default()
                .trim_start_matches("https://")
                .to_string(),
        })
    }

    /// Ensures a repository exists, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Registry`] on service failure.
    pub async fn ensure_repository(
        &self,
        repository_name: &str,
        mutable: bool,
    ) -> Result<CreateImageRepository, ClientError> {
        if self.repository_uri(repository_name).await?.is_some() {
            return Ok(CreateImageRepository { existed: true });
        }
        let mutability = if mutable {
            ImageTagMutability::Mutable
        } else {
            ImageTagMutability::Immutable
        };
        self.inner
            .create_repository()
            .repository_name(repository_name)
            .image_tag_mutability(mutability)
            .send()
            .await
            .map_err(|e| ClientError::registry(DisplayErrorContext(e)))?;
        tracing::info!(repository = repository_name, "Created image repository");
        Ok(CreateImageRepository { existed: false })
    }
}

/// Choice handler for ECR: describe-repository, then a bounded
/// image-list cursor loop.
pub struct EcrChoiceHandler;

#[async_trait]
impl ArtifactChoiceHandler for EcrChoiceHandler {
    async fn list_candidates(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
        option: &str,
        _repository: &str,
        limit: usize,
    ) -> Result<Vec<String>, ClientError> {
        let config = lookup(registry, server_id)?;
        let choice = ChoiceOption::parse(option)?;
        let ecr = EcrClient::connect(config).await?;

        let repository_name = choice.repository_name();
        let Some(uri) = ecr.repository_uri(&repository_name).await? else {
            return Ok(Vec::new());
        };

        let mut candidates: IndexSet<String> = IndexSet::new();
        let mut token: Option<String> = None;
        let mut pages = 0;
        while pages < MAX_IMAGE_PAGES && candidates.len() < limit {
            let (tags, next) = ecr.image_tags_page(&repository_name, token.take()).await?;
            for tag in &tags {
                if filter::is_signature_tag(tag) || !choice.admits(tag) {
                    continue;
                }
                if candidates.len() < limit {
                    candidates.insert(format!("{uri}:{tag}"));
                }
            }
            match next {
                Some(t) => token = Some(t),
                None => break,
            }
            pages += 1;
        }
        Ok(candidates.into_iter().collect())
    }
}

/// Registry operations for ECR.
pub struct EcrArtifactHandler;

#[async_trait]
impl ArtifactHandler for EcrArtifactHandler {
    async fn login_password(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
    ) -> Result<LoginPassword, ClientError> {
        let config = lookup(registry, server_id)?;
        let ecr = EcrClient::connect(config).await?;
        ecr.login_password().await
    }

    async fn create_image_repository(
        &self,
        registry: &ConfigRegistry,
        server_id: &str,
        repository: &str,
        mutable: bool,
    ) -> Result<CreateImageRepository, ClientError> {
        let config = lookup(registry, server_id)?;
        let ecr = EcrClient::connect(config).await?;
        ecr.ensure_repository(repository, mutable).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Registry;

    #[tokio::test]
    async fn test_connect_requires_region() {
        let config = RepoServerConfig::new("ecr", "").with_registry(Registry::Ecr);
        let err = EcrClient::connect(&config).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[test]
    fn test_authorization_token_shape() {
        // The service returns base64("AWS:<password>").
        let token = BASE64.encode("AWS:ecr-password");
        let decoded = String::from_utf8(BASE64.decode(token).unwrap()).unwrap();
        let (user, pass) = decoded.split_once(':').unwrap();
        assert_eq!(user, "AWS");
        assert_eq!(pass, "ecr-password");
    }
}
