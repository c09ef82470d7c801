//! Repository REST client.
//!
//! One [`RepositoryClient`] covers a single server for the duration of
//! an operation: metadata fetch, component/asset search pages, multipart
//! upload, download, deletion, and the Docker-compatible tag listing.
//! Search calls are pure page functions: the continuation cursor is a
//! parameter and a return value, never client state.

use futures::StreamExt;
use reqwest::header::HeaderMap;
use tokio::io::AsyncWriteExt;

use crate::config::RepoServerConfig;
use crate::error::ClientError;
use crate::model::{
    DownloadFile, RepositoryDetails, RepositoryFormat, RepositoryType, SearchAssetsReq,
    SearchAssetsResp, SearchComponentsReq, SearchComponentsResp, TagList, UploadComponentReq,
    component_prefix,
};
use crate::transport;
use crate::upload::{self, PartPlan};

/// Client for one repository server.
#[derive(Debug)]
pub struct RepositoryClient {
    config: RepoServerConfig,
    http: reqwest::Client,
}

impl RepositoryClient {
    /// Creates a client from a server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RepoServerConfig) -> Result<Self, ClientError> {
        let http = transport::build_http_client(config.insecure)?;
        Ok(Self { config, http })
    }

    /// Returns the server configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &RepoServerConfig {
        &self.config
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/service/rest/v1{path}", self.config.server_url)
    }

    fn headers(&self) -> Result<HeaderMap, ClientError> {
        transport::auth_headers(self.config.authorization.as_deref())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(ClientError::Http {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    /// Checks connectivity by fetching the server base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the server cannot be reached or answers
    /// with a non-success status.
    pub async fn check(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(&self.config.server_url)
            .headers(self.headers()?)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Fetches repository metadata by name.
    ///
    /// Metadata is required by write and search operations, so a missing
    /// repository is an error here, not an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the repository does not
    /// exist, or a transport/HTTP error otherwise.
    pub async fn repository_details(&self, name: &str) -> Result<RepositoryDetails, ClientError> {
        let url = self.rest_url(&format!("/repositories/{name}"));
        let response = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;
        if response.status().as_u16() == 404 {
            return Err(ClientError::not_found(format!("repository '{name}'")));
        }
        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Fetches one page of component search results.
    ///
    /// The continuation cursor travels in `req` and comes back in the
    /// response; this call holds no pagination state.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unsupported repository formats,
    /// or a transport/HTTP/deserialization error.
    pub async fn search_components(
        &self,
        repo: &RepositoryDetails,
        req: &SearchComponentsReq,
    ) -> Result<SearchComponentsResp, ClientError> {
        let format = Self::searchable_format(repo)?;

        let mut params: Vec<(&str, String)> = vec![("repository", repo.name.clone())];
        if format == RepositoryFormat::Raw {
            let prefix = component_prefix(&req.group_id, &req.artifact_id);
            params.push(("q", format!("\"{prefix}\"")));
            params.push(("sort", "group".to_string()));
        } else {
            params.push(("group", req.group_id.clone()));
            params.push(("name", req.artifact_id.clone()));
            params.push(("sort", "version".to_string()));
        }
        params.push(("direction", "desc".to_string()));
        if let Some(token) = req.continuation_token.as_deref().filter(|t| !t.is_empty()) {
            params.push(("continuationToken", token.to_string()));
        }

        tracing::debug!(repository = %repo.name, group = %req.group_id,
            artifact = %req.artifact_id, "Searching components");
        let response = self
            .http
            .get(self.rest_url("/search"))
            .headers(self.headers()?)
            .query(&params)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Fetches one page of asset search results for a version.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unsupported repository formats,
    /// or a transport/HTTP/deserialization error.
    pub async fn search_assets(
        &self,
        repo: &RepositoryDetails,
        req: &SearchAssetsReq,
    ) -> Result<SearchAssetsResp, ClientError> {
        let format = Self::searchable_format(repo)?;

        let mut params: Vec<(&str, String)> = vec![("repository", repo.name.clone())];
        if format == RepositoryFormat::Raw {
            let prefix = component_prefix(&req.group_id, &req.artifact_id);
            params.push(("group", format!("{prefix}{}", req.version)));
        } else {
            params.push(("group", req.group_id.clone()));
            params.push(("name", req.artifact_id.clone()));
            params.push(("version", req.version.clone()));
        }
        if let Some(token) = req.continuation_token.as_deref().filter(|t| !t.is_empty()) {
            params.push(("continuationToken", token.to_string()));
        }

        let response = self
            .http
            .get(self.rest_url("/search/assets"))
            .headers(self.headers()?)
            .query(&params)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Uploads a component's files as batched multipart requests.
    ///
    /// The repository must be hosted and of a write-supported format.
    /// An empty file list is a no-op. Bodies are submitted sequentially;
    /// the first failure aborts the operation.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network call when the
    /// repository or the request violates the upload constraints, and a
    /// transport/HTTP/I-O error otherwise.
    pub async fn upload_component(
        &self,
        repo: &RepositoryDetails,
        req: &UploadComponentReq,
    ) -> Result<(), ClientError> {
        if !repo
            .repo_type()
            .is_some_and(RepositoryType::is_write_supported)
        {
            return Err(ClientError::validation(format!(
                "repository type '{}' does not accept uploads, only hosted",
                repo.repo_type
            )));
        }
        let format = Self::searchable_format(repo)?;
        if req.files.is_empty() {
            return Ok(());
        }

        let plan = upload::build_upload_plan(format, req)?;
        let url = self.rest_url("/components");
        for body in plan {
            let mut form = reqwest::multipart::Form::new();
            for part in body.parts {
                match part {
                    PartPlan::File {
                        field,
                        path,
                        file_name,
                    } => {
                        let bytes = tokio::fs::read(&path)
                            .await
                            .map_err(|e| ClientError::io(path.clone(), e))?;
                        form = form.part(
                            field,
                            reqwest::multipart::Part::bytes(bytes).file_name(file_name),
                        );
                    }
                    PartPlan::Text { field, value } => {
                        form = form.text(field, value);
                    }
                }
            }
            let response = self
                .http
                .post(&url)
                .headers(self.headers()?)
                .query(&[("repository", repo.name.as_str())])
                .multipart(form)
                .send()
                .await?;
            Self::ensure_success(response).await?;
        }
        tracing::info!(repository = %repo.name, files = req.files.len(),
            group = %req.group, artifact = %req.artifact_id, version = %req.version,
            "Uploaded component");
        Ok(())
    }

    /// Downloads each URL to its target path, overwriting existing
    /// files.
    ///
    /// An existing target is deleted before writing; parent directories
    /// are created as needed. A failure on one entry aborts the
    /// operation without touching entries already completed. A
    /// mid-stream failure can leave a partial file behind; callers that
    /// need atomicity should download into a scratch directory and
    /// rename.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for local filesystem failures and a
    /// transport/HTTP error for remote ones.
    pub async fn download(&self, files: &[DownloadFile]) -> Result<(), ClientError> {
        for task in files {
            if task.path.exists() {
                tokio::fs::remove_file(&task.path)
                    .await
                    .map_err(|e| ClientError::io(task.path.clone(), e))?;
            }
            if let Some(parent) = task.path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| ClientError::io(parent.to_path_buf(), e))?;
                }
            }

            let response = self
                .http
                .get(&task.url)
                .headers(self.headers()?)
                .send()
                .await?;
            let response = Self::ensure_success(response).await?;

            let mut file = tokio::fs::File::create(&task.path)
                .await
                .map_err(|e| ClientError::io(task.path.clone(), e))?;
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(ClientError::from)?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| ClientError::io(task.path.clone(), e))?;
            }
            file.flush()
                .await
                .map_err(|e| ClientError::io(task.path.clone(), e))?;
            tracing::debug!(url = %task.url, path = %task.path.display(), "Downloaded file");
        }
        Ok(())
    }

    /// Deletes components by identifier, one call per id.
    ///
    /// Deletes are issued sequentially; the first failure aborts the
    /// remaining deletes.
    ///
    /// # Errors
    ///
    /// Returns a transport/HTTP error from the failing delete.
    pub async fn delete_components(&self, ids: &[String]) -> Result<(), ClientError> {
        for id in ids {
            let url = self.rest_url(&format!("/components/{id}"));
            let response = self
                .http
                .delete(&url)
                .headers(self.headers()?)
                .send()
                .await?;
            Self::ensure_success(response).await?;
            tracing::info!(id = %id, "Deleted component");
        }
        Ok(())
    }

    /// Lists tags for an image on the Docker-compatible endpoint.
    ///
    /// A missing image yields an empty tag list, not an error.
    ///
    /// # Errors
    ///
    /// Returns a transport/HTTP/deserialization error.
    pub async fn list_docker_tags(&self, image: &str) -> Result<TagList, ClientError> {
        let url = format!("{}/v2/{image}/tags/list", self.config.server_url);
        let response = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;
        if response.status().as_u16() == 404 {
            return Ok(TagList {
                name: image.to_string(),
                tags: Vec::new(),
            });
        }
        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(Into::into)
    }

    fn searchable_format(repo: &RepositoryDetails) -> Result<RepositoryFormat, ClientError> {
        repo.format()
            .filter(|f| f.is_write_supported())
            .ok_or_else(|| {
                ClientError::validation(format!(
                    "repository format '{}' is not supported, only maven2 and raw",
                    repo.format
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(format: &str, repo_type: &str) -> RepositoryDetails {
        RepositoryDetails {
            name: "releases".to_string(),
            format: format.to_string(),
            url: "https://nexus.example.com/repository/releases".to_string(),
            repo_type: repo_type.to_string(),
            attributes: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_client_creation() {
        let config = RepoServerConfig::new("releases", "https://nexus.example.com");
        assert!(RepositoryClient::new(config).is_ok());
    }

    #[test]
    fn test_rest_url() {
        let config = RepoServerConfig::new("releases", "https://nexus.example.com");
        let client = RepositoryClient::new(config).unwrap();
        assert_eq!(
            client.rest_url("/repositories/releases"),
            "https://nexus.example.com/service/rest/v1/repositories/releases"
        );
    }

    #[test]
    fn test_searchable_format_accepts_raw_and_maven2() {
        assert_eq!(
            RepositoryClient::searchable_format(&details("raw", "hosted")).unwrap(),
            RepositoryFormat::Raw
        );
        assert_eq!(
            RepositoryClient::searchable_format(&details("maven2", "hosted")).unwrap(),
            RepositoryFormat::Maven2
        );
    }

    #[test]
    fn test_searchable_format_rejects_docker() {
        let err = RepositoryClient::searchable_format(&details("docker", "hosted")).unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_upload_rejects_proxy_repository() {
        let config = RepoServerConfig::new("releases", "https://nexus.example.com");
        let client = RepositoryClient::new(config).unwrap();
        let err = client
            .upload_component(&details("raw", "proxy"), &UploadComponentReq::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
    }
}
