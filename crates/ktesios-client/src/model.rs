//! Wire types for the repository REST API.
//!
//! Request and response shapes for search, metadata, upload, and
//! download operations, plus version derivation for path-addressed
//! components.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage format of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RepositoryFormat {
    Maven2,
    Raw,
    Docker,
    Apt,
    Npm,
    Nuget,
    R,
    Yum,
    Bower,
}

impl RepositoryFormat {
    /// Parses a format from its wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "maven2" => Some(Self::Maven2),
            "raw" => Some(Self::Raw),
            "docker" => Some(Self::Docker),
            "apt" => Some(Self::Apt),
            "npm" => Some(Self::Npm),
            "nuget" => Some(Self::Nuget),
            "r" => Some(Self::R),
            "yum" => Some(Self::Yum),
            "bower" => Some(Self::Bower),
            _ => None,
        }
    }

    /// Returns true for the formats that support writes and component
    /// search (`maven2` and `raw`).
    #[must_use]
    pub const fn is_write_supported(self) -> bool {
        matches!(self, Self::Maven2 | Self::Raw)
    }

    /// Multipart field prefix for this format (`maven2` / `raw`).
    #[must_use]
    pub const fn field_prefix(self) -> &'static str {
        match self {
            Self::Maven2 => "maven2",
            _ => "raw",
        }
    }
}

impl std::fmt::Display for RepositoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Maven2 => "maven2",
            Self::Raw => "raw",
            Self::Docker => "docker",
            Self::Apt => "apt",
            Self::Npm => "npm",
            Self::Nuget => "nuget",
            Self::R => "r",
            Self::Yum => "yum",
            Self::Bower => "bower",
        };
        write!(f, "{name}")
    }
}

/// Type of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RepositoryType {
    Hosted,
    Proxy,
    Group,
}

impl RepositoryType {
    /// Parses a type from its wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "hosted" => Some(Self::Hosted),
            "proxy" => Some(Self::Proxy),
            "group" => Some(Self::Group),
            _ => None,
        }
    }

    /// Only hosted repositories accept writes.
    #[must_use]
    pub const fn is_write_supported(self) -> bool {
        matches!(self, Self::Hosted)
    }
}

/// Repository metadata, fetched once per operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryDetails {
    /// Repository name.
    pub name: String,

    /// Declared storage format.
    pub format: String,

    /// Base content URL for direct downloads.
    #[serde(default)]
    pub url: String,

    /// Declared repository type.
    #[serde(rename = "type")]
    pub repo_type: String,

    /// Free-form attribute mapping.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl RepositoryDetails {
    /// Parsed storage format, if recognized.
    #[must_use]
    pub fn format(&self) -> Option<RepositoryFormat> {
        RepositoryFormat::parse(&self.format)
    }

    /// Parsed repository type, if recognized.
    #[must_use]
    pub fn repo_type(&self) -> Option<RepositoryType> {
        RepositoryType::parse(&self.repo_type)
    }
}

/// Renders the content path prefix for a component:
/// `/{group with dots mapped to slashes}/{artifact}/`.
///
/// # Examples
///
/// ```
/// use ktesios_client::model::component_prefix;
///
/// assert_eq!(component_prefix("com.example", "test-bb"), "/com/example/test-bb/");
/// ```
#[must_use]
pub fn component_prefix(group_id: &str, artifact_id: &str) -> String {
    format!("/{}/{artifact_id}/", group_id.replace('.', "/"))
}

/// Joins path segments with single slashes, skipping blank segments and
/// collapsing duplicate separators at the joins.
#[must_use]
pub fn join_path(segments: &[&str]) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.trim().is_empty() {
            continue;
        }
        if out.is_empty() {
            out.push_str(segment);
        } else if out.ends_with('/') && segment.starts_with('/') {
            out.push_str(&segment[1..]);
        } else if out.ends_with('/') || segment.starts_with('/') {
            out.push_str(segment);
        } else {
            out.push('/');
            out.push_str(segment);
        }
    }
    out
}

/// Returns the final segment of a storage path.
#[must_use]
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// One component record returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDetails {
    /// Component identifier.
    pub id: String,

    /// Repository the component lives in.
    #[serde(default)]
    pub repository: String,

    /// Storage format of the component.
    #[serde(default)]
    pub format: String,

    /// Group path (coordinate group for maven2, directory for raw).
    #[serde(default)]
    pub group: String,

    /// Component name.
    #[serde(default)]
    pub name: String,

    /// Explicit version, when the format records one.
    #[serde(default)]
    pub version: Option<String>,
}

impl ComponentDetails {
    /// Resolves the component's version string.
    ///
    /// An explicit non-blank version wins. Otherwise, for the `raw`
    /// format only, the version is the remainder of the group path after
    /// the `/{group}/{artifact}/` prefix; the prefix must sit at offset
    /// zero and the remainder must be non-blank. Returns `None` when no
    /// version can be derived; the record is excluded, not an error.
    #[must_use]
    pub fn resolve_version(&self, group_id: &str, artifact_id: &str) -> Option<String> {
        if let Some(version) = &self.version {
            if !version.trim().is_empty() {
                return Some(version.clone());
            }
        }
        if RepositoryFormat::parse(&self.format) == Some(RepositoryFormat::Raw) {
            let prefix = component_prefix(group_id, artifact_id);
            if let Some(rest) = self.group.strip_prefix(&prefix) {
                if !rest.trim().is_empty() {
                    return Some(rest.to_string());
                }
            }
        }
        None
    }
}

/// Component search request parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchComponentsReq {
    /// Coordinate group.
    pub group_id: String,

    /// Coordinate artifact id.
    pub artifact_id: String,

    /// Continuation token from the previous page, forwarded verbatim.
    pub continuation_token: Option<String>,
}

impl SearchComponentsReq {
    /// Creates a request for the given coordinates.
    #[must_use]
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            continuation_token: None,
        }
    }

    /// Sets the continuation token for the next page.
    #[must_use]
    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }
}

/// Component search response page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchComponentsResp {
    /// Records on this page.
    #[serde(default)]
    pub items: Vec<ComponentDetails>,

    /// Token for the next page; absent or blank means end of results.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// Asset search request parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchAssetsReq {
    /// Coordinate group.
    pub group_id: String,

    /// Coordinate artifact id.
    pub artifact_id: String,

    /// Version whose assets are listed.
    pub version: String,

    /// Continuation token from the previous page, forwarded verbatim.
    pub continuation_token: Option<String>,
}

impl SearchAssetsReq {
    /// Creates a request for the given coordinates and version.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            continuation_token: None,
        }
    }

    /// Sets the continuation token for the next page.
    #[must_use]
    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }
}

/// One asset record returned by the asset search endpoint.
///
/// Equality is structural; identical records delivered on different
/// pages deduplicate in the accumulating set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    /// Asset identifier.
    pub id: String,

    /// Storage path within the repository.
    #[serde(default)]
    pub path: String,

    /// Direct download URL.
    #[serde(default)]
    pub download_url: String,

    /// Repository the asset lives in.
    #[serde(default)]
    pub repository: String,

    /// Storage format.
    #[serde(default)]
    pub format: String,

    /// Declared content type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Last-modified timestamp.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,

    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Asset search response page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAssetsResp {
    /// Records on this page.
    #[serde(default)]
    pub items: Vec<AssetDetails>,

    /// Token for the next page; absent or blank means end of results.
    #[serde(default)]
    pub continuation_token: Option<String>,
}

/// Tag listing returned by the Docker-compatible endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagList {
    /// Image name as reported by the registry.
    #[serde(default)]
    pub name: String,

    /// Tags, oldest first as returned by the endpoint.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One local file in an upload request.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Path to the local file.
    pub path: PathBuf,

    /// Classifier distinguishing sibling assets of one component
    /// (`sources`, `javadoc`); maven2 only.
    pub classifier: Option<String>,

    /// Extension sent instead of the one derived from the file name.
    pub extension: Option<String>,
}

impl FileUpload {
    /// Creates a file reference.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            classifier: None,
            extension: None,
        }
    }

    /// Sets the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Overrides the extension derived from the file name.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// File name component of the path, if present.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Extension sent with the file: the override when set, otherwise
    /// the substring after the first dot of the file name
    /// (`app.tar.gz` → `tar.gz`).
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        if let Some(ext) = self.extension.as_deref() {
            return Some(ext);
        }
        self.file_name()
            .and_then(|name| name.split_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Upload request for one component with its file assets.
#[derive(Debug, Clone, Default)]
pub struct UploadComponentReq {
    /// Coordinate group.
    pub group: String,

    /// Coordinate artifact id.
    pub artifact_id: String,

    /// Version being uploaded.
    pub version: String,

    /// Generate a descriptor (POM) server-side for maven2 uploads.
    pub generate_pom: bool,

    /// Packaging label, used when generating a descriptor.
    pub packaging: String,

    /// Files to upload, in order.
    pub files: Vec<FileUpload>,
}

impl UploadComponentReq {
    /// Renders the target directory for raw uploads:
    /// `{group with dots mapped to slashes}/{artifact}/{version}`.
    #[must_use]
    pub fn to_directory(&self) -> String {
        let group_path = self.group.replace('.', "/");
        join_path(&[&group_path, &self.artifact_id, &self.version])
    }
}

/// A download URL paired with its target local path.
#[derive(Debug, Clone)]
pub struct DownloadFile {
    /// Remote URL to fetch.
    pub url: String,

    /// Local file the body is written to.
    pub path: PathBuf,
}

impl DownloadFile {
    /// Creates a download task.
    #[must_use]
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_component(group: &str, version: Option<&str>) -> ComponentDetails {
        ComponentDetails {
            id: "c1".to_string(),
            repository: "raw-pp".to_string(),
            format: "raw".to_string(),
            group: group.to_string(),
            name: "file.tar.gz".to_string(),
            version: version.map(ToString::to_string),
        }
    }

    #[test]
    fn test_component_prefix() {
        assert_eq!(
            component_prefix("com.example", "test-bb"),
            "/com/example/test-bb/"
        );
        assert_eq!(component_prefix("app", "svc"), "/app/svc/");
    }

    #[test]
    fn test_explicit_version_wins() {
        let c = raw_component("/whatever", Some("1.2.3"));
        assert_eq!(
            c.resolve_version("com.example", "app").as_deref(),
            Some("1.2.3")
        );
    }

    #[test]
    fn test_derived_version_from_group_path() {
        let c = raw_component("/com/example/app/2024.07.22-1", None);
        assert_eq!(
            c.resolve_version("com.example", "app").as_deref(),
            Some("2024.07.22-1")
        );
    }

    #[test]
    fn test_prefix_must_sit_at_offset_zero() {
        let c = raw_component("/nested/com/example/app/1.0", None);
        assert_eq!(c.resolve_version("com.example", "app"), None);
    }

    #[test]
    fn test_blank_remainder_is_excluded() {
        let c = raw_component("/com/example/app/", None);
        assert_eq!(c.resolve_version("com.example", "app"), None);
    }

    #[test]
    fn test_maven2_never_derives() {
        let mut c = raw_component("/com/example/app/1.0", None);
        c.format = "maven2".to_string();
        assert_eq!(c.resolve_version("com.example", "app"), None);
    }

    #[test]
    fn test_join_path_handles_separators() {
        assert_eq!(join_path(&["a", "b", "c"]), "a/b/c");
        assert_eq!(join_path(&["a/", "/b"]), "a/b");
        assert_eq!(join_path(&["a/", "b"]), "a/b");
        assert_eq!(join_path(&["", "b", ""]), "b");
    }

    #[test]
    fn test_to_directory() {
        let req = UploadComponentReq {
            group: "com.example".to_string(),
            artifact_id: "app".to_string(),
            version: "1.0.0".to_string(),
            ..UploadComponentReq::default()
        };
        assert_eq!(req.to_directory(), "com/example/app/1.0.0");
    }

    #[test]
    fn test_file_extension_after_first_dot() {
        let file = FileUpload::new("/tmp/app.tar.gz");
        assert_eq!(file.extension(), Some("tar.gz"));
        let plain = FileUpload::new("/tmp/LICENSE");
        assert_eq!(plain.extension(), None);
    }

    #[test]
    fn test_file_extension_override_wins() {
        let file = FileUpload::new("/tmp/app.tar.gz").with_extension("tgz");
        assert_eq!(file.extension(), Some("tgz"));
        let dotless = FileUpload::new("/tmp/LICENSE").with_extension("txt");
        assert_eq!(dotless.extension(), Some("txt"));
    }

    #[test]
    fn test_file_name_of_path() {
        assert_eq!(file_name_of("/com/example/app/1.0/app.jar"), "app.jar");
        assert_eq!(file_name_of("app.jar"), "app.jar");
    }

    #[test]
    fn test_search_resp_deserializes_wire_shape() {
        let json = r#"{
            "items": [{"id": "x", "repository": "r", "format": "maven2",
                       "group": "com.example", "name": "app", "version": "1.0"}],
            "continuationToken": "abc"
        }"#;
        let resp: SearchComponentsResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.items.len(), 1);
        assert_eq!(resp.continuation_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_asset_details_structural_equality() {
        let json = r#"{"id": "a1", "path": "/app/1.0/app.jar",
                       "downloadUrl": "https://n/x", "repository": "r",
                       "format": "raw", "contentType": "application/java-archive",
                       "fileSize": 10}"#;
        let one: AssetDetails = serde_json::from_str(json).unwrap();
        let two: AssetDetails = serde_json::from_str(json).unwrap();
        assert_eq!(one, two);
    }
}
