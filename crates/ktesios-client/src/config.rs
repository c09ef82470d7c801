//! Server configuration types.
//!
//! A [`RepoServerConfig`] describes one repository server endpoint and is
//! immutable once constructed. A [`ConfigRegistry`] is an explicit lookup
//! table passed by reference to every component that resolves endpoints;
//! there is no process-global configuration.

use indexmap::IndexMap;

use crate::transport;

/// Registry kind behind a server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Registry {
    /// Nexus-style repository manager (REST search/upload API and its
    /// Docker-compatible endpoint).
    #[default]
    Nexus,

    /// AWS Elastic Container Registry.
    Ecr,
}

impl Registry {
    /// Parses a registry kind from its configuration name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "nexus" => Some(Self::Nexus),
            "ecr" => Some(Self::Ecr),
            _ => None,
        }
    }
}

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nexus => write!(f, "nexus"),
            Self::Ecr => write!(f, "ecr"),
        }
    }
}

/// Configuration for one repository server.
#[derive(Debug, Clone)]
pub struct RepoServerConfig {
    /// Identifier under which the server is registered.
    pub server_id: String,

    /// Human-readable name, shown in logs.
    pub display_name: String,

    /// Server base URL (e.g. `https://nexus.example.com`).
    pub server_url: String,

    /// Opaque authorization value (`Basic …`), absent for anonymous
    /// access.
    pub authorization: Option<String>,

    /// Whether the server is addressed through its Docker-compatible
    /// endpoint.
    pub docker: bool,

    /// Registry kind.
    pub registry: Registry,

    /// AWS region, required for the ECR registry kind.
    pub region: Option<String>,

    /// Accept invalid TLS certificates (self-signed endpoints).
    pub insecure: bool,
}

impl RepoServerConfig {
    /// Creates a new configuration with the given id and base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use ktesios_client::RepoServerConfig;
    ///
    /// let config = RepoServerConfig::new("releases", "https://nexus.example.com");
    /// assert_eq!(config.server_id, "releases");
    /// ```
    #[must_use]
    pub fn new(server_id: impl Into<String>, server_url: impl Into<String>) -> Self {
        let server_id = server_id.into();
        Self {
            display_name: server_id.clone(),
            server_id,
            server_url: server_url.into(),
            authorization: None,
            docker: false,
            registry: Registry::Nexus,
            region: None,
            insecure: false,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Sets an opaque authorization value.
    #[must_use]
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }

    /// Sets `Basic` authorization from username and password.
    #[must_use]
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.authorization = Some(transport::basic_auth(username, password));
        self
    }

    /// Marks the server as a Docker-compatible endpoint.
    #[must_use]
    pub const fn with_docker(mut self, docker: bool) -> Self {
        self.docker = docker;
        self
    }

    /// Sets the registry kind.
    #[must_use]
    pub const fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the AWS region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Accepts invalid TLS certificates.
    ///
    /// # Warning
    ///
    /// Only for endpoints with self-signed certificates under the
    /// caller's control.
    #[must_use]
    pub const fn insecure(mut self) -> Self {
        self.insecure = true;
        self
    }

    /// Returns the server host with the URL scheme stripped, as used in
    /// image references.
    #[must_use]
    pub fn host(&self) -> &str {
        self.server_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
    }

    /// Returns the configured `Basic` credentials, if any.
    #[must_use]
    pub fn basic_credentials(&self) -> Option<(String, String)> {
        self.authorization
            .as_deref()
            .and_then(transport::split_basic_auth)
    }
}

/// Explicit registry of server configurations, keyed by server id.
///
/// Components that need endpoint resolution receive a reference to one
/// of these; configurations are registered up front by the caller.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    configs: IndexMap<String, RepoServerConfig>,
}

impl ConfigRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a configuration under its server id, replacing any
    /// previous entry with the same id.
    pub fn insert(&mut self, config: RepoServerConfig) {
        self.configs.insert(config.server_id.clone(), config);
    }

    /// Looks up a configuration by server id.
    #[must_use]
    pub fn get(&self, server_id: &str) -> Option<&RepoServerConfig> {
        self.configs.get(server_id)
    }

    /// Iterates configurations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RepoServerConfig> {
        self.configs.values()
    }

    /// Returns the number of registered servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true if no servers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RepoServerConfig::new("releases", "https://nexus.example.com");
        assert_eq!(config.display_name, "releases");
        assert!(config.authorization.is_none());
        assert!(!config.docker);
        assert_eq!(config.registry, Registry::Nexus);
        assert!(!config.insecure);
    }

    #[test]
    fn test_host_strips_scheme() {
        let https = RepoServerConfig::new("a", "https://nexus.example.com:8443");
        assert_eq!(https.host(), "nexus.example.com:8443");
        let http = RepoServerConfig::new("b", "http://nexus.local");
        assert_eq!(http.host(), "nexus.local");
    }

    #[test]
    fn test_basic_credentials_round_trip() {
        let config = RepoServerConfig::new("a", "https://example.com")
            .with_basic_auth("deploy", "secret");
        let (user, pass) = config.basic_credentials().unwrap();
        assert_eq!(user, "deploy");
        assert_eq!(pass, "secret");
    }

    #[test]
    fn test_registry_parse() {
        assert_eq!(Registry::parse("nexus"), Some(Registry::Nexus));
        assert_eq!(Registry::parse("ECR"), Some(Registry::Ecr));
        assert_eq!(Registry::parse("harbor"), None);
    }

    #[test]
    fn test_registry_lookup_and_order() {
        let mut registry = ConfigRegistry::new();
        registry.insert(RepoServerConfig::new("a", "https://a.example.com"));
        registry.insert(RepoServerConfig::new("b", "https://b.example.com"));
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("b").map(|c| c.server_url.as_str()),
            Some("https://b.example.com")
        );
        assert!(registry.get("c").is_none());
        let ids: Vec<_> = registry.iter().map(|c| c.server_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut registry = ConfigRegistry::new();
        registry.insert(RepoServerConfig::new("a", "https://old.example.com"));
        registry.insert(RepoServerConfig::new("a", "https://new.example.com"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("a").map(|c| c.server_url.as_str()),
            Some("https://new.example.com")
        );
    }
}
