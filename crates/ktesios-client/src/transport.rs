//! HTTP transport construction and authorization helpers.
//!
//! Every network-facing component builds its connection-pooled client
//! here; the pool is released when the client is dropped.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::error::ClientError;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a connection-pooled HTTP client.
///
/// `accept_invalid_certs` relaxes certificate validation for registry
/// endpoints fronted by self-signed TLS. Redirects are followed with
/// reqwest's default policy.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] if the client cannot be built.
pub fn build_http_client(accept_invalid_certs: bool) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .user_agent(concat!("ktesios/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(ClientError::from)
}

/// Encodes username and password into a `Basic` authorization value.
///
/// # Examples
///
/// ```
/// use ktesios_client::transport::basic_auth;
///
/// let auth = basic_auth("deploy", "secret");
/// assert!(auth.starts_with("Basic "));
/// ```
#[must_use]
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

/// Splits a `Basic` authorization value back into username and password.
///
/// Returns `None` when the value is not `Basic`, not valid base64, or
/// does not contain a `user:password` pair.
#[must_use]
pub fn split_basic_auth(authorization: &str) -> Option<(String, String)> {
    let encoded = authorization.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Builds request headers from an optional authorization value.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] if the value cannot be used as a
/// header.
pub fn auth_headers(authorization: Option<&str>) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    if let Some(value) = authorization {
        let header = HeaderValue::from_str(value)
            .map_err(|_| ClientError::validation("invalid authorization value"))?;
        headers.insert(AUTHORIZATION, header);
    }
    Ok(headers)
}
