//! Bounded pagination over the search endpoints.
//!
//! The client exposes pure page functions; the loops here own the
//! continuation cursor and the accumulation set. Every cycle stops
//! after at most [`MAX_SEARCH_PAGES`] pages regardless of what the
//! server keeps returning, and never admits more results than the
//! caller asked for.

use indexmap::IndexSet;

use crate::client::RepositoryClient;
use crate::error::ClientError;
use crate::filter::{self, GlobFilter};
use crate::model::{
    AssetDetails, RepositoryDetails, SearchAssetsReq, SearchComponentsReq,
};

/// Upper bound on pages fetched in one search/deletion cycle.
pub const MAX_SEARCH_PAGES: usize = 50;

/// Normalizes a continuation token: blank means end of results.
fn next_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

/// Collects deduplicated `group:artifact:version` candidates.
///
/// Signature-suffixed component names are excluded, versions are
/// resolved per format (explicit field, or derived from the raw group
/// path), and the optional wildcard filter applies to the version
/// string. Admission preserves first-seen order; re-delivery of the
/// same candidate on a later page is a no-op.
///
/// # Errors
///
/// Any transport or deserialization failure aborts the whole collection
/// with no partial result.
pub async fn collect_versions(
    client: &RepositoryClient,
    repo: &RepositoryDetails,
    group_id: &str,
    artifact_id: &str,
    limit: usize,
    version_filter: Option<&GlobFilter>,
) -> Result<Vec<String>, ClientError> {
    let mut candidates: IndexSet<String> = IndexSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0;

    while pages < MAX_SEARCH_PAGES && candidates.len() < limit {
        let req = SearchComponentsReq::new(group_id, artifact_id)
            .with_continuation_token(token.take());
        let resp = client.search_components(repo, &req).await?;
        if resp.items.is_empty() {
            break;
        }
        for item in &resp.items {
            if filter::is_signature_file(&item.name) {
                continue;
            }
            let Some(version) = item.resolve_version(group_id, artifact_id) else {
                continue;
            };
            if filter::admits(version_filter, &version) && candidates.len() < limit {
                candidates.insert(format!("{group_id}:{artifact_id}:{version}"));
            }
        }
        match next_token(resp.continuation_token) {
            Some(t) => token = Some(t),
            None => break,
        }
        pages += 1;
    }

    tracing::debug!(repository = %repo.name, group = group_id, artifact = artifact_id,
        candidates = candidates.len(), pages, "Collected version candidates");
    Ok(candidates.into_iter().collect())
}

/// Collects the identifiers of every component under a group/artifact
/// pair, across all versions.
///
/// Used by deletion: no version filter, no candidate limit beyond the
/// page bound.
///
/// # Errors
///
/// Any transport or deserialization failure aborts the whole collection
/// with no partial result.
pub async fn collect_component_ids(
    client: &RepositoryClient,
    repo: &RepositoryDetails,
    group_id: &str,
    artifact_id: &str,
) -> Result<Vec<String>, ClientError> {
    let mut ids: IndexSet<String> = IndexSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0;

    while pages < MAX_SEARCH_PAGES {
        let req = SearchComponentsReq::new(group_id, artifact_id)
            .with_continuation_token(token.take());
        let resp = client.search_components(repo, &req).await?;
        if resp.items.is_empty() {
            break;
        }
        for item in &resp.items {
            tracing::debug!(id = %item.id, name = %item.name, "Found component");
            ids.insert(item.id.clone());
        }
        match next_token(resp.continuation_token) {
            Some(t) => token = Some(t),
            None => break,
        }
        pages += 1;
    }

    Ok(ids.into_iter().collect())
}

/// Collects up to `max_assets` assets of one component version.
///
/// Records deduplicate structurally across pages, preserving first-seen
/// order.
///
/// # Errors
///
/// Any transport or deserialization failure aborts the whole collection
/// with no partial result.
pub async fn collect_assets(
    client: &RepositoryClient,
    repo: &RepositoryDetails,
    group_id: &str,
    artifact_id: &str,
    version: &str,
    max_assets: usize,
) -> Result<Vec<AssetDetails>, ClientError> {
    let mut assets: IndexSet<AssetDetails> = IndexSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0;

    while pages < MAX_SEARCH_PAGES && assets.len() < max_assets {
        let req = SearchAssetsReq::new(group_id, artifact_id, version)
            .with_continuation_token(token.take());
        let resp = client.search_assets(repo, &req).await?;
        if resp.items.is_empty() {
            break;
        }
        for item in resp.items {
            if assets.len() < max_assets {
                assets.insert(item);
            }
        }
        match next_token(resp.continuation_token) {
            Some(t) => token = Some(t),
            None => break,
        }
        pages += 1;
    }

    Ok(assets.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_terminates() {
        assert_eq!(next_token(None), None);
        assert_eq!(next_token(Some(String::new())), None);
        assert_eq!(next_token(Some("   ".to_string())), None);
        assert_eq!(next_token(Some("abc".to_string())), Some("abc".to_string()));
    }
}
