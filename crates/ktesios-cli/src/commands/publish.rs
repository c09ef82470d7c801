//! Publish command implementation.
//!
//! Lists workspace files by include/exclude wildcard patterns and
//! uploads them as one component.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use walkdir::WalkDir;

use ktesios_client::{FileUpload, GlobFilter, RepositoryClient, UploadComponentReq};

use super::ServerArgs;

/// Arguments for the publish command.
#[derive(Args)]
pub struct PublishArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Target repository name
    #[arg(short, long)]
    repository: String,

    /// Coordinate group (e.g. `com.example`)
    #[arg(short, long)]
    group: String,

    /// Coordinate artifact id
    #[arg(short, long)]
    artifact: String,

    /// Version to publish
    #[arg(short, long)]
    version: String,

    /// Packaging label, used when generating a descriptor
    #[arg(long, default_value = "jar")]
    packaging: String,

    /// Generate a descriptor (POM) server-side
    #[arg(long)]
    generate_pom: bool,

    /// Comma-separated include patterns (`*` and `?` wildcards),
    /// matched against workspace-relative paths
    #[arg(short, long)]
    includes: String,

    /// Comma-separated exclude patterns
    #[arg(long)]
    excludes: Option<String>,

    /// Workspace directory the patterns are matched under
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,
}

/// Runs the publish command.
///
/// # Errors
///
/// Returns an error when the workspace cannot be listed, the repository
/// rejects the upload, or a file cannot be read.
pub async fn run(args: &PublishArgs) -> Result<()> {
    let config = args.server.to_config()?;
    let client = RepositoryClient::new(config).context("Failed to create repository client")?;

    let repo = client
        .repository_details(&args.repository)
        .await
        .context("Failed to fetch repository details")?;

    let files = list_workspace_files(&args.workspace, &args.includes, args.excludes.as_deref())?;
    if files.is_empty() {
        println!("No files matched the include patterns; nothing to upload");
        return Ok(());
    }

    info!(
        repository = %args.repository,
        group = %args.group,
        artifact = %args.artifact,
        version = %args.version,
        files = files.len(),
        "Publishing component"
    );

    let req = UploadComponentReq {
        group: args.group.clone(),
        artifact_id: args.artifact.clone(),
        version: args.version.clone(),
        generate_pom: args.generate_pom,
        packaging: args.packaging.clone(),
        files,
    };
    client.upload_component(&repo, &req).await?;

    for file in &req.files {
        println!("Uploaded {}", file.path.display());
    }
    Ok(())
}

/// Lists workspace files matching the include patterns and not matching
/// the exclude patterns. Patterns apply to workspace-relative paths
/// with `/` separators.
fn list_workspace_files(
    workspace: &Path,
    includes: &str,
    excludes: Option<&str>,
) -> Result<Vec<FileUpload>> {
    let includes = compile_patterns(includes)?;
    let excludes = excludes.map(compile_patterns).transpose()?.unwrap_or_default();

    let mut files = Vec::new();
    for entry in WalkDir::new(workspace).sort_by_file_name() {
        let entry = entry.context("Failed to walk workspace")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(workspace)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        if includes.iter().any(|p| p.matches(&relative))
            && !excludes.iter().any(|p| p.matches(&relative))
        {
            files.push(FileUpload::new(entry.path()));
        }
    }
    Ok(files)
}

fn compile_patterns(patterns: &str) -> Result<Vec<GlobFilter>> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| GlobFilter::new(p).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_workspace_files_include_exclude() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/app.jar"), b"jar").unwrap();
        fs::write(dir.path().join("target/app.txt"), b"txt").unwrap();
        fs::write(dir.path().join("README.md"), b"readme").unwrap();

        let files = list_workspace_files(dir.path(), "target/*.jar", None).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), Some("app.jar"));

        let files = list_workspace_files(dir.path(), "target/*", Some("*.txt")).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), Some("app.jar"));
    }

    #[test]
    fn test_list_workspace_files_no_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), b"readme").unwrap();
        let files = list_workspace_files(dir.path(), "dist/*", None).unwrap();
        assert!(files.is_empty());
    }
}
