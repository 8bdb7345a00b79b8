//! Root-module detection.

use crate::config::ProjectOptions;
use crate::err;
use crate::error::Result;
use crate::types::tf_files_in;
use std::path::{Path, PathBuf};

/// Direct children whose presence marks a root module.
pub const ROOT_INDICATORS: &[&str] = &[
    ".terraform",
    "terraform.tfstate",
    ".terraform.lock.hcl",
    "terragrunt.hcl",
];

/// Whether `dir` looks like a root module.
///
/// True when any of [`ROOT_INDICATORS`] exists in `dir`, or when a `*.tf`
/// file directly inside contains both `backend` and `terraform {`.
#[must_use]
pub fn is_root_module(dir: &Path) -> bool {
    if let Some(indicator) = ROOT_INDICATORS
        .iter()
        .find(|name| dir.join(name).exists())
    {
        tracing::trace!(dir = %dir.display(), indicator = *indicator, "Root indicator found");
        return true;
    }

    tf_files_in(dir).iter().any(|file| match std::fs::read_to_string(file) {
        Ok(content) => {
            let declares_backend = content.contains("backend") && content.contains("terraform {");
            if declares_backend {
                tracing::trace!(file = %file.display(), "Backend configuration found");
            }
            declares_backend
        }
        Err(e) => {
            tracing::debug!(file = %file.display(), error = %e, "Skipping unreadable file");
            false
        }
    })
}

/// Find the root module directory for `path`.
///
/// Configured root modules win. Otherwise the walk goes upward from the
/// path's directory (or the path itself when it is a directory), skipping
/// directories with an excluded suffix, and stops at the first root module.
/// Without one, the starting directory is returned.
///
/// # Errors
///
/// Returns `InvalidPath` when `path` is relative or has no parent.
pub fn resolve_project_root(path: &Path, options: &ProjectOptions) -> Result<PathBuf> {
    if !path.is_absolute() {
        return Err(err!(InvalidPath {
            path: path.to_path_buf(),
            message: "path must be absolute".to_string(),
        }));
    }

    if let Some(root) = options
        .root_modules
        .iter()
        .find(|root| options.path_matching.contains(root, path))
    {
        tracing::debug!(path = %path.display(), root = %root.display(), "Matched configured root module");
        return Ok(root.clone());
    }

    let start = if path.is_dir() {
        path
    } else {
        path.parent().ok_or_else(|| {
            err!(InvalidPath {
                path: path.to_path_buf(),
                message: "path has no parent directory".to_string(),
            })
        })?
    };

    for dir in start.ancestors() {
        if is_excluded(dir, &options.exclude_root_modules) {
            tracing::debug!(dir = %dir.display(), "Directory excluded from root detection");
            continue;
        }
        if is_root_module(dir) {
            tracing::debug!(path = %path.display(), root = %dir.display(), "Resolved project root");
            return Ok(dir.to_path_buf());
        }
    }

    tracing::debug!(path = %path.display(), root = %start.display(), "No root indicators, using file directory");
    Ok(start.to_path_buf())
}

fn is_excluded(dir: &Path, suffixes: &[String]) -> bool {
    let dir = dir.to_string_lossy();
    suffixes.iter().any(|suffix| dir.ends_with(suffix.as_str()))
}
