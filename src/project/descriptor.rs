//! Building [`ProjectDescriptor`]s from a root module directory.
//!
//! Three sources are combined, in this order:
//!
//! 1. `terraform.tfstate` for `terraform_version`
//! 2. `.terraform/modules/modules.json` for installed child modules
//! 3. the `terraform { ... }` blocks of each `*.tf` file in the root
//!
//! Values from an earlier source are never overwritten by a later one.
//! Missing or unparseable metadata files leave the fields at their defaults.

use crate::err;
use crate::error::Result;
use crate::scanner::find_terraform_settings;
use crate::types::{tf_files_in, ChildModule, ProjectDescriptor};
use serde::Deserialize;
use std::path::Path;

/// State file read for the recorded Terraform version.
pub const STATE_FILE: &str = "terraform.tfstate";

/// Module manifest written by `terraform init`, relative to the root.
pub const MODULES_MANIFEST: &str = ".terraform/modules/modules.json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StateFile {
    terraform_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModulesManifest {
    #[serde(rename = "Modules")]
    modules: Vec<ChildModule>,
}

/// Build the descriptor for the root module at `root`.
///
/// # Errors
///
/// Returns `DirectoryNotFound` if `root` is not an existing directory.
pub fn build_descriptor(root: &Path) -> Result<ProjectDescriptor> {
    if !root.is_dir() {
        return Err(err!(DirectoryNotFound {
            path: root.to_path_buf(),
        }));
    }

    let mut descriptor = ProjectDescriptor::new(root);

    if let Some(state) = read_json::<StateFile>(&root.join(STATE_FILE)) {
        descriptor.terraform_version = state.terraform_version;
    }

    if let Some(manifest) = read_json::<ModulesManifest>(&root.join(MODULES_MANIFEST)) {
        descriptor.modules = manifest.modules;
    }

    for file in tf_files_in(root) {
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(file = %file.display(), error = %e, "Skipping unreadable file");
                continue;
            }
        };
        let settings = find_terraform_settings(&content);
        if descriptor.terraform_version.is_none() {
            descriptor.terraform_version = settings.required_version;
        }
        if descriptor.backend.is_none() {
            descriptor.backend = settings.backend;
        }
    }

    tracing::debug!(
        root = %root.display(),
        terraform_version = descriptor.terraform_version.as_deref().unwrap_or("-"),
        backend = descriptor.backend.as_deref().unwrap_or("-"),
        modules = descriptor.modules.len(),
        "Built project descriptor"
    );

    Ok(descriptor)
}

/// Read and deserialize a JSON file; `None` when missing or invalid.
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "Failed to read metadata file");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "Ignoring invalid JSON");
            None
        }
    }
}
