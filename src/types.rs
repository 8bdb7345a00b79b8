//! Core data types used throughout tfscout.
//!
//! This module defines the fundamental data structures for representing:
//! - Declarations extracted from a single Terraform file
//! - Root-module project descriptors
//! - Report formats

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Public Terraform registry used for documentation links.
pub const REGISTRY_URL: &str = "https://registry.terraform.io";

/// Represents a `module` block found by the structural scanner.
///
/// # Example HCL
///
/// ```hcl
/// module "vpc" {
///   source  = "terraform-aws-modules/vpc/aws"
///   version = "~> 5.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// The label of the module block (e.g., "vpc")
    pub name: String,

    /// The `source` attribute, or `"unknown"` when absent
    pub source: String,

    /// Classification of `source`
    pub source_type: SourceType,

    /// The `version` attribute, if present
    pub version: Option<String>,

    /// 1-based line of the `module` keyword
    pub line: usize,
}

impl ModuleDeclaration {
    /// Registry page for registry-sourced modules.
    #[must_use]
    pub fn registry_url(&self) -> Option<String> {
        (self.source_type == SourceType::Registry)
            .then(|| format!("{REGISTRY_URL}/modules/{}", self.source))
    }
}

/// Where a module's code comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// `./path` or `../path`
    Local,
    /// `git::...` or `*.git`
    Git,
    /// `github.com/owner/repo`
    #[serde(rename = "github")]
    GitHub,
    /// `namespace/name/provider` or `app.terraform.io/...`
    Registry,
    /// Plain `http://` or `https://` archive
    Http,
    /// Anything else
    Unknown,
}

impl SourceType {
    /// Lowercase label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Git => "git",
            Self::GitHub => "github",
            Self::Registry => "registry",
            Self::Http => "http",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A provider requirement or configuration found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDeclaration {
    /// Local provider name (e.g., "aws")
    pub name: String,

    /// Source address, `hashicorp/<name>` when unspecified
    pub source: String,

    /// Version constraint, `latest` when unspecified
    pub version: String,
}

impl ProviderDeclaration {
    /// Registry documentation page for this provider.
    #[must_use]
    pub fn docs_url(&self) -> String {
        if self.source.starts_with("hashicorp/") {
            format!("{REGISTRY_URL}/providers/{}/latest/docs", self.source)
        } else {
            format!("{REGISTRY_URL}/providers/{}", self.source)
        }
    }
}

/// A `resource "<type>" "<name>"` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
    /// Resource type (e.g., "aws_instance")
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource name (e.g., "web")
    pub name: String,

    /// 1-based line of the `resource` keyword
    pub line: usize,
}

impl ResourceDeclaration {
    /// Terraform address, `type.name`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

/// Declarations extracted from one file's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Module blocks in source order
    pub modules: Vec<ModuleDeclaration>,

    /// Providers, `required_providers` entries first
    pub providers: Vec<ProviderDeclaration>,

    /// Resource headers in source order
    pub resources: Vec<ResourceDeclaration>,
}

impl ScanResult {
    /// Whether nothing was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.providers.is_empty() && self.resources.is_empty()
    }

    /// Resources grouped by type, types in sorted order.
    #[must_use]
    pub fn resources_by_type(&self) -> BTreeMap<&str, Vec<&ResourceDeclaration>> {
        let mut grouped: BTreeMap<&str, Vec<&ResourceDeclaration>> = BTreeMap::new();
        for resource in &self.resources {
            grouped
                .entry(resource.resource_type.as_str())
                .or_default()
                .push(resource);
        }
        grouped
    }
}

/// One installed module recorded in `.terraform/modules/modules.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ChildModule {
    /// Module key (empty for the root module itself)
    pub key: String,

    /// Source address as written in configuration
    pub source: String,

    /// Resolved version for registry modules
    pub version: Option<String>,

    /// Install directory, relative to the root module
    pub dir: String,
}

/// A Terraform root module and the metadata gathered about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Absolute root directory; the cache key
    pub root_path: PathBuf,

    /// Last path segment of `root_path`
    pub name: String,

    /// From `terraform.tfstate`, else `required_version`
    pub terraform_version: Option<String>,

    /// Backend type from `terraform { backend "<type>" {} }`
    pub backend: Option<String>,

    /// Installed child modules
    pub modules: Vec<ChildModule>,
}

impl ProjectDescriptor {
    /// Create an empty descriptor for `root_path`.
    #[must_use]
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path.to_string_lossy().into_owned());
        Self {
            root_path,
            name,
            terraform_version: None,
            backend: None,
            modules: Vec::new(),
        }
    }

    /// Whether `terraform init` has run (a `.terraform` directory exists).
    #[must_use]
    pub fn initialized(&self) -> bool {
        self.root_path.join(".terraform").exists()
    }

    /// `*.tf` files directly in the root, sorted.
    #[must_use]
    pub fn tf_files(&self) -> Vec<PathBuf> {
        tf_files_in(&self.root_path)
    }

    /// The file to open when switching to this project.
    #[must_use]
    pub fn primary_file(&self) -> Option<PathBuf> {
        self.tf_files().into_iter().next()
    }

    /// Summary for status displays.
    #[must_use]
    pub fn info(&self) -> ProjectInfo {
        ProjectInfo {
            name: self.name.clone(),
            path: self.root_path.clone(),
            initialized: self.initialized(),
            terraform_version: self.terraform_version.clone(),
            backend: self.backend.clone(),
            module_count: self.modules.len(),
        }
    }
}

/// Project status summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name
    pub name: String,
    /// Root directory
    pub path: PathBuf,
    /// Whether `.terraform` exists
    pub initialized: bool,
    /// Declared or recorded Terraform version
    pub terraform_version: Option<String>,
    /// Backend type
    pub backend: Option<String>,
    /// Number of installed child modules
    pub module_count: usize,
}

/// List the `*.tf` files directly inside `dir`, sorted by path.
///
/// Unreadable directories yield an empty list.
#[must_use]
pub fn tf_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "tf"))
        .collect();
    files.sort();
    files
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}
