//! Configuration module for tfscout.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`tfscout.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # tfscout.yaml
//!
//! # Project detection options
//! project:
//!   root_modules:
//!     - /work/infra/live/prod
//!   exclude_root_modules:
//!     - /modules
//!   ignore_directory_names:
//!     - .terraform
//!     - terraform.tfstate.d
//!     - .terragrunt-cache
//!   path_matching: segment
//!
//! # Output options
//! output:
//!   colored: true
//!   pretty: true
//! ```

use crate::err;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Directory names pruned while refreshing projects.
pub const DEFAULT_IGNORE_DIRECTORY_NAMES: &[&str] =
    &[".terraform", "terraform.tfstate.d", ".terragrunt-cache"];

/// Configuration file names looked up in the current directory.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["tfscout.yaml", "tfscout.yml", ".tfscout.yaml"];

static BRACED_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex"));

static BARE_VAR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid regex"));

/// How a configured or cached root is compared against a file path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PathMatching {
    /// Component-wise: `/a/b` contains `/a/b/c.tf` but not `/a/bc/c.tf`.
    #[default]
    Segment,
    /// Raw string prefix: `/a/b` also contains `/a/bc/c.tf`.
    Prefix,
}

impl PathMatching {
    /// Whether `path` lies under `root` according to this policy.
    #[must_use]
    pub fn contains(self, root: &Path, path: &Path) -> bool {
        match self {
            Self::Segment => path.starts_with(root),
            Self::Prefix => path
                .to_string_lossy()
                .starts_with(root.to_string_lossy().as_ref()),
        }
    }
}

/// Project detection options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectOptions {
    /// Directories always treated as root modules for files beneath them.
    pub root_modules: Vec<PathBuf>,

    /// Directory suffixes that are never recognized as root modules.
    pub exclude_root_modules: Vec<String>,

    /// Directory names pruned while refreshing projects.
    pub ignore_directory_names: Vec<String>,

    /// Prefix comparison policy for root modules and cache lookups.
    pub path_matching: PathMatching,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            root_modules: Vec::new(),
            exclude_root_modules: Vec::new(),
            ignore_directory_names: DEFAULT_IGNORE_DIRECTORY_NAMES
                .iter()
                .map(ToString::to_string)
                .collect(),
            path_matching: PathMatching::default(),
        }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            pretty: true,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Project detection options
    pub project: ProjectOptions,

    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or fails validation.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Self = serde_yaml::from_str(&expanded).map_err(|e| {
            crate::error::TfScoutError::config_parse(
                e.to_string(),
                Some(Box::new(e)),
                file!(),
                line!(),
            )
        })?;
        config.validate()?;

        tracing::debug!(
            root_modules = config.project.root_modules.len(),
            exclude_root_modules = config.project.exclude_root_modules.len(),
            path_matching = ?config.project.path_matching,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::TfScoutError::io(path, e, file!(), line!()))?;
        Self::from_yaml(&content)
    }

    /// Check the configuration for values the resolver cannot use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` for relative or empty root modules and empty
    /// exclude or ignore entries.
    pub fn validate(&self) -> Result<()> {
        for root in &self.project.root_modules {
            if root.as_os_str().is_empty() || !root.is_absolute() {
                return Err(err!(ConfigValue {
                    key: "project.root_modules".to_string(),
                    message: format!("root module '{}' must be an absolute path", root.display()),
                }));
            }
        }
        if self.project.exclude_root_modules.iter().any(String::is_empty) {
            return Err(err!(ConfigValue {
                key: "project.exclude_root_modules".to_string(),
                message: "entries must not be empty".to_string(),
            }));
        }
        if self.project.ignore_directory_names.iter().any(String::is_empty) {
            return Err(err!(ConfigValue {
                key: "project.ignore_directory_names".to_string(),
                message: "entries must not be empty".to_string(),
            }));
        }
        Ok(())
    }

    /// Per-user configuration file, e.g. `~/.config/tfscout/config.yaml`.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tfscout").join("config.yaml"))
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# tfscout Configuration File

# Project detection options
project:
  # Directories always treated as root modules for files beneath them
  root_modules: []
  #  - /work/infra/live/prod

  # Directory suffixes never recognized as root modules
  exclude_root_modules: []
  #  - /modules

  # Directory names skipped when refreshing projects
  ignore_directory_names:
    - .terraform
    - terraform.tfstate.d
    - .terragrunt-cache

  # How root modules are matched against file paths:
  #   segment - whole path components only (default)
  #   prefix  - raw string prefix
  path_matching: segment

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Pretty-print JSON output
  pretty: true
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::Cli) {
        self.project
            .root_modules
            .extend(args.root_modules.iter().cloned());
        self.project
            .exclude_root_modules
            .extend(args.exclude_root_modules.iter().cloned());
        if let Some(matching) = args.path_matching {
            self.project.path_matching = matching;
        }
        if args.no_color {
            self.output.colored = false;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unset variables are left untouched.
fn expand_env_vars(content: &str) -> String {
    let braced = BRACED_VAR.replace_all(content, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    BARE_VAR
        .replace_all(&braced, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
