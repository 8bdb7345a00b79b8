//! Structural scanning of Terraform/OpenTofu files.
//!
//! The scanner extracts declarations from raw text without a full HCL parse,
//! so half-written files in an editor still produce useful results.
//!
//! # Supported Constructs
//!
//! - `module "<name>" { ... }` blocks with `source` and `version`
//! - `terraform { required_providers { ... } }` entries
//! - bare `provider "<name>"` blocks
//! - `resource "<type>" "<name>"` headers
//! - `terraform { required_version, backend }` settings
//!
//! # Example
//!
//! ```rust
//! use tfscout::scanner::scan;
//! use tfscout::types::SourceType;
//!
//! let result = scan(r#"module "vpc" { source = "./modules/vpc" }"#);
//! assert_eq!(result.modules[0].source_type, SourceType::Local);
//! ```

mod blocks;
mod source;

pub use blocks::{line_of, matching_brace};
pub use source::classify_source;

use crate::error::{Result, TfScoutError};
use crate::types::{ModuleDeclaration, ProviderDeclaration, ResourceDeclaration, ScanResult};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Literal used when a module block has no `source`.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Version reported for providers without a constraint.
pub const LATEST_VERSION: &str = "latest";

static MODULE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bmodule\s+"([^"]+)"\s*\{"#).expect("Invalid regex"));

static REQUIRED_PROVIDERS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brequired_providers\s*\{").expect("Invalid regex"));

static PROVIDER_ENTRY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_][\w-]*)\s*=\s*\{").expect("Invalid regex"));

static PROVIDER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bprovider\s+"([^"]+)""#).expect("Invalid regex"));

static RESOURCE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bresource\s+"([^"]+)"\s+"([^"]+)""#).expect("Invalid regex")
});

static TERRAFORM_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bterraform\s*\{").expect("Invalid regex"));

static SOURCE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bsource\s*=\s*"([^"]+)""#).expect("Invalid regex"));

static VERSION_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bversion\s*=\s*"([^"]+)""#).expect("Invalid regex"));

static REQUIRED_VERSION_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\brequired_version\s*=\s*"([^"]+)""#).expect("Invalid regex"));

static BACKEND_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bbackend\s+"([^"]+)""#).expect("Invalid regex"));

/// Settings declared in `terraform { ... }` blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerraformSettings {
    /// First `required_version` found
    pub required_version: Option<String>,
    /// First `backend "<type>"` found
    pub backend: Option<String>,
}

/// Extract modules, providers and resources from a file's text.
///
/// Never fails: text that does not look like HCL yields empty lists.
#[must_use]
pub fn scan(text: &str) -> ScanResult {
    ScanResult {
        modules: find_modules(text),
        providers: find_providers(text),
        resources: find_resources(text),
    }
}

/// Read a file and scan it.
///
/// # Errors
///
/// Returns an `Io` error if the file cannot be read.
pub fn scan_file(path: &Path) -> Result<ScanResult> {
    let content =
        std::fs::read_to_string(path).map_err(|e| TfScoutError::io(path, e, file!(), line!()))?;
    let result = scan(&content);
    tracing::debug!(
        file = %path.display(),
        modules = result.modules.len(),
        providers = result.providers.len(),
        resources = result.resources.len(),
        "Scanned file"
    );
    Ok(result)
}

/// All `module` blocks, in source order.
#[must_use]
pub fn find_modules(text: &str) -> Vec<ModuleDeclaration> {
    blocks::blocks(text, &MODULE_HEADER)
        .map(|block| {
            let source = first_capture(&SOURCE_ATTR, block.body)
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string();
            ModuleDeclaration {
                name: block.captures[1].to_string(),
                source_type: classify_source(&source),
                version: first_capture(&VERSION_ATTR, block.body).map(String::from),
                source,
                line: line_of(text, block.start),
            }
        })
        .collect()
}

/// Providers from the first `required_providers` block, then from bare
/// `provider` blocks whose name was not already seen.
#[must_use]
pub fn find_providers(text: &str) -> Vec<ProviderDeclaration> {
    let mut providers: Vec<ProviderDeclaration> = Vec::new();

    if let Some(required) = blocks::first_block(text, &REQUIRED_PROVIDERS_HEADER, 0) {
        let body = required.body;
        let mut from = 0;
        while let Some(entry) = blocks::first_block(body, &PROVIDER_ENTRY_HEADER, from) {
            let name = entry.captures[1].to_string();
            providers.push(ProviderDeclaration {
                source: first_capture(&SOURCE_ATTR, entry.body)
                    .map_or_else(|| default_provider_source(&name), String::from),
                version: first_capture(&VERSION_ATTR, entry.body)
                    .unwrap_or(LATEST_VERSION)
                    .to_string(),
                name,
            });
            from = entry.end;
        }
    }

    for caps in PROVIDER_HEADER.captures_iter(text) {
        let name = &caps[1];
        if providers.iter().any(|p| p.name == name) {
            continue;
        }
        providers.push(ProviderDeclaration {
            name: name.to_string(),
            source: default_provider_source(name),
            version: LATEST_VERSION.to_string(),
        });
    }

    providers
}

/// All `resource` headers, in source order. Duplicates are kept.
#[must_use]
pub fn find_resources(text: &str) -> Vec<ResourceDeclaration> {
    RESOURCE_HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(ResourceDeclaration {
                resource_type: caps[1].to_string(),
                name: caps[2].to_string(),
                line: line_of(text, whole.start()),
            })
        })
        .collect()
}

/// `required_version` and backend type from the `terraform` blocks of a file.
#[must_use]
pub fn find_terraform_settings(text: &str) -> TerraformSettings {
    let mut settings = TerraformSettings::default();
    for block in blocks::blocks(text, &TERRAFORM_HEADER) {
        if settings.required_version.is_none() {
            settings.required_version =
                first_capture(&REQUIRED_VERSION_ATTR, block.body).map(String::from);
        }
        if settings.backend.is_none() {
            settings.backend = first_capture(&BACKEND_HEADER, block.body).map(String::from);
        }
        if settings.required_version.is_some() && settings.backend.is_some() {
            break;
        }
    }
    settings
}

fn default_provider_source(name: &str) -> String {
    format!("hashicorp/{name}")
}

fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
