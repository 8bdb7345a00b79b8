//! # tfscout
//!
//! A Terraform/OpenTofu structural scanner and root-module project resolver.
//!
//! tfscout has two parts:
//!
//! - **Structural scanner** ([`scanner`]): extracts `module`, provider and
//!   `resource` declarations from a single file's text with regex headers and
//!   brace matching. It never fails; malformed input yields fewer results.
//! - **Project resolver** ([`project`]): maps any file path to the root module
//!   directory it belongs to, and caches one [`ProjectDescriptor`] per root
//!   built from the state file, the module manifest and `terraform {}` blocks.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfscout::{scan, Config, ProjectDetector};
//! use std::path::Path;
//!
//! fn main() -> tfscout::Result<()> {
//!     let result = scan(r#"module "vpc" { source = "./modules/vpc" }"#);
//!     println!("{} module(s)", result.modules.len());
//!
//!     let detector = ProjectDetector::new(&Config::default());
//!     let project = detector.detect(Path::new("/work/infra/live/prod/main.tf"))?;
//!     println!("project {} at {}", project.name, project.root_path.display());
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod project;
pub mod reporter;
pub mod scanner;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{Config, PathMatching};
pub use error::{Result, TfScoutError};
pub use project::ProjectDetector;
pub use scanner::{scan, scan_file};
pub use types::{
    ChildModule, ModuleDeclaration, ProjectDescriptor, ProjectInfo, ProviderDeclaration,
    ReportFormat, ResourceDeclaration, ScanResult, SourceType,
};
