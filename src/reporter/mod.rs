//! Report generation module.
//!
//! Scan results and project summaries are rendered as:
//! - Text: human-readable tables for the terminal
//! - JSON: machine-readable structured output
//!
//! # Example
//!
//! ```rust,no_run
//! use tfscout::reporter::{FileScan, Reporter, Sections};
//! use tfscout::{scan, Config, ReportFormat};
//!
//! let config = Config::default();
//! let reporter = Reporter::new(&config);
//! let files = vec![FileScan::new("main.tf", scan("module \"vpc\" { source = \"./vpc\" }"))];
//! let text = reporter.scan(&files, Sections::all(), ReportFormat::Text).unwrap();
//! println!("{text}");
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ProjectInfo, ReportFormat, ScanResult};
use serde::Serialize;
use std::path::PathBuf;

pub use json::JsonReporter;
pub use text::TextReporter;

/// Scan result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    /// File that was scanned
    pub path: PathBuf,
    /// Declarations found in it
    #[serde(flatten)]
    pub result: ScanResult,
}

impl FileScan {
    /// Pair a path with its scan result.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, result: ScanResult) -> Self {
        Self {
            path: path.into(),
            result,
        }
    }
}

/// Which declaration lists a scan report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    /// Module blocks
    pub modules: bool,
    /// Provider requirements and configurations
    pub providers: bool,
    /// Resource headers
    pub resources: bool,
}

impl Sections {
    /// Every section.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            modules: true,
            providers: true,
            resources: true,
        }
    }

    /// Sections selected by CLI flags; no flag selects everything.
    #[must_use]
    pub const fn from_flags(modules: bool, providers: bool, resources: bool) -> Self {
        if !modules && !providers && !resources {
            Self::all()
        } else {
            Self {
                modules,
                providers,
                resources,
            }
        }
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::all()
    }
}

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Render per-file scan results.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn scan(&self, files: &[FileScan], sections: Sections, format: ReportFormat) -> Result<String> {
        self.generator(format).scan(files, sections)
    }

    /// Render one project's status.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn status(&self, info: &ProjectInfo, format: ReportFormat) -> Result<String> {
        self.generator(format).status(info)
    }

    /// Render a list of projects.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn projects(&self, projects: &[ProjectInfo], format: ReportFormat) -> Result<String> {
        self.generator(format).projects(projects)
    }

    fn generator(&self, format: ReportFormat) -> Box<dyn ReportGenerator> {
        match format {
            ReportFormat::Json => Box::new(JsonReporter::new(&self.config)),
            ReportFormat::Text => Box::new(TextReporter::new(&self.config)),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Render per-file scan results, limited to `sections`.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn scan(&self, files: &[FileScan], sections: Sections) -> Result<String>;

    /// Render one project's status.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn status(&self, info: &ProjectInfo) -> Result<String>;

    /// Render a list of projects.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn projects(&self, projects: &[ProjectInfo]) -> Result<String>;
}
