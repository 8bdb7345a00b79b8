//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::{FileScan, ReportGenerator, Sections};
use crate::types::{ModuleDeclaration, ProjectInfo, ProviderDeclaration, ResourceDeclaration};
use serde::Serialize;
use std::path::Path;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };

        json.map_err(|e| {
            crate::err!(ReportGeneration {
                message: format!("Failed to serialize JSON report: {e}"),
            })
        })
    }
}

impl ReportGenerator for JsonReporter {
    fn scan(&self, files: &[FileScan], sections: Sections) -> Result<String> {
        self.render(&ScanReport::new(files, sections))
    }

    fn status(&self, info: &ProjectInfo) -> Result<String> {
        self.render(info)
    }

    fn projects(&self, projects: &[ProjectInfo]) -> Result<String> {
        self.render(&ProjectsReport {
            version: env!("CARGO_PKG_VERSION"),
            total: projects.len(),
            projects,
        })
    }
}

/// JSON scan report structure.
#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    version: &'static str,
    summary: ScanSummary,
    files: Vec<JsonFile<'a>>,
}

impl<'a> ScanReport<'a> {
    fn new(files: &'a [FileScan], sections: Sections) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            summary: ScanSummary {
                files: files.len(),
                modules: files.iter().map(|f| f.result.modules.len()).sum(),
                providers: files.iter().map(|f| f.result.providers.len()).sum(),
                resources: files.iter().map(|f| f.result.resources.len()).sum(),
            },
            files: files
                .iter()
                .map(|file| JsonFile {
                    path: &file.path,
                    modules: sections.modules.then_some(&file.result.modules),
                    providers: sections.providers.then_some(&file.result.providers),
                    resources: sections.resources.then_some(&file.result.resources),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScanSummary {
    files: usize,
    modules: usize,
    providers: usize,
    resources: usize,
}

#[derive(Debug, Serialize)]
struct JsonFile<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<&'a Vec<ModuleDeclaration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    providers: Option<&'a Vec<ProviderDeclaration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<&'a Vec<ResourceDeclaration>>,
}

#[derive(Debug, Serialize)]
struct ProjectsReport<'a> {
    version: &'static str,
    total: usize,
    projects: &'a [ProjectInfo],
}
