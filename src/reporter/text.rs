//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::{FileScan, ReportGenerator, Sections};
use crate::types::{ProjectInfo, ScanResult, SourceType};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn scan(&self, files: &[FileScan], sections: Sections) -> Result<String> {
        let mut output = String::new();

        for file in files {
            output.push_str(&self.section_title(&file.path.display().to_string()));

            if file.result.is_empty() {
                output.push_str(&self.dim("  no declarations found"));
                output.push('\n');
                continue;
            }

            if sections.modules && !file.result.modules.is_empty() {
                output.push_str(&self.format_modules(&file.result));
            }
            if sections.providers && !file.result.providers.is_empty() {
                output.push_str(&self.format_providers(&file.result));
            }
            if sections.resources && !file.result.resources.is_empty() {
                output.push_str(&self.format_resources(&file.result));
            }
        }

        output.push_str(&self.format_scan_footer(files));
        Ok(output)
    }

    fn status(&self, info: &ProjectInfo) -> Result<String> {
        let mut output = self.section_title(&format!("Project {}", info.name));

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let initialized = if info.initialized { "yes" } else { "no" };
        let initialized_cell = match (self.use_colors, info.initialized) {
            (true, true) => Cell::new(initialized).fg(Color::Green),
            (true, false) => Cell::new(initialized).fg(Color::Yellow),
            (false, _) => Cell::new(initialized),
        };

        table.add_row(vec![Cell::new("Root"), Cell::new(info.path.display())]);
        table.add_row(vec![Cell::new("Initialized"), initialized_cell]);
        table.add_row(vec![
            Cell::new("Terraform"),
            Cell::new(info.terraform_version.as_deref().unwrap_or("-")),
        ]);
        table.add_row(vec![
            Cell::new("Backend"),
            Cell::new(info.backend.as_deref().unwrap_or("-")),
        ]);
        table.add_row(vec![Cell::new("Modules"), Cell::new(info.module_count)]);

        output.push_str(&table.to_string());
        output.push('\n');
        Ok(output)
    }

    fn projects(&self, projects: &[ProjectInfo]) -> Result<String> {
        let mut output = self.section_title("Projects");

        if projects.is_empty() {
            output.push_str(&self.dim("  no root modules found"));
            output.push('\n');
            return Ok(output);
        }

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Name", "Backend", "Terraform", "Modules", "Path"]);

        for project in projects {
            table.add_row(vec![
                Cell::new(&project.name),
                Cell::new(project.backend.as_deref().unwrap_or("-")),
                Cell::new(project.terraform_version.as_deref().unwrap_or("-")),
                Cell::new(project.module_count),
                Cell::new(project.path.display()),
            ]);
        }

        output.push_str(&table.to_string());
        output.push_str(&format!("\n\n  {} project(s)\n", projects.len()));
        Ok(output)
    }
}

impl TextReporter {
    fn section_title(&self, title: &str) -> String {
        let title = if self.use_colors {
            title.bright_cyan().bold().to_string()
        } else {
            title.to_string()
        };
        format!("\n{title}\n{}\n", "-".repeat(80))
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format the modules table.
    fn format_modules(&self, result: &ScanResult) -> String {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Module", "Source", "Type", "Version", "Line"]);

        for module in &result.modules {
            let version_cell = match (&module.version, self.use_colors) {
                (Some(version), true) => Cell::new(version).fg(Color::Green),
                (Some(version), false) => Cell::new(version),
                // only registry sources take a version
                (None, true) if module.source_type == SourceType::Registry => {
                    Cell::new("-").fg(Color::Yellow)
                }
                (None, _) => Cell::new("-"),
            };

            table.add_row(vec![
                Cell::new(&module.name),
                Cell::new(truncate(&module.source, 60)),
                Cell::new(module.source_type),
                version_cell,
                Cell::new(module.line),
            ]);
        }

        format!("{table}\n")
    }

    /// Format the providers table.
    fn format_providers(&self, result: &ScanResult) -> String {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Provider", "Source", "Version"]);

        for provider in &result.providers {
            table.add_row(vec![
                Cell::new(&provider.name),
                Cell::new(&provider.source),
                Cell::new(&provider.version),
            ]);
        }

        format!("{table}\n")
    }

    /// Format resources grouped by type.
    fn format_resources(&self, result: &ScanResult) -> String {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Resource", "Line"]);

        for resources in result.resources_by_type().values() {
            for resource in resources {
                table.add_row(vec![Cell::new(resource.address()), Cell::new(resource.line)]);
            }
        }

        format!("{table}\n")
    }

    fn format_scan_footer(&self, files: &[FileScan]) -> String {
        let modules: usize = files.iter().map(|f| f.result.modules.len()).sum();
        let providers: usize = files.iter().map(|f| f.result.providers.len()).sum();
        let resources: usize = files.iter().map(|f| f.result.resources.len()).sum();

        let summary = format!(
            "{} files | {modules} modules | {providers} providers | {resources} resources",
            files.len()
        );
        format!("\n  {}\n", self.dim(&summary))
    }
}

/// Truncate a string to a maximum length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
