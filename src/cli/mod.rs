//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `scan`: List the modules, providers and resources declared in files
//! - `root`: Print the root module directory for a path
//! - `status`: Show the project a path belongs to
//! - `projects`: Discover every root module under some folders
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Scan files
//! tfscout scan live/prod/main.tf live/prod/versions.tf
//!
//! # Only providers, as JSON
//! tfscout scan live/prod/versions.tf --providers --format json
//!
//! # Resolve the project root of a file
//! tfscout root live/prod/network/vpc.tf
//!
//! # List every project in a workspace
//! tfscout projects ./infra --format json
//!
//! # Initialize configuration
//! tfscout init
//! ```

use crate::config::PathMatching;
use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tfscout - Terraform/OpenTofu structural scanner and project resolver.
#[derive(Parser, Debug)]
#[command(
    name = "tfscout",
    author,
    version,
    about = "Terraform/OpenTofu structural scanner and project resolver",
    long_about = "tfscout extracts module, provider and resource declarations from \
                  Terraform files without a full HCL parse, and maps files to the root \
                  module (project) they belong to."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TFSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory always treated as a root module (repeatable)
    #[arg(long = "root-module", value_name = "DIR", global = true)]
    pub root_modules: Vec<PathBuf>,

    /// Directory suffix never treated as a root module (repeatable)
    #[arg(long = "exclude-root-module", value_name = "SUFFIX", global = true)]
    pub exclude_root_modules: Vec<String>,

    /// How root directories are matched against paths
    #[arg(long, value_enum, global = true)]
    pub path_matching: Option<PathMatching>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List declarations found in Terraform files
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Print the root module directory for a path
    #[command(visible_alias = "r")]
    Root(PathArgs),

    /// Show the project a path belongs to
    Status(StatusArgs),

    /// Discover and list every root module under the given folders
    #[command(visible_alias = "p")]
    Projects(ProjectsArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the scan command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Terraform files to scan
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Show module blocks
    #[arg(long)]
    pub modules: bool,

    /// Show providers
    #[arg(long)]
    pub providers: bool,

    /// Show resources
    #[arg(long)]
    pub resources: bool,

    /// Continue with the remaining files when one cannot be read
    #[arg(long)]
    pub continue_on_error: bool,
}

/// A single path argument.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// File or directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// File or directory inside the project
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,
}

/// Arguments for the projects command.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Workspace folders to search
    #[arg(value_name = "FOLDER", required = true)]
    pub folders: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "tfscout.yaml")]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_command() {
        let cli = Cli::parse_from(["tfscout", "scan", "main.tf", "versions.tf"]);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.files[0], PathBuf::from("main.tf"));
                assert_eq!(args.format, ReportFormat::Text);
                assert!(!args.modules && !args.providers && !args.resources);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_scan_with_options() {
        let cli = Cli::parse_from([
            "tfscout",
            "scan",
            "main.tf",
            "--format",
            "json",
            "--providers",
            "--continue-on-error",
        ]);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.format, ReportFormat::Json);
                assert!(args.providers);
                assert!(args.continue_on_error);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_scan_requires_files() {
        assert!(Cli::try_parse_from(["tfscout", "scan"]).is_err());
    }

    #[test]
    fn test_root_and_status_commands() {
        let cli = Cli::parse_from(["tfscout", "root", "/w/live/main.tf"]);
        assert!(matches!(cli.command, Commands::Root(ref a) if a.path == PathBuf::from("/w/live/main.tf")));

        let cli = Cli::parse_from(["tfscout", "status", "/w/live", "-f", "json"]);
        match cli.command {
            Commands::Status(args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_projects_command() {
        let cli = Cli::parse_from(["tfscout", "projects", "/w/a", "/w/b"]);
        match cli.command {
            Commands::Projects(args) => assert_eq!(args.folders.len(), 2),
            _ => panic!("Expected Projects command"),
        }
    }

    #[test]
    fn test_init_command() {
        let cli = Cli::parse_from(["tfscout", "init"]);
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["tfscout", "validate", "custom.yaml"]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.file, PathBuf::from("custom.yaml"));
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_validate_file_is_not_global_config() {
        let cli = Cli::parse_from(["tfscout", "validate", "other.yaml"]);
        assert_eq!(cli.config, None);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.file, PathBuf::from("other.yaml")),
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from([
            "tfscout",
            "-vvv",
            "--config",
            "custom.yaml",
            "root",
            "/w/main.tf",
            "--root-module",
            "/w/live",
            "--exclude-root-module",
            "/modules",
            "--path-matching",
            "prefix",
        ]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert_eq!(cli.root_modules, vec![PathBuf::from("/w/live")]);
        assert_eq!(cli.exclude_root_modules, vec!["/modules".to_string()]);
        assert_eq!(cli.path_matching, Some(PathMatching::Prefix));
    }

    #[test]
    fn test_alias() {
        let cli = Cli::parse_from(["tfscout", "s", "main.tf"]);
        assert!(matches!(cli.command, Commands::Scan(_)));
    }
}
