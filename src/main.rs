//! tfscout CLI entry point.
//!
//! This binary provides the command-line interface for tfscout.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tfscout::cli::{Cli, Commands, ScanArgs};
use tfscout::config::DEFAULT_CONFIG_FILES;
use tfscout::reporter::{FileScan, Reporter, Sections};
use tfscout::{Config, ProjectDetector, TfScoutError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            let code = e
                .downcast_ref::<TfScoutError>()
                .map_or(1, TfScoutError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,tfscout={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let mut config = load_config(&cli)?;
    config.merge_cli_args(&cli);
    config.validate()?;
    tracing::debug!("Configuration loaded successfully");

    if !config.output.colored {
        colored::control::set_override(false);
    }

    let reporter = Reporter::new(&config);

    match cli.command {
        Commands::Scan(args) => {
            tracing::debug!(files = args.files.len(), "Executing scan command");
            let sections = Sections::from_flags(args.modules, args.providers, args.resources);
            let format = args.format;
            let (scans, skipped) = blocking(move || scan_files(&args)).await?;

            println!("{}", reporter.scan(&scans, sections, format)?);

            Ok(ExitCode::from(u8::from(skipped > 0)))
        }

        Commands::Root(args) => {
            let detector = ProjectDetector::new(&config);
            let path = absolute(&args.path)?;
            let root = blocking(move || detector.resolve_project_root(&path)).await?;
            println!("{}", root.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Status(args) => {
            let detector = ProjectDetector::new(&config);
            let path = absolute(&args.path)?;
            let project = blocking(move || detector.detect(&path)).await?;
            println!("{}", reporter.status(&project.info(), args.format)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Projects(args) => {
            let detector = Arc::new(ProjectDetector::new(&config));
            let folders = args
                .folders
                .iter()
                .map(PathBuf::as_path)
                .map(absolute)
                .collect::<anyhow::Result<Vec<_>>>()?;

            let projects = {
                let detector = Arc::clone(&detector);
                blocking(move || Ok(detector.refresh_all(&folders))).await?
            };
            let infos: Vec<_> = projects.iter().map(|p| p.info()).collect();

            println!("{}", reporter.projects(&infos, args.format)?);
            detector.dispose();
            Ok(ExitCode::SUCCESS)
        }

        Commands::Init => {
            let config_path = Path::new(DEFAULT_CONFIG_FILES[0]);

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            println!("Created example configuration: {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(args) => match Config::from_file(&args.file) {
            Ok(_) => {
                println!("Configuration is valid: {}", args.file.display());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("Configuration error: {e}");
                Ok(ExitCode::from(1))
            }
        },
    }
}

/// Scan every file in `args`; returns the scans and the number of skipped files.
fn scan_files(args: &ScanArgs) -> tfscout::Result<(Vec<FileScan>, usize)> {
    let mut scans = Vec::with_capacity(args.files.len());
    let mut skipped = 0;

    for path in &args.files {
        match tfscout::scan_file(path) {
            Ok(result) => scans.push(FileScan::new(path, result)),
            Err(e) if args.continue_on_error && e.is_recoverable() => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping file");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(scanned = scans.len(), skipped, "Scan complete");
    Ok((scans, skipped))
}

/// Run a resolver call on the blocking pool.
async fn blocking<T, F>(f: F) -> tfscout::Result<T>
where
    F: FnOnce() -> tfscout::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tfscout::err!(Internal {
            message: format!("Blocking task failed: {e}"),
        })
    })?
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        return Ok(Config::from_file(config_path)?);
    }

    tracing::debug!("Searching for default configuration files");
    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            tracing::debug!(path = %path.display(), "Found configuration file");
            return Ok(Config::from_file(path)?);
        }
    }

    if let Some(path) = Config::user_config_path().filter(|p| p.exists()) {
        tracing::debug!(path = %path.display(), "Found user configuration file");
        return Ok(Config::from_file(&path)?);
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
