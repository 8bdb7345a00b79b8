//! Terraform project detection and caching.
//!
//! A *project* is a root module directory. [`ProjectDetector`] maps file
//! paths to project roots and memoizes a [`ProjectDescriptor`] per root until
//! the next [`ProjectDetector::refresh_all`].
//!
//! # Example
//!
//! ```rust,no_run
//! use tfscout::project::ProjectDetector;
//! use tfscout::Config;
//! use std::path::Path;
//!
//! fn main() -> tfscout::Result<()> {
//!     let detector = ProjectDetector::new(&Config::default());
//!     let project = detector.detect(Path::new("/work/infra/live/prod/main.tf"))?;
//!     println!("{} ({:?})", project.name, project.backend);
//!     Ok(())
//! }
//! ```

mod cache;
mod descriptor;
mod root;

pub use cache::ProjectCache;
pub use descriptor::{build_descriptor, MODULES_MANIFEST, STATE_FILE};
pub use root::{is_root_module, resolve_project_root, ROOT_INDICATORS};

use crate::config::{Config, ProjectOptions};
use crate::error::Result;
use crate::types::{tf_files_in, ProjectDescriptor};
use indexmap::IndexSet;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Resolves files to Terraform projects and owns the project cache.
///
/// Safe to share across threads (wrap it in an `Arc`).
#[derive(Debug)]
pub struct ProjectDetector {
    options: ProjectOptions,
    cache: ProjectCache,
}

impl ProjectDetector {
    /// Create a detector with an empty cache.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            options: config.project.clone(),
            cache: ProjectCache::new(),
        }
    }

    /// The project options this detector was built with.
    #[must_use]
    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    /// Root module directory for `path`. See [`resolve_project_root`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for relative paths.
    pub fn resolve_project_root(&self, path: &Path) -> Result<PathBuf> {
        resolve_project_root(path, &self.options)
    }

    /// Cached descriptor for `root`, built on first use.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryNotFound` if `root` is not a directory.
    pub fn get_or_create_project(&self, root: &Path) -> Result<Arc<ProjectDescriptor>> {
        self.cache
            .get_or_try_insert_with(root, || build_descriptor(root))
    }

    /// Project containing `path`: a cached project whose root prefixes the
    /// path, else the project at the resolved root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for relative paths and `DirectoryNotFound` when
    /// the resolved root does not exist.
    pub fn detect(&self, path: &Path) -> Result<Arc<ProjectDescriptor>> {
        if let Some(project) = self.cache.find_containing(path, self.options.path_matching) {
            tracing::trace!(path = %path.display(), root = %project.root_path.display(), "Project cache hit");
            return Ok(project);
        }
        let root = self.resolve_project_root(path)?;
        self.get_or_create_project(&root)
    }

    /// Clear the cache and rediscover every root module under `folders`.
    ///
    /// Directories named in `ignore_directory_names` are not descended into
    /// and symlinks are not followed. A root reached from several folders is
    /// built once. Returns the discovered projects in walk order.
    pub fn refresh_all<P: AsRef<Path>>(&self, folders: &[P]) -> Vec<Arc<ProjectDescriptor>> {
        let roots: Vec<PathBuf> = folders
            .iter()
            .flat_map(|folder| self.discover_roots(folder.as_ref()))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let descriptors: Vec<Arc<ProjectDescriptor>> = roots
            .par_iter()
            .filter_map(|root| match build_descriptor(root) {
                Ok(descriptor) => Some(Arc::new(descriptor)),
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "Failed to build project");
                    None
                }
            })
            .collect();

        self.cache.replace_all(descriptors.iter().cloned());
        tracing::info!(
            folders = folders.len(),
            projects = descriptors.len(),
            "Refreshed projects"
        );
        descriptors
    }

    /// All cached projects in insertion order.
    #[must_use]
    pub fn projects(&self) -> Vec<Arc<ProjectDescriptor>> {
        self.cache.values()
    }

    /// Drop every cached project.
    pub fn dispose(&self) {
        self.cache.clear();
    }

    /// Directories under `folder` that contain `*.tf` files and are root modules.
    fn discover_roots(&self, folder: &Path) -> Vec<PathBuf> {
        if !folder.is_dir() {
            tracing::warn!(folder = %folder.display(), "Skipping missing folder");
            return Vec::new();
        }

        let ignored = &self.options.ignore_directory_names;
        WalkDir::new(folder)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let prune = entry.depth() > 0
                    && entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| ignored.iter().any(|i| i == name));
                if prune {
                    tracing::debug!(path = %entry.path().display(), "Skipping ignored directory");
                }
                !prune
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .filter(|dir| !tf_files_in(dir).is_empty() && is_root_module(dir))
            .collect()
    }
}
