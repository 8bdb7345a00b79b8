//! Thread-safe, insertion-ordered cache of project descriptors.

use crate::config::PathMatching;
use crate::error::Result;
use crate::types::ProjectDescriptor;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Descriptors keyed by root path.
///
/// Iteration follows insertion order so prefix lookups are deterministic.
/// A single mutex guards every read, insert and clear.
#[derive(Debug, Default)]
pub struct ProjectCache {
    inner: Mutex<IndexMap<PathBuf, Arc<ProjectDescriptor>>>,
}

impl ProjectCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached descriptor for exactly `root`.
    #[must_use]
    pub fn get(&self, root: &Path) -> Option<Arc<ProjectDescriptor>> {
        self.inner.lock().get(root).cloned()
    }

    /// Return the cached descriptor for `root`, building it with `build` on a
    /// miss. The lock is held while building, so concurrent callers for the
    /// same root all receive the same `Arc`.
    ///
    /// # Errors
    ///
    /// Propagates the error from `build`; nothing is cached in that case.
    pub fn get_or_try_insert_with<F>(&self, root: &Path, build: F) -> Result<Arc<ProjectDescriptor>>
    where
        F: FnOnce() -> Result<ProjectDescriptor>,
    {
        let mut map = self.inner.lock();
        if let Some(existing) = map.get(root) {
            return Ok(Arc::clone(existing));
        }
        let descriptor = Arc::new(build()?);
        map.insert(root.to_path_buf(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// First cached descriptor (in insertion order) whose root contains `path`.
    #[must_use]
    pub fn find_containing(
        &self,
        path: &Path,
        matching: PathMatching,
    ) -> Option<Arc<ProjectDescriptor>> {
        self.inner
            .lock()
            .iter()
            .find(|(root, _)| matching.contains(root, path))
            .map(|(_, descriptor)| Arc::clone(descriptor))
    }

    /// Atomically replace the whole cache with `descriptors`, keeping their order.
    pub fn replace_all(&self, descriptors: impl IntoIterator<Item = Arc<ProjectDescriptor>>) {
        let mut map = self.inner.lock();
        map.clear();
        for descriptor in descriptors {
            map.entry(descriptor.root_path.clone()).or_insert(descriptor);
        }
    }

    /// All cached descriptors in insertion order.
    #[must_use]
    pub fn values(&self) -> Vec<Arc<ProjectDescriptor>> {
        self.inner.lock().values().cloned().collect()
    }

    /// Remove every descriptor.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the cache holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
