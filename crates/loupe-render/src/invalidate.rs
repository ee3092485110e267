//! Cache invalidation policy.
//!
//! Before every render the pipeline drops every cached module that may have
//! changed since the last render:
//!
//! - modules under one of the framework paths, always;
//! - modules under the project root, unless they live inside a vendored
//!   dependency directory (`node_modules`) below that root.
//!
//! Everything else stays cached. Both rules are plain predicates so they can
//! be tested in isolation.

use crate::cache::ModuleCache;
use crate::module_id::{ModuleId, canonical_dir};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directory name of vendored dependencies.
pub const VENDOR_DIR: &str = "node_modules";

#[derive(Debug, Clone)]
pub struct InvalidationPolicy {
    project_root: PathBuf,
    framework_paths: Vec<PathBuf>,
    vendor_dir: String,
}

impl InvalidationPolicy {
    /// Policy scoped to `project_root`, with no framework paths.
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: canonical_dir(project_root),
            framework_paths: Vec::new(),
            vendor_dir: VENDOR_DIR.to_string(),
        }
    }

    /// Add a path whose modules are always invalidated.
    pub fn with_framework_path(mut self, path: impl AsRef<Path>) -> Self {
        self.framework_paths.push(canonical_dir(path));
        self
    }

    pub fn with_vendor_dir(mut self, name: impl Into<String>) -> Self {
        self.vendor_dir = name.into();
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn framework_paths(&self) -> &[PathBuf] {
        &self.framework_paths
    }

    pub fn under_framework(&self, id: &ModuleId) -> bool {
        self.framework_paths.iter().any(|dir| id.is_within(dir))
    }

    pub fn under_project(&self, id: &ModuleId) -> bool {
        let Some(relative) = id.relative_to(&self.project_root) else {
            return false;
        };
        !relative
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == self.vendor_dir.as_str()))
    }

    pub fn is_stale(&self, id: &ModuleId) -> bool {
        self.under_framework(id) || self.under_project(id)
    }

    /// Purge every stale module from `cache`.
    pub fn apply(&self, cache: &ModuleCache) -> usize {
        let purged = cache.invalidate(|id| self.is_stale(id));
        debug!(purged, remaining = cache.len(), "invalidated module cache");
        purged
    }
}
