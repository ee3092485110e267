//! File system watcher with debouncing.
//!
//! Watches the whole project root, so edits to sibling packages are seen as
//! well, and filters out vendored dependencies, hidden files and configured
//! patterns. Framework paths are watched even when they are vendored.

use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Patterns ignored in addition to the configured ones.
pub const DEFAULT_IGNORE: &[&str] = &["node_modules", "target", "*.log"];

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Ignore rules for watched paths.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    root: PathBuf,
    ignore_patterns: Vec<String>,
    always_watch: Vec<PathBuf>,
}

impl WatchFilter {
    pub fn new(root: PathBuf, extra_ignore: &[String], always_watch: Vec<PathBuf>) -> Self {
        let ignore_patterns = DEFAULT_IGNORE
            .iter()
            .map(|p| p.to_string())
            .chain(extra_ignore.iter().cloned())
            .collect();
        Self {
            root,
            ignore_patterns,
            always_watch,
        }
    }

    pub fn should_ignore(&self, path: &Path) -> bool {
        if !path.starts_with(&self.root) {
            return true;
        }

        if self.always_watch.iter().any(|dir| path.starts_with(dir)) {
            return false;
        }

        let Ok(rel_path) = path.strip_prefix(&self.root) else {
            return true;
        };
        let path_str = rel_path.to_string_lossy();

        for pattern in &self.ignore_patterns {
            if let Some(ext) = pattern.strip_prefix('*') {
                if path_str.ends_with(ext) {
                    return true;
                }
            } else if rel_path.components().any(|c| c.as_os_str() == pattern.as_str())
                || rel_path.starts_with(pattern)
            {
                return true;
            }
        }

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }
}

/// Recursive watcher sending filtered, debounced changes through a channel.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `filter`'s root.
    ///
    /// Repeated events for the same path within `debounce_ms` are dropped.
    pub fn new(filter: WatchFilter, debounce_ms: u64) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let root = filter.root.clone();
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            for path in &event.paths {
                if filter.should_ignore(path) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                let _ = tx.blocking_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(extra: &[&str]) -> WatchFilter {
        WatchFilter::new(
            PathBuf::from("/project"),
            &extra.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            vec![PathBuf::from("/project/node_modules/loupe")],
        )
    }

    #[test]
    fn test_ignores_vendored_dependencies() {
        let filter = filter(&[]);
        assert!(filter.should_ignore(Path::new("/project/node_modules/react/index.js")));
        assert!(filter.should_ignore(Path::new("/project/packages/a/node_modules/x.js")));
        assert!(!filter.should_ignore(Path::new("/project/src/index.js")));
    }

    #[test]
    fn test_framework_paths_are_watched() {
        let filter = filter(&[]);
        assert!(!filter.should_ignore(Path::new("/project/node_modules/loupe/card.html")));
    }

    #[test]
    fn test_extension_and_configured_patterns() {
        let filter = filter(&["dist"]);
        assert!(filter.should_ignore(Path::new("/project/debug.log")));
        assert!(filter.should_ignore(Path::new("/project/dist/bundle.js")));
        assert!(!filter.should_ignore(Path::new("/project/distance/entry.jsx")));
    }

    #[test]
    fn test_hidden_files_and_outside_root() {
        let filter = filter(&[]);
        assert!(filter.should_ignore(Path::new("/project/.git/config")));
        assert!(filter.should_ignore(Path::new("/project/src/.hidden/file.js")));
        assert!(filter.should_ignore(Path::new("/other/file.js")));
    }

    #[test]
    fn test_file_change_path() {
        let path = PathBuf::from("/project/src/index.js");
        assert_eq!(FileChange::Modified(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Removed(path.clone()).path(), path.as_path());
    }

    #[test]
    fn test_missing_root() {
        let filter = WatchFilter::new(PathBuf::from("/nonexistent/loupe-root"), &[], vec![]);
        assert!(matches!(
            FileWatcher::new(filter, 100),
            Err(CliError::FileNotFound(_))
        ));
    }
}
