//! Conventional entry file discovery.
//!
//! A component directory holds the component module itself (`entry.jsx`,
//! `index.js`, ...) and an `example/` directory with the preview harness:
//! script, style, markup and data entries. Each kind is looked up through a
//! fixed priority list; the first existing file wins. Resolution happens once
//! at startup and absence is never an error.

use std::path::{Path, PathBuf};

pub const SCRIPT_CANDIDATES: &[&str] = &["entry.js", "entry.jsx", "index.js", "index.jsx"];
pub const STYLE_CANDIDATES: &[&str] = &["entry.css", "index.css"];
pub const MARKUP_CANDIDATES: &[&str] = &["entry.html", "index.html"];
pub const DATA_CANDIDATES: &[&str] = &["data.js", "data.json", "entry.json"];

/// Sub-directory holding the preview harness.
pub const EXAMPLE_DIR: &str = "example";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Script,
    Style,
    Markup,
    Data,
}

impl EntryKind {
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            EntryKind::Script => SCRIPT_CANDIDATES,
            EntryKind::Style => STYLE_CANDIDATES,
            EntryKind::Markup => MARKUP_CANDIDATES,
            EntryKind::Data => DATA_CANDIDATES,
        }
    }
}

/// First candidate in `dir` that exists as a regular file.
pub fn find_first_file(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

pub fn find_entry(dir: &Path, kind: EntryKind) -> Option<PathBuf> {
    find_first_file(dir, kind.candidates())
}

/// Entry files of a component directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySet {
    pub dir: PathBuf,
    pub script: Option<PathBuf>,
    pub style: Option<PathBuf>,
    pub markup: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub component: Option<PathBuf>,
}

impl EntrySet {
    pub fn resolve(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let example = dir.join(EXAMPLE_DIR);

        Self {
            script: find_entry(&example, EntryKind::Script),
            style: find_entry(&example, EntryKind::Style),
            markup: find_entry(&example, EntryKind::Markup),
            data: find_entry(&example, EntryKind::Data),
            component: find_entry(&dir, EntryKind::Script),
            dir,
        }
    }

    pub fn example_dir(&self) -> PathBuf {
        self.dir.join(EXAMPLE_DIR)
    }

    /// Whether the component or the example script is written as JSX.
    pub fn uses_jsx(&self) -> bool {
        [&self.component, &self.script]
            .into_iter()
            .flatten()
            .any(|path| is_jsx(path))
    }
}

fn is_jsx(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "jsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_entry_js_wins_over_index_js() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "index.js");
        touch(temp.path(), "entry.js");

        assert_eq!(
            find_first_file(temp.path(), SCRIPT_CANDIDATES),
            Some(temp.path().join("entry.js"))
        );
    }

    #[test]
    fn test_directories_are_not_entries() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("entry.css")).unwrap();
        touch(temp.path(), "index.css");

        assert_eq!(
            find_entry(temp.path(), EntryKind::Style),
            Some(temp.path().join("index.css"))
        );
    }

    #[test]
    fn test_missing_entries_are_absent() {
        let temp = TempDir::new().unwrap();
        let entries = EntrySet::resolve(temp.path());
        assert_eq!(entries.component, None);
        assert_eq!(entries.script, None);
        assert_eq!(entries.data, None);
        assert!(!entries.uses_jsx());
    }

    #[test]
    fn test_resolve_component_directory() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "index.jsx");
        touch(temp.path(), "example/entry.js");
        touch(temp.path(), "example/entry.css");
        touch(temp.path(), "example/index.html");
        touch(temp.path(), "example/data.json");

        let entries = EntrySet::resolve(temp.path());
        let example = temp.path().join("example");
        assert_eq!(entries.component, Some(temp.path().join("index.jsx")));
        assert_eq!(entries.script, Some(example.join("entry.js")));
        assert_eq!(entries.style, Some(example.join("entry.css")));
        assert_eq!(entries.markup, Some(example.join("index.html")));
        assert_eq!(entries.data, Some(example.join("data.json")));
        assert!(entries.uses_jsx());
    }

    #[test]
    fn test_data_precedence() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "entry.json");
        touch(temp.path(), "data.js");

        assert_eq!(
            find_entry(temp.path(), EntryKind::Data),
            Some(temp.path().join("data.js"))
        );
    }
}
