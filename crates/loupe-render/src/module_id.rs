use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use thiserror::Error;

/// Canonical identity of a loaded module, used as the module cache key.
///
/// The identifier prefers canonical filesystem paths so modules reached through
/// different spellings (relative vs absolute, `.` vs `..`, symlinked temp
/// directories) compare equal. Paths that do not exist yet keep their cleaned
/// absolute form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    /// Create a new module identifier from a filesystem path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ModuleIdError> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(ModuleIdError::EmptyPath);
        }

        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|source| ModuleIdError::CurrentDir { source })?
                .join(path)
        };

        let cleaned = joined.clean();

        match std::fs::canonicalize(&cleaned) {
            Ok(canonical) => Ok(Self(canonical)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self(cleaned)),
            Err(err) => Err(ModuleIdError::Canonicalization {
                path: cleaned,
                source: err,
            }),
        }
    }

    /// Path backing this identifier.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Whether this module lives inside `dir` (component-wise containment).
    pub fn is_within(&self, dir: &Path) -> bool {
        self.0.starts_with(dir)
    }

    /// Path of this module relative to `dir`, if it lives inside it.
    pub fn relative_to(&self, dir: &Path) -> Option<&Path> {
        self.0.strip_prefix(dir).ok()
    }

    /// Directory containing the module.
    pub fn parent(&self) -> Option<&Path> {
        self.0.parent()
    }

    /// Name under which the module is registered with the template engine.
    pub fn template_name(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }

    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for ModuleId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Errors produced while building a [`ModuleId`].
#[derive(Debug, Error)]
pub enum ModuleIdError {
    #[error("module path is empty")]
    EmptyPath,

    #[error("failed to read current working directory: {source}")]
    CurrentDir {
        #[source]
        source: io::Error,
    },

    #[error("failed to canonicalize {}: {source}", .path.display())]
    Canonicalization {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Clean and, when possible, canonicalize a directory used as a containment
/// boundary so it compares correctly against [`ModuleId`] paths.
pub fn canonical_dir(path: impl AsRef<Path>) -> PathBuf {
    match ModuleId::new(path.as_ref()) {
        Ok(id) => id.into_path(),
        Err(_) => path.as_ref().to_path_buf().clean(),
    }
}
