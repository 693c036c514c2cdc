//! Convention scanner: decides which directories under a root are functions.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::{BuildError, BuildResult};
use crate::model::FunctionSpec;

/// Directory names that hold the builder's own code or shared configuration
/// and must never be treated as function definitions.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["builder", "src", "config"];

/// Filesystem scanner for function directories.
#[derive(Debug, Clone)]
pub struct Scanner {
    excluded: Vec<String>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self { excluded: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect() }
    }

    /// Add extra directory names to exclude on top of the defaults.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Enumerate the function directories under `root`, sorted by name.
    ///
    /// Entries that are not directories, start with `.`, or match the
    /// exclusion list are skipped. Read-only; the scanner never creates or
    /// modifies anything.
    pub fn scan(&self, root: &Path) -> BuildResult<Vec<FunctionSpec>> {
        if !root.is_dir() {
            return Err(BuildError::Path(root.to_path_buf()));
        }

        let entries = fs::read_dir(root)
            .map_err(|source| BuildError::Io { path: root.to_path_buf(), source })?;

        let mut specs = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|source| BuildError::Io { path: root.to_path_buf(), source })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|os| os.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if self.excluded.iter().any(|excluded| excluded == name) {
                debug!(name, "skipping excluded directory");
                continue;
            }
            specs.push(FunctionSpec::new(name, &path));
        }

        // Filesystem enumeration order is not stable across platforms.
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(specs)
    }
}
