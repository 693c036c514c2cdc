//! Convention-based artifact lookup and loading.
//!
//! Each per-function artifact is a declarative YAML document located by a
//! fixed naming convention: the function-local file wins, then the shared
//! per-stage file under `config/<stage>/`. Files are parsed through serde
//! into typed descriptors; nothing from a function directory is ever
//! executed, and no process-global lookup state is involved.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::errors::{BuildError, BuildResult};
use crate::model::FunctionSpec;

/// Extensions tried, in order, for every YAML artifact.
pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// The artifact kinds the resolver looks up by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Iam,
    Env,
    Alias,
}

impl ArtifactKind {
    /// Suffix appended to the function name for the function-local file,
    /// e.g. `billingIAM.yaml`.
    fn local_suffix(self) -> &'static str {
        match self {
            ArtifactKind::Iam => "IAM",
            ArtifactKind::Env => "ENV",
            ArtifactKind::Alias => "Alias",
        }
    }

    /// File stem of the shared per-stage fallback, where one exists.
    ///
    /// Aliases are always function-specific, so they have no shared form.
    fn shared_stem(self) -> Option<&'static str> {
        match self {
            ArtifactKind::Iam => Some("iam"),
            ArtifactKind::Env => Some("env"),
            ArtifactKind::Alias => None,
        }
    }
}

/// Locate the artifact file for `func`, if any.
///
/// Function-local files take precedence over the shared per-stage file.
pub fn locate(
    root: &Path,
    func: &FunctionSpec,
    stage: &str,
    kind: ArtifactKind,
) -> Option<PathBuf> {
    for ext in YAML_EXTENSIONS {
        let local = func.base_path.join(format!("{}{}.{ext}", func.name, kind.local_suffix()));
        if local.is_file() {
            return Some(local);
        }
    }
    if let Some(stem) = kind.shared_stem() {
        for ext in YAML_EXTENSIONS {
            let shared = root.join("config").join(stage).join(format!("{stem}.{ext}"));
            if shared.is_file() {
                return Some(shared);
            }
        }
    }
    None
}

/// Conventional lookup locations for an artifact, for error messages.
pub fn lookup_description(func: &FunctionSpec, stage: &str, kind: ArtifactKind) -> String {
    match kind.shared_stem() {
        Some(stem) => format!(
            "{}{}.yaml or config/{stage}/{stem}.yaml",
            func.name,
            kind.local_suffix()
        ),
        None => format!("{}{}.yaml", func.name, kind.local_suffix()),
    }
}

/// Read and parse a YAML artifact into `T`, treating an empty document as
/// absent rather than an error.
///
/// Unreadable or unparseable files surface as `ConfigLoad` with the
/// offending path.
pub fn load_yaml_opt<T: DeserializeOwned>(path: &Path) -> BuildResult<Option<T>> {
    let text = fs::read_to_string(path).map_err(|err| BuildError::ConfigLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let doc: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|err| BuildError::ConfigLoad {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    if doc.is_null() {
        return Ok(None);
    }
    serde_yaml::from_value(doc)
        .map(Some)
        .map_err(|err| BuildError::ConfigLoad { path: path.to_path_buf(), message: err.to_string() })
}

/// Read and parse a YAML artifact into `T`.
///
/// Same as [`load_yaml_opt`], but an empty document is `EmptyConfig`: a file
/// that exists by convention is expected to say something.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> BuildResult<T> {
    load_yaml_opt(path)?.ok_or_else(|| BuildError::EmptyConfig { path: path.to_path_buf() })
}
