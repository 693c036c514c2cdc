use std::path::PathBuf;

use thiserror::Error;

/// Error type for the scan/resolve/build pipeline.
///
/// Every variant is fatal: the pipeline has no partial-success mode. The
/// first error aborts the whole build and no template is emitted.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The scan root is missing or not a directory.
    #[error("Scan root is not a directory: {}", .0.display())]
    Path(PathBuf),

    /// A function directory has no source payload.
    #[error("Function `{function}` has no source file (expected {expected})")]
    MissingSource { function: String, expected: String },

    /// A function has no execution-role descriptor anywhere in the lookup chain.
    #[error("Function `{function}` has no IAM descriptor (looked for {looked_for})")]
    MissingIam { function: String, looked_for: String },

    /// A convention config file exists but could not be read or parsed.
    #[error("Failed to load config file {}: {}", .path.display(), .message)]
    ConfigLoad { path: PathBuf, message: String },

    /// A required declarative config file parsed to an empty document.
    #[error("Config file {} is present but empty", .path.display())]
    EmptyConfig { path: PathBuf },

    /// Two resources collapsed to the same sanitized logical identifier.
    #[error("Duplicate logical id `{0}` in template")]
    DuplicateIdentifier(String),

    /// Filesystem error outside the config-file loaders.
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template document could not be serialized.
    #[error("Failed to serialize template")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience result type for pipeline operations.
pub type BuildResult<T> = Result<T, BuildError>;
