//! Core data model for discovered functions and their resolved configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Memory units assigned to a function when no override is configured.
pub const DEFAULT_MEMORY_SIZE: u32 = 128;

/// Timeout units assigned to a function when no override is configured.
pub const DEFAULT_TIMEOUT: u32 = 60;

/// Version string a synthesized alias pins to.
pub const LATEST_PUBLISHED_VERSION: &str = "$LATEST";

/// One function directory discovered by the convention scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Name derived from the directory name.
    pub name: String,
    /// Directory the function's artifacts live in.
    pub base_path: PathBuf,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), base_path: base_path.into() }
    }
}

/// Cross-cutting deployment parameters.
///
/// Stack name and stage are combined (alphanumeric-filtered) into the logical
/// identifiers that keep resources unique across environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentContext {
    pub stack_name: String,
    pub stage: String,
}

impl DeploymentContext {
    pub fn new(stack_name: impl Into<String>, stage: impl Into<String>) -> Self {
        Self { stack_name: stack_name.into(), stage: stage.into() }
    }
}

/// Where a function's code comes from.
///
/// Inline payloads carry the literal source lines of the function file;
/// storage payloads point at an already-uploaded archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourcePayload {
    Inline(Vec<String>),
    S3 { bucket: String, key: String },
}

/// Execution-role descriptor loaded from an IAM convention file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescriptor {
    /// Role name; doubles as the role resource's logical id after sanitizing.
    pub name: String,
    /// Service principals allowed to assume the role.
    #[serde(default = "default_trust_services")]
    pub trust_services: Vec<String>,
    /// Inline permission statements. May be empty for trust-only roles.
    #[serde(default)]
    pub statements: Vec<PolicyStatement>,
}

/// One permission statement inside a role's inline policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(default = "default_effect")]
    pub effect: String,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

fn default_trust_services() -> Vec<String> {
    vec!["lambda.amazonaws.com".to_string()]
}

fn default_effect() -> String {
    "Allow".to_string()
}

/// A stable, named pointer to a published function version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    pub name: String,
    #[serde(default = "default_function_version")]
    pub function_version: String,
}

fn default_function_version() -> String {
    LATEST_PUBLISHED_VERSION.to_string()
}

/// Handler, runtime identifier, and sizing for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    pub handler: String,
    pub runtime: String,
    pub memory_size: u32,
    pub timeout: u32,
}

/// The fully-loaded configuration for one function.
///
/// Built per function per invocation; never persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Human-readable base name (from the per-function config file, or the
    /// directory name when none exists).
    pub function_name: String,
    pub source: SourcePayload,
    pub role: RoleDescriptor,
    /// Environment variable map. Empty when no env artifact exists.
    pub environment: BTreeMap<String, String>,
    /// Absent when the function declares no alias and synthesis is off.
    pub alias: Option<AliasSpec>,
    pub runtime: RuntimeSettings,
}
