//! Per-function configuration resolution.
//!
//! For each discovered function the resolver loads up to four optional
//! artifacts (source payload, IAM descriptor, env map, alias) plus the
//! per-function declarative config file. The source payload and IAM
//! descriptor are mandatory; everything else degrades to an empty or absent
//! default.

pub mod artifacts;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{BuildError, BuildResult};
use crate::model::{
    AliasSpec, FunctionSpec, ResolvedConfig, RoleDescriptor, RuntimeSettings, SourcePayload,
    DEFAULT_MEMORY_SIZE, DEFAULT_TIMEOUT, LATEST_PUBLISHED_VERSION,
};
use self::artifacts::{ArtifactKind, YAML_EXTENSIONS};

/// Recognized source extensions and the runtime identifier each implies.
const SOURCE_RUNTIMES: &[(&str, &str)] = &[("py", "python3.12"), ("js", "nodejs20.x")];

/// Runtime used when nothing better can be inferred (storage-mode payloads
/// with no configured runtime).
const FALLBACK_RUNTIME: &str = "python3.12";

/// How the resolver obtains each function's code payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Read `<name>Function.<ext>` from the function directory and inline it.
    #[default]
    LocalFile,
    /// Reference an already-uploaded archive; no local source file required.
    Storage { bucket: String, key: String },
}

/// Per-function declarative config file (`config/config.yaml`).
///
/// Key casing follows the file convention, not Rust field naming.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionConfigFile {
    name: String,
    handler: String,
    #[serde(default)]
    memory_size: Option<u32>,
    #[serde(default)]
    timeout: Option<u32>,
    #[serde(default)]
    runtime: Option<String>,
}

/// Resolves the full configuration for one function at a time.
///
/// Holds only borrowed context; construct once per build and reuse across
/// functions.
#[derive(Debug, Clone)]
pub struct ConfigResolver<'a> {
    root: &'a Path,
    stage: &'a str,
    source_mode: SourceMode,
    stage_aliases: bool,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(root: &'a Path, stage: &'a str) -> Self {
        Self { root, stage, source_mode: SourceMode::LocalFile, stage_aliases: false }
    }

    /// Switch how source payloads are obtained.
    pub fn with_source_mode(mut self, mode: SourceMode) -> Self {
        self.source_mode = mode;
        self
    }

    /// Synthesize a `<name><stage>` alias for functions without an alias file.
    pub fn with_stage_aliases(mut self, enabled: bool) -> Self {
        self.stage_aliases = enabled;
        self
    }

    /// Resolve every artifact for one discovered function.
    ///
    /// Fails on the first mandatory artifact that is missing or broken; the
    /// caller is expected to abort the whole build in that case.
    pub fn resolve(&self, func: &FunctionSpec) -> BuildResult<ResolvedConfig> {
        let (source, inferred_runtime) = self.resolve_source(func)?;
        let role = self.resolve_iam(func)?;
        let environment = self.resolve_env(func)?;
        let alias = self.resolve_alias(func)?;
        let config_file = self.load_function_config(func)?;

        let function_name = match &config_file {
            Some(cfg) => cfg.name.clone(),
            None => func.name.clone(),
        };
        let runtime = RuntimeSettings {
            handler: config_file
                .as_ref()
                .map(|cfg| cfg.handler.clone())
                .unwrap_or_else(|| format!("{}_handler", func.name)),
            runtime: config_file
                .as_ref()
                .and_then(|cfg| cfg.runtime.clone())
                .or_else(|| inferred_runtime.map(str::to_string))
                .unwrap_or_else(|| FALLBACK_RUNTIME.to_string()),
            memory_size: config_file
                .as_ref()
                .and_then(|cfg| cfg.memory_size)
                .unwrap_or(DEFAULT_MEMORY_SIZE),
            timeout: config_file.as_ref().and_then(|cfg| cfg.timeout).unwrap_or(DEFAULT_TIMEOUT),
        };

        debug!(
            function = %func.name,
            role = %role.name,
            env_vars = environment.len(),
            alias = alias.is_some(),
            "resolved function configuration"
        );

        Ok(ResolvedConfig { function_name, source, role, environment, alias, runtime })
    }

    /// Obtain the code payload: the one mandatory artifact.
    ///
    /// Returns the payload plus the runtime identifier implied by the source
    /// file extension, when there is one to infer from.
    fn resolve_source(
        &self,
        func: &FunctionSpec,
    ) -> BuildResult<(SourcePayload, Option<&'static str>)> {
        match &self.source_mode {
            SourceMode::Storage { bucket, key } => {
                Ok((SourcePayload::S3 { bucket: bucket.clone(), key: key.clone() }, None))
            }
            SourceMode::LocalFile => {
                for &(ext, runtime) in SOURCE_RUNTIMES {
                    let candidate = func.base_path.join(format!("{}Function.{ext}", func.name));
                    if candidate.is_file() {
                        let text = fs::read_to_string(&candidate)
                            .map_err(|source| BuildError::Io { path: candidate.clone(), source })?;
                        let lines = text.lines().map(str::to_string).collect();
                        return Ok((SourcePayload::Inline(lines), Some(runtime)));
                    }
                }
                Err(BuildError::MissingSource {
                    function: func.name.clone(),
                    expected: func
                        .base_path
                        .join(format!("{}Function.<ext>", func.name))
                        .display()
                        .to_string(),
                })
            }
        }
    }

    /// Load the role descriptor: mandatory, a function without a role is not
    /// deployable.
    ///
    /// `{name}` and `{stage}` placeholders in the role name and statement
    /// resources are interpolated so one shared per-stage descriptor can
    /// yield per-function roles.
    fn resolve_iam(&self, func: &FunctionSpec) -> BuildResult<RoleDescriptor> {
        let Some(path) = artifacts::locate(self.root, func, self.stage, ArtifactKind::Iam) else {
            return Err(BuildError::MissingIam {
                function: func.name.clone(),
                looked_for: artifacts::lookup_description(func, self.stage, ArtifactKind::Iam),
            });
        };
        let mut role: RoleDescriptor = artifacts::load_yaml(&path)?;
        role.name = self.interpolate(&role.name, func);
        for statement in &mut role.statements {
            for resource in &mut statement.resources {
                *resource = self.interpolate(resource, func);
            }
        }
        debug!(function = %func.name, path = %path.display(), "loaded IAM descriptor");
        Ok(role)
    }

    /// Load the environment map. Optional and failure-free when absent;
    /// a present-but-empty file is also just the empty map.
    fn resolve_env(&self, func: &FunctionSpec) -> BuildResult<BTreeMap<String, String>> {
        match artifacts::locate(self.root, func, self.stage, ArtifactKind::Env) {
            Some(path) => Ok(artifacts::load_yaml_opt(&path)?.unwrap_or_default()),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Load or synthesize the alias. Optional: no file and no synthesis means
    /// no alias resource is ever created for this function.
    fn resolve_alias(&self, func: &FunctionSpec) -> BuildResult<Option<AliasSpec>> {
        if let Some(path) = artifacts::locate(self.root, func, self.stage, ArtifactKind::Alias) {
            let alias: AliasSpec = artifacts::load_yaml(&path)?;
            return Ok(Some(alias));
        }
        if self.stage_aliases {
            return Ok(Some(AliasSpec {
                name: format!("{}{}", func.name, self.stage),
                function_version: LATEST_PUBLISHED_VERSION.to_string(),
            }));
        }
        Ok(None)
    }

    /// Load the per-function declarative config file, if present.
    ///
    /// A present file must parse and must not be empty; `Name` and `Handler`
    /// are required keys.
    fn load_function_config(&self, func: &FunctionSpec) -> BuildResult<Option<FunctionConfigFile>> {
        for ext in YAML_EXTENSIONS {
            let path = func.base_path.join("config").join(format!("config.{ext}"));
            if path.is_file() {
                return artifacts::load_yaml(&path).map(Some);
            }
        }
        Ok(None)
    }

    fn interpolate(&self, template: &str, func: &FunctionSpec) -> String {
        template.replace("{name}", &func.name).replace("{stage}", self.stage)
    }
}
