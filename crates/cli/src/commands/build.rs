use anyhow::{Context, Result};
use tracing::debug;

use foundry_core::model::DeploymentContext;
use foundry_core::pipeline::{build_template, BuildOptions};
use foundry_core::resolve::SourceMode;
use foundry_core::template::{JsonTemplate, TemplateSink};

use crate::canonicalize_or_current;

/// Assemble the template for every function under `path` and print it.
///
/// The template is only printed after the whole build succeeds, so a failing
/// function never leaves a partial document on stdout.
pub fn build_command(
    path: &str,
    stage: &str,
    stack: &str,
    code_location: Option<(String, String)>,
    stage_alias: bool,
    excludes: Vec<String>,
) -> Result<()> {
    let root = canonicalize_or_current(path)?;
    let context = DeploymentContext::new(stack, stage);

    let mut options = BuildOptions {
        stage_aliases: stage_alias,
        extra_excludes: excludes,
        ..BuildOptions::default()
    };
    if let Some((bucket, key)) = code_location {
        options.source_mode = SourceMode::Storage { bucket, key };
    }

    let mut template =
        JsonTemplate::new().with_description(format!("Stack {stack}, stage {stage}"));

    let references = build_template(&root, &context, &options, &mut template)
        .with_context(|| format!("Failed to build template for {}", root.display()))?;
    debug!(functions = references.len(), "template build complete");

    let document = template.serialize().context("Failed to serialize template")?;
    println!("{document}");

    Ok(())
}
