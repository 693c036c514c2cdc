//! End-to-end build: scan, resolve, and emit in one sequential pass.

use std::path::Path;

use tracing::info;

use crate::errors::BuildResult;
use crate::graph::GraphBuilder;
use crate::model::DeploymentContext;
use crate::resolve::{ConfigResolver, SourceMode};
use crate::scan::Scanner;
use crate::template::{ResourceRef, TemplateSink};

/// Options controlling one template build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub source_mode: SourceMode,
    /// Synthesize a `<name><stage>` alias for functions without an alias file.
    pub stage_aliases: bool,
    /// Extra scanner exclusions on top of the defaults.
    pub extra_excludes: Vec<String>,
}

/// Run the full scan/resolve/graph-build pipeline into `sink`.
///
/// Functions are processed one at a time in sorted scan order; the sink is a
/// shared mutable accumulator with no isolation for concurrent mutation, so
/// the pipeline is strictly sequential. All-or-nothing: the first failure
/// aborts the build, and the caller must discard the sink's partial contents
/// instead of serializing them.
pub fn build_template<S: TemplateSink>(
    root: &Path,
    context: &DeploymentContext,
    options: &BuildOptions,
    sink: &mut S,
) -> BuildResult<Vec<ResourceRef>> {
    let scanner = Scanner::new().exclude(options.extra_excludes.iter().cloned());
    let functions = scanner.scan(root)?;
    info!(count = functions.len(), root = %root.display(), "discovered function directories");

    let resolver = ConfigResolver::new(root, &context.stage)
        .with_source_mode(options.source_mode.clone())
        .with_stage_aliases(options.stage_aliases);

    let mut builder = GraphBuilder::new(sink, context);
    let mut references = Vec::with_capacity(functions.len());
    for function in &functions {
        let config = resolver.resolve(function)?;
        references.push(builder.add_function(&config)?);
    }
    Ok(references)
}
