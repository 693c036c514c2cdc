use anyhow::Result;
use clap::{Parser, Subcommand};

use stacksmith::commands::{build_command, scan_command};

/// Convention-driven serverless stack template builder CLI.
///
/// This CLI is a thin wrapper around `foundry-core` (exposed in code as
/// `foundry_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "stacksmith",
    version,
    about = "Assemble a deployment template from convention-laid-out function directories",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a root directory, resolve every function's configuration, and
    /// print the assembled template to stdout.
    ///
    /// Nothing is written to stdout unless the whole build succeeds; any
    /// failure aborts with a non-zero exit status and an error on stderr.
    Build {
        /// Root directory containing one subdirectory per function.
        #[arg(long)]
        path: String,

        /// Deployment stage used to namespace identifiers (e.g. dev, prod).
        #[arg(long)]
        stage: String,

        /// Stack name combined with the stage to form unique identifiers.
        #[arg(long)]
        stack: String,

        /// Storage bucket holding the pre-uploaded code archive. Switches
        /// every function to storage-reference mode.
        #[arg(long, requires = "code_key")]
        code_bucket: Option<String>,

        /// Storage key of the pre-uploaded code archive.
        #[arg(long, requires = "code_bucket")]
        code_key: Option<String>,

        /// Synthesize a per-stage alias for functions without an alias file.
        #[arg(long, default_value_t = false)]
        stage_alias: bool,

        /// Extra directory names to exclude from the scan (repeatable).
        #[arg(long = "exclude")]
        excludes: Vec<String>,
    },

    /// List the function directories the scanner accepts under a root.
    Scan {
        /// Root directory containing one subdirectory per function.
        #[arg(long)]
        path: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    stacksmith::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Build { path, stage, stack, code_bucket, code_key, stage_alias, excludes } => {
            build_command(&path, &stage, &stack, code_bucket.zip(code_key), stage_alias, excludes)?
        }
        Command::Scan { path, json } => scan_command(&path, json)?,
    }

    Ok(())
}
