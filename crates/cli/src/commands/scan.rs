use anyhow::{Context, Result};
use foundry_core::scan::Scanner;

use crate::canonicalize_or_current;

/// List the function directories the scanner accepts under `path`.
pub fn scan_command(path: &str, json: bool) -> Result<()> {
    let root = canonicalize_or_current(path)?;

    let functions = Scanner::new()
        .scan(&root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    if json {
        let serialized = serde_json::to_string_pretty(&functions)
            .context("Failed to serialize scan result to JSON")?;
        println!("{serialized}");
    } else {
        println!("Functions ({}):", functions.len());
        if functions.is_empty() {
            println!("  (none)");
            return Ok(());
        }
        for function in functions {
            println!("  - {} ({})", function.name, function.base_path.display());
        }
    }

    Ok(())
}
