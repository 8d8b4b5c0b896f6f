//! Check command implementation.

use anyhow::{Context, Result};
use archgraph_core::{CheckContext, Severity};
use archgraph_extract::{evaluate_with, EdgeLocator, ScanOptions};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub async fn run(
    path: &Path,
    format: OutputFormat,
    only: &[String],
    fail_on: Severity,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;

    for name in only {
        if !config.checks.iter().any(|c| &c.name == name) {
            tracing::warn!("No check named '{name}' in config");
        }
    }
    let config = config.select(only);
    if config.is_empty() {
        tracing::warn!("No checks to run");
    }

    let locator = EdgeLocator::from_settings(&config.extraction, path);
    let options = ScanOptions::from_settings(&config.extraction);

    tracing::info!("Checking {} with {} check(s)", locator, config.checks.len());

    let ctx = CheckContext::new(path.display().to_string());
    let result = evaluate_with(&ctx, &locator, &options, &config.checks)
        .await
        .with_context(|| format!("Failed to extract edges from {locator}"))?;

    super::output::print(&result, format, fail_on)?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}
