//! Edges command: dump the raw edges a check run would see.

use anyhow::{Context, Result};
use archgraph_core::declarative::ExtractionSettings;
use archgraph_core::CheckContext;
use archgraph_extract::{extract_with, EdgeLocator, ScanOptions};
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Runs the edges command.
///
/// Without a config file, `path` itself is scanned with default options.
pub async fn run(path: &Path, source: &ConfigSource) -> Result<()> {
    let settings = match source {
        ConfigSource::Missing => ExtractionSettings::default(),
        other => other.load()?.extraction,
    };

    let locator = EdgeLocator::from_settings(&settings, path);
    let options = ScanOptions::from_settings(&settings);

    let edges = extract_with(&CheckContext::new("edges"), &locator, &options)
        .await
        .with_context(|| format!("Failed to extract edges from {locator}"))?;

    println!("{}", serde_json::to_string_pretty(&*edges)?);
    Ok(())
}
