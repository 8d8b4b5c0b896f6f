//! Async extraction boundary: locator in, edges (or a report) out.

use archgraph_core::{run_checks, CheckContext, CheckResult, Edge, NamedCheck};
use std::path::Path;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::locator::{EdgeLocator, ScanOptions};
use crate::scan::scan_project;

/// Produces the raw edges behind `locator` with default scan options.
///
/// # Errors
///
/// See [`extract_with`].
pub async fn extract(ctx: &CheckContext, locator: &EdgeLocator) -> Result<Arc<[Edge]>, ExtractError> {
    extract_with(ctx, locator, &ScanOptions::default()).await
}

/// Produces the raw edges behind `locator`.
///
/// When `ctx` carries a cache, a previous result for the same locator is
/// returned without touching the filesystem; a fresh result is stored.
///
/// # Errors
///
/// Returns error if the source is missing, unreadable, or malformed.
pub async fn extract_with(
    ctx: &CheckContext,
    locator: &EdgeLocator,
    options: &ScanOptions,
) -> Result<Arc<[Edge]>, ExtractError> {
    let key = locator.cache_key();
    if let Some(edges) = ctx.cache().and_then(|cache| cache.get(&key)) {
        ctx.in_scope(|| tracing::debug!("Reusing {} cached edges for {key}", edges.len()));
        return Ok(edges);
    }

    let edges: Arc<[Edge]> = match locator {
        EdgeLocator::EdgeFile(path) => read_edge_file(path).await?.into(),
        EdgeLocator::Project(path) => {
            let path = path.clone();
            let options = options.clone();
            tokio::task::spawn_blocking(move || scan_project(&path, &options))
                .await??
                .into()
        }
    };

    ctx.in_scope(|| tracing::info!("Extracted {} edges from {key}", edges.len()));
    if let Some(cache) = ctx.cache() {
        cache.insert(key, Arc::clone(&edges));
    }
    Ok(edges)
}

async fn read_edge_file(path: &Path) -> Result<Vec<Edge>, ExtractError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractError::NotFound(path.to_path_buf())
        } else {
            ExtractError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|e| ExtractError::EdgeFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Extracts edges with default scan options and runs `checks` over them.
///
/// # Errors
///
/// See [`evaluate_with`].
pub async fn evaluate(
    ctx: &CheckContext,
    locator: &EdgeLocator,
    checks: &[NamedCheck],
) -> Result<CheckResult, ExtractError> {
    evaluate_with(ctx, locator, &ScanOptions::default(), checks).await
}

/// Extracts edges and runs `checks` over them.
///
/// Every check sees the same edge snapshot.
///
/// # Errors
///
/// Returns error only if extraction fails; check outcomes are findings.
pub async fn evaluate_with(
    ctx: &CheckContext,
    locator: &EdgeLocator,
    options: &ScanOptions,
    checks: &[NamedCheck],
) -> Result<CheckResult, ExtractError> {
    let edges = extract_with(ctx, locator, options).await?;
    Ok(run_checks(ctx, &edges, checks))
}
