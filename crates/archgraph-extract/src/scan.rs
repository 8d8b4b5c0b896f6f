//! Project scanning: walk sources, parse imports, resolve them to edges.

use archgraph_core::Edge;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ExtractError;
use crate::imports::parse_imports;
use crate::locator::ScanOptions;
use crate::resolve::{Resolution, Resolver};
use crate::tsconfig::TsConfig;

const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Scans a project and returns its raw edges, ordered by source unit.
///
/// `path` is either a `tsconfig.json` (its directory is the root) or a
/// directory, whose own `tsconfig.json` is used when present.
///
/// # Errors
///
/// Returns error if the path does not exist, the tsconfig is invalid, or a
/// source file cannot be read.
pub fn scan_project(path: &Path, options: &ScanOptions) -> Result<Vec<Edge>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let (root, tsconfig) = if path.is_file() {
        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        (root, TsConfig::load(path)?)
    } else {
        let candidate = path.join("tsconfig.json");
        let tsconfig = if candidate.is_file() {
            TsConfig::load(&candidate)?
        } else {
            TsConfig::default()
        };
        (path.to_path_buf(), tsconfig)
    };

    let files = discover_files(&root, options)?;
    tracing::debug!("Discovered {} files under {}", files.len(), root.display());

    let units: HashSet<String> = files.iter().map(|(unit, _)| unit.clone()).collect();
    let resolver = Resolver::new(units, options.extensions.clone(), tsconfig);

    let mut edges = Vec::new();
    let mut sources = 0usize;
    for (unit, file) in &files {
        if unit.ends_with(".d.ts") || options.is_excluded(unit) {
            continue;
        }
        sources += 1;

        let text = std::fs::read_to_string(file).map_err(|e| ExtractError::Io {
            path: file.clone(),
            source: e,
        })?;

        for import in parse_imports(&text) {
            let edge = match resolver.resolve(unit, &import.specifier) {
                Resolution::Internal(target) => Edge::new(unit.as_str(), target),
                Resolution::External(target) => Edge::external(unit.as_str(), target),
            };
            edges.push(edge.with_kinds(import.kinds));
        }
    }

    tracing::info!(
        "Scanned {} source files, {} edges, in {}",
        sources,
        edges.len(),
        root.display()
    );
    Ok(edges)
}

/// Returns `(unit, path)` pairs for every accepted file, sorted by unit.
fn discover_files(root: &Path, options: &ScanOptions) -> Result<Vec<(String, PathBuf)>, ExtractError> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !SKIPPED_DIRS.contains(&name))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || !options.accepts(path) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        let unit = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((unit, path.to_path_buf()));
    }

    files.sort();
    Ok(files)
}
