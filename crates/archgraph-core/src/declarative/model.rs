//! Validated configuration model.

use std::path::PathBuf;

use crate::check::NamedCheck;
use crate::pattern::GlobPattern;

/// Where extraction reads raw edges from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSource {
    /// A JSON array of raw edges.
    EdgeFile(PathBuf),
    /// A tsconfig.json file or a project directory to scan.
    Project(PathBuf),
}

/// `[extraction]` settings with paths resolved against the config directory.
#[derive(Debug, Clone, Default)]
pub struct ExtractionSettings {
    /// Configured source; `None` means "scan the project root".
    pub source: Option<ExtractionSource>,
    /// Units to skip while scanning.
    pub exclude: Vec<GlobPattern>,
    /// Extensions to scan, without the dot. Empty means the defaults.
    pub extensions: Vec<String>,
}

/// A fully loaded `archgraph.toml`.
#[derive(Debug, Clone, Default)]
pub struct ArchgraphConfig {
    /// Extraction settings.
    pub extraction: ExtractionSettings,
    /// Checks in declaration order: cycles, dependency, diagram, forbidden, files.
    pub checks: Vec<NamedCheck>,
}

impl ArchgraphConfig {
    /// Returns true if no checks are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Keeps only the checks whose names are listed.
    #[must_use]
    pub fn select(mut self, names: &[String]) -> Self {
        if !names.is_empty() {
            self.checks.retain(|c| names.contains(&c.name));
        }
        self
    }
}
