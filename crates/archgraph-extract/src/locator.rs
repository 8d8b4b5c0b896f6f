//! What to extract from, and how.

use archgraph_core::declarative::{ExtractionSettings, ExtractionSource};
use archgraph_core::GlobPattern;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Where raw edges come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeLocator {
    /// A JSON array in the raw edge schema.
    EdgeFile(PathBuf),
    /// A `tsconfig.json` file, or a directory to scan.
    Project(PathBuf),
}

impl EdgeLocator {
    /// Builds a locator from configured settings, scanning `root` when
    /// nothing is configured.
    #[must_use]
    pub fn from_settings(settings: &ExtractionSettings, root: &Path) -> Self {
        match &settings.source {
            Some(ExtractionSource::EdgeFile(path)) => Self::EdgeFile(path.clone()),
            Some(ExtractionSource::Project(path)) => Self::Project(path.clone()),
            None => Self::Project(root.to_path_buf()),
        }
    }

    /// Key under which extracted edges are cached.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EdgeLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EdgeFile(path) => write!(f, "edges:{}", path.display()),
            Self::Project(path) => write!(f, "project:{}", path.display()),
        }
    }
}

/// Options for project scans.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Root-relative units to skip as import sources.
    pub exclude: Vec<GlobPattern>,
    /// Extensions to scan, without the dot.
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ScanOptions {
    /// Takes exclusions and extensions from configured settings.
    #[must_use]
    pub fn from_settings(settings: &ExtractionSettings) -> Self {
        let mut options = Self {
            exclude: settings.exclude.clone(),
            ..Self::default()
        };
        if !settings.extensions.is_empty() {
            options.extensions.clone_from(&settings.extensions);
        }
        options
    }

    pub(crate) fn is_excluded(&self, unit: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(unit))
    }

    pub(crate) fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}
