//! Specifier resolution to root-relative unit identifiers.

use std::collections::HashSet;

use crate::tsconfig::TsConfig;

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A unit of the project, as a root-relative identifier.
    Internal(String),
    /// Anything else; carries the specifier as written.
    External(String),
}

/// Resolves specifiers against the set of scanned units.
#[derive(Debug, Clone)]
pub struct Resolver {
    units: HashSet<String>,
    extensions: Vec<String>,
    tsconfig: TsConfig,
}

impl Resolver {
    /// Creates a resolver over root-relative `units`, probing `extensions`.
    #[must_use]
    pub fn new(units: HashSet<String>, extensions: Vec<String>, tsconfig: TsConfig) -> Self {
        Self {
            units,
            extensions,
            tsconfig,
        }
    }

    /// Resolves `specifier` as imported from the unit `from`.
    #[must_use]
    pub fn resolve(&self, from: &str, specifier: &str) -> Resolution {
        let candidates = if is_relative(specifier) {
            let dir = from.rsplit_once('/').map_or("", |(dir, _)| dir);
            let joined = if dir.is_empty() {
                specifier.to_string()
            } else {
                format!("{dir}/{specifier}")
            };
            normalize(&joined).into_iter().collect()
        } else if specifier.starts_with('/') {
            Vec::new()
        } else {
            self.tsconfig.candidates(specifier)
        };

        for candidate in &candidates {
            if let Some(unit) = self.probe(candidate) {
                return Resolution::Internal(unit);
            }
        }
        if !candidates.is_empty() {
            tracing::debug!("Unresolved import '{specifier}' in {from}");
        }
        Resolution::External(specifier.to_string())
    }

    /// Finds the unit a path refers to: itself, with an extension, or its `index`.
    fn probe(&self, path: &str) -> Option<String> {
        if self.units.contains(path) {
            return Some(path.to_string());
        }
        // `./x.js` in TS sources refers to `x.ts`
        let stems = [Some(path), strip_script_extension(path)];
        for stem in stems.into_iter().flatten() {
            for ext in &self.extensions {
                let file = format!("{stem}.{ext}");
                if self.units.contains(&file) {
                    return Some(file);
                }
            }
        }
        self.extensions.iter().find_map(|ext| {
            let index = if path.is_empty() {
                format!("index.{ext}")
            } else {
                format!("{path}/index.{ext}")
            };
            self.units.contains(&index).then_some(index)
        })
    }
}

fn is_relative(specifier: &str) -> bool {
    matches!(specifier, "." | "..") || specifier.starts_with("./") || specifier.starts_with("../")
}

fn strip_script_extension(path: &str) -> Option<&str> {
    [".js", ".jsx", ".mjs", ".cjs"]
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
}

/// Collapses `.` and `..` segments of a `/`-separated relative path.
///
/// Returns `None` if the path climbs above its root.
#[must_use]
pub fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
