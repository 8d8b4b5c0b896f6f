//! Raw and projected import edges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a target was imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Runtime value import (anything that is not type-only).
    Value,
    /// `import type { .. }`
    Type,
    /// `import Foo from ..`
    Default,
    /// `import { foo } from ..`
    Named,
    /// `import * as ns from ..`
    Namespace,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::Type => write!(f, "type"),
            Self::Default => write!(f, "default"),
            Self::Named => write!(f, "named"),
            Self::Namespace => write!(f, "namespace"),
        }
    }
}

/// A directed import relation between two source units, as produced by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Importing unit (project-relative identifier).
    pub source: String,
    /// Imported unit, or the bare specifier when `external`.
    pub target: String,
    /// Target resolves outside the project's own tree.
    #[serde(default)]
    pub external: bool,
    /// Import kinds in declaration order; empty for side-effect-only imports.
    #[serde(default)]
    pub import_kinds: Vec<ImportKind>,
}

impl Edge {
    /// Creates an internal edge without import kinds.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            external: false,
            import_kinds: Vec::new(),
        }
    }

    /// Creates an edge to a unit outside the project.
    #[must_use]
    pub fn external(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            external: true,
            ..Self::new(source, target)
        }
    }

    /// Sets the import kinds of this edge.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ImportKind>) -> Self {
        self.import_kinds = kinds.into_iter().collect();
        self
    }

    /// Returns true if the import only pulls in types.
    #[must_use]
    pub fn is_type_only(&self) -> bool {
        self.import_kinds.contains(&ImportKind::Type)
            && !self.import_kinds.contains(&ImportKind::Value)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)?;
        if self.external {
            write!(f, " (external)")?;
        }
        if !self.import_kinds.is_empty() {
            let kinds: Vec<String> = self.import_kinds.iter().map(ToString::to_string).collect();
            write!(f, " [{}]", kinds.join(", "))?;
        }
        Ok(())
    }
}

/// Raw edges aggregated under one `(source_label, target_label)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedEdge {
    /// Label of the source side.
    pub source_label: String,
    /// Label of the target side.
    pub target_label: String,
    /// Raw edges that projected onto this pair, in input order.
    pub cumulated_edges: Vec<Edge>,
}

impl ProjectedEdge {
    /// Creates an empty bucket for a label pair.
    #[must_use]
    pub fn new(source_label: impl Into<String>, target_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            target_label: target_label.into(),
            cumulated_edges: Vec::new(),
        }
    }

    /// Returns true if both labels are the same.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source_label == self.target_label
    }

    /// Returns true if every raw edge in this bucket is external.
    #[must_use]
    pub fn is_external(&self) -> bool {
        !self.cumulated_edges.is_empty() && self.cumulated_edges.iter().all(|e| e.external)
    }
}

impl fmt::Display for ProjectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_label, self.target_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_raw_edge_schema() {
        let json = r#"{"source":"src/a.ts","target":"src/b.ts","external":false,"importKinds":["type","named"]}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(edge.source, "src/a.ts");
        assert_eq!(edge.import_kinds, vec![ImportKind::Type, ImportKind::Named]);
        assert!(edge.is_type_only());
    }

    #[test]
    fn missing_kinds_default_to_side_effect_import() {
        let edge: Edge = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert!(!edge.external);
        assert!(edge.import_kinds.is_empty());
    }

    #[test]
    fn display_lists_kinds_and_external_marker() {
        let edge = Edge::external("src/a.ts", "lodash").with_kinds([ImportKind::Default]);
        assert_eq!(edge.to_string(), "src/a.ts -> lodash (external) [default]");
    }

    #[test]
    fn projected_edge_external_requires_all_raw_edges_external() {
        let mut bucket = ProjectedEdge::new("a", "b");
        assert!(!bucket.is_external());
        bucket.cumulated_edges.push(Edge::external("a", "b"));
        assert!(bucket.is_external());
        bucket.cumulated_edges.push(Edge::new("a", "b"));
        assert!(!bucket.is_external());
    }
}
