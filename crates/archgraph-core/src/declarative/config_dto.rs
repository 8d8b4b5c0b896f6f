//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw TOML representation of `archgraph.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchgraphConfigDto {
    /// Where raw edges come from.
    #[serde(default)]
    pub extraction: ExtractionDto,

    /// Cycle-freedom checks.
    #[serde(default)]
    pub cycles: Vec<CyclesDto>,

    /// Should / should-not dependency rules.
    #[serde(default)]
    pub dependency: Vec<DependencyDto>,

    /// Diagram conformance checks.
    #[serde(default)]
    pub diagram: Vec<DiagramDto>,

    /// Forbidden relation lists.
    #[serde(default)]
    pub forbidden: Vec<ForbiddenDto>,

    /// Node-level file rules.
    #[serde(default)]
    pub files: Vec<FilesDto>,
}

/// `[extraction]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionDto {
    /// JSON edge file (mutually exclusive with `project`).
    #[serde(default)]
    pub edges: Option<String>,
    /// tsconfig.json or project directory to scan.
    #[serde(default)]
    pub project: Option<String>,
    /// Glob patterns of units to skip while scanning.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Source extensions to scan (without the dot).
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Projection policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProjectionDto {
    /// Label is the unit identifier.
    #[default]
    Identity,
    /// One capture group picks the slice name.
    Slices {
        /// Glob with `(*)` or `(**)` capture.
        #[serde(default)]
        pattern: Option<String>,
        /// Raw regex with one capture group.
        #[serde(default)]
        regex: Option<String>,
    },
    /// Base-name suffix to group table.
    Suffix {
        /// Suffix → group.
        groups: BTreeMap<String, String>,
    },
}

/// A unit filter.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterDto {
    /// Glob pattern (mutually exclusive with `regex`).
    #[serde(default)]
    pub glob: Option<String>,
    /// Regex pattern (mutually exclusive with `glob`).
    #[serde(default)]
    pub regex: Option<String>,
    /// What part of the unit to match (default: "path").
    #[serde(default)]
    pub target: Option<String>,
}

/// `[[cycles]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CyclesDto {
    /// Check name.
    pub name: String,
    /// How units are grouped.
    #[serde(default)]
    pub projection: ProjectionDto,
    /// Drop external edges (default: true).
    #[serde(default = "default_true")]
    pub ignore_external: bool,
    /// Stop after this many cycles.
    #[serde(default)]
    pub max_cycles: Option<usize>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[dependency]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyDto {
    /// Check name.
    pub name: String,
    /// "should" or "should-not".
    pub mode: String,
    /// Object partition filters.
    #[serde(default)]
    pub objects: Vec<FilterDto>,
    /// Subject partition filters.
    #[serde(default)]
    pub subjects: Vec<FilterDto>,
    /// Suppress the empty-result violation.
    #[serde(default)]
    pub allow_empty: bool,
    /// Keep external edges.
    #[serde(default)]
    pub include_external: bool,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[diagram]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramDto {
    /// Check name.
    pub name: String,
    /// How units are grouped into components.
    #[serde(default)]
    pub projection: ProjectionDto,
    /// Diagram file, relative to the config (mutually exclusive with `text`).
    #[serde(default)]
    pub file: Option<String>,
    /// Inline diagram text.
    #[serde(default)]
    pub text: Option<String>,
    /// Tolerate labels the diagram does not model.
    #[serde(default)]
    pub ignore_unknown_nodes: bool,
    /// Drop external edges (default: true).
    #[serde(default = "default_true")]
    pub ignore_external: bool,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// One `{ from, to }` relation.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationDto {
    /// Source label.
    pub from: String,
    /// Target label.
    pub to: String,
}

/// `[[forbidden]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ForbiddenDto {
    /// Check name.
    pub name: String,
    /// How units are grouped.
    #[serde(default)]
    pub projection: ProjectionDto,
    /// Forbidden relations.
    pub rules: Vec<RelationDto>,
    /// Drop external edges (default: true).
    #[serde(default = "default_true")]
    pub ignore_external: bool,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[files]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesDto {
    /// Check name.
    pub name: String,
    /// Object partition filters.
    #[serde(default)]
    pub objects: Vec<FilterDto>,
    /// "should" (default) or "should-not".
    #[serde(default = "default_mode_str")]
    pub mode: String,
    /// What every object should match.
    pub pattern: FilterDto,
    /// Suppress the empty-result violation.
    #[serde(default)]
    pub allow_empty: bool,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

fn default_severity_str() -> String {
    "error".to_string()
}

fn default_mode_str() -> String {
    "should".to_string()
}

fn default_true() -> bool {
    true
}
