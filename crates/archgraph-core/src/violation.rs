//! Structured check outcomes.
//!
//! Every checker reports [`Violation`] values. Each variant carries enough
//! structure to rebuild a precise message, and formats itself through its
//! own `describe` function.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

use crate::cycles::Cycle;
use crate::edge::ProjectedEdge;

/// A directed relation between two labels, declared or forbidden.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Label of the depending side.
    pub source: String,
    /// Label of the depended-upon side.
    pub target: String,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns true if this rule covers the edge's label pair.
    #[must_use]
    pub fn covers(&self, edge: &ProjectedEdge) -> bool {
        self.source == edge.source_label && self.target == edge.target_label
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// An edge that breaks a should / should-not dependency rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyViolation {
    /// The offending edge.
    pub edge: ProjectedEdge,
    /// True for should-not rules (the edge exists but must not).
    pub negated: bool,
}

impl DependencyViolation {
    /// One-line summary followed by the raw imports behind the edge.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = if self.negated {
            format!("{} must not depend on {}", self.edge.source_label, self.edge.target_label)
        } else {
            format!(
                "{} depends on {}, which is outside the allowed targets",
                self.edge.source_label, self.edge.target_label
            )
        };
        write_imports(&mut out, &self.edge);
        out
    }
}

/// A dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleViolation {
    /// The full cycle, edges in walk order.
    pub cycle: Cycle,
}

impl CycleViolation {
    /// The cycle path followed by the raw imports of every edge.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!("cycle detected: {}", self.cycle);
        for edge in self.cycle.edges() {
            write_imports(&mut out, edge);
        }
        out
    }
}

/// Why an edge does not adhere to a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramReason {
    /// Both endpoints are declared but the relation is not.
    UndeclaredRelation,
    /// At least one endpoint is not a declared component.
    UnknownComponent,
    /// The edge matches an explicitly forbidden relation.
    Forbidden,
}

/// An edge that does not adhere to a diagram or forbidden-rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramViolation {
    /// The offending edge.
    pub edge: ProjectedEdge,
    /// The rule it matched (forbidden lists) or `None` when no rule allows it.
    pub rule: Option<Rule>,
    /// Why the edge was flagged.
    pub reason: DiagramReason,
}

impl DiagramViolation {
    /// One-line summary followed by the raw imports behind the edge.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = match (self.reason, &self.rule) {
            (DiagramReason::Forbidden, Some(rule)) => {
                format!("{} matches forbidden relation {rule}", self.edge)
            }
            (DiagramReason::Forbidden, None) => format!("{} is forbidden", self.edge),
            (DiagramReason::UnknownComponent, _) => {
                format!("{} involves a component missing from the diagram", self.edge)
            }
            (DiagramReason::UndeclaredRelation, _) => {
                format!("{} is not a relation of the diagram", self.edge)
            }
        };
        write_imports(&mut out, &self.edge);
        out
    }
}

/// Which side of a rule matched nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Partition {
    /// The units the rule is about.
    Object,
    /// The units the rule relates them to.
    Subject,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "objects"),
            Self::Subject => write!(f, "subjects"),
        }
    }
}

/// A filter set that matched no units at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyPartition {
    /// Which side of the rule.
    pub partition: Partition,
    /// Descriptions of the filters on that side.
    pub filters: Vec<String>,
}

/// A rule whose filters matched nothing; likely a mistyped pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResultViolation {
    /// The empty sides.
    pub partitions: Vec<EmptyPartition>,
}

impl EmptyResultViolation {
    /// Lists the filter sets that matched nothing.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::from("rule matched no units");
        for empty in &self.partitions {
            let filters = if empty.filters.is_empty() {
                "(any unit)".to_string()
            } else {
                empty.filters.join(" and ")
            };
            let _ = write!(out, "\n    {}: {filters}", empty.partition);
        }
        out
    }
}

/// A unit that breaks a file-level rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileViolation {
    /// The offending unit.
    pub unit: String,
    /// What the unit was expected to satisfy.
    pub expectation: String,
    /// True for should-not rules.
    pub negated: bool,
}

impl FileViolation {
    /// One-line summary.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.negated {
            format!("{} must not satisfy: {}", self.unit, self.expectation)
        } else {
            format!("{} does not satisfy: {}", self.unit, self.expectation)
        }
    }
}

/// Any finding produced by a checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Violation {
    /// Should / should-not dependency mismatch.
    Dependency(DependencyViolation),
    /// Dependency cycle.
    Cycle(CycleViolation),
    /// Diagram or forbidden-rule non-adherence.
    Diagram(DiagramViolation),
    /// Filters matched nothing.
    EmptyResult(EmptyResultViolation),
    /// File-level rule mismatch.
    File(FileViolation),
}

impl Violation {
    /// Short code identifying the violation kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Dependency(_) => "DEP001",
            Self::Cycle(_) => "CYCLE001",
            Self::Diagram(_) => "DIAGRAM001",
            Self::EmptyResult(_) => "EMPTY001",
            Self::File(_) => "FILE001",
        }
    }

    /// Multi-line description of the violation.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Dependency(v) => v.describe(),
            Self::Cycle(v) => v.describe(),
            Self::Diagram(v) => v.describe(),
            Self::EmptyResult(v) => v.describe(),
            Self::File(v) => v.describe(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.describe();
        let first = summary.lines().next().unwrap_or_default();
        write!(f, "[{}] {first}", self.code())
    }
}

fn write_imports(out: &mut String, edge: &ProjectedEdge) {
    for raw in &edge.cumulated_edges {
        let _ = write!(out, "\n    - {raw}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::find_cycles;
    use crate::edge::{Edge, ImportKind};
    use crate::projection::{project_edges, Projection};

    fn edge(source: &str, target: &str) -> ProjectedEdge {
        let raw = vec![Edge::new(source, target).with_kinds([ImportKind::Value, ImportKind::Named])];
        project_edges(&raw, &Projection::Identity).remove(0)
    }

    #[test]
    fn dependency_violation_lists_imports() {
        let v = Violation::Dependency(DependencyViolation {
            edge: edge("services/x", "controllers/y"),
            negated: true,
        });
        insta::assert_snapshot!(v.describe(), @r"
        services/x must not depend on controllers/y
            - services/x -> controllers/y [value, named]
        ");
        assert_eq!(
            v.to_string(),
            "[DEP001] services/x must not depend on controllers/y"
        );
    }

    #[test]
    fn cycle_violation_shows_full_path() {
        let raw = vec![Edge::new("a", "b"), Edge::new("b", "a")];
        let cycle = find_cycles(&project_edges(&raw, &Projection::Identity)).remove(0);
        let v = Violation::Cycle(CycleViolation { cycle });
        insta::assert_snapshot!(v.describe(), @r"
        cycle detected: a -> b -> a
            - a -> b
            - b -> a
        ");
    }

    #[test]
    fn forbidden_diagram_violation_names_rule() {
        let v = DiagramViolation {
            edge: edge("ui", "db"),
            rule: Some(Rule::new("ui", "db")),
            reason: DiagramReason::Forbidden,
        };
        assert!(v.describe().starts_with("ui -> db matches forbidden relation ui -> db"));
    }

    #[test]
    fn empty_result_lists_filters() {
        let v = Violation::EmptyResult(EmptyResultViolation {
            partitions: vec![EmptyPartition {
                partition: Partition::Object,
                filters: vec!["path matching glob \"srvices/**\"".to_string()],
            }],
        });
        insta::assert_snapshot!(v.describe(), @r#"
        rule matched no units
            objects: path matching glob "srvices/**"
        "#);
        assert_eq!(v.code(), "EMPTY001");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let v = Violation::File(FileViolation {
            unit: "src/a.ts".to_string(),
            expectation: "filename matching glob \"*.service.ts\"".to_string(),
            negated: false,
        });
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["kind"], "file");
        assert_eq!(json["unit"], "src/a.ts");
    }
}
