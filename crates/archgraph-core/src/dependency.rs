//! Should / should-not dependency rules between two filtered partitions.

use std::collections::HashSet;

use crate::edge::Edge;
use crate::nodes::project_to_nodes;
use crate::pattern::{describe, matches_all, Filter};
use crate::projection::{project_edges, select_edges, Projection};
use crate::violation::{
    DependencyViolation, EmptyPartition, EmptyResultViolation, Partition, Violation,
};

/// Errors in rule construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Neither side of the rule has a filter.
    #[error("rule has no filters on either side; it would apply to every unit")]
    NoFilters,
}

/// Direction of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleMode {
    /// Every dependency of an object must land in the subject partition.
    #[default]
    Should,
    /// No object may depend on a subject.
    ShouldNot,
}

impl RuleMode {
    /// Parses a mode from its configuration name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "should" => Some(Self::Should),
            "should-not" => Some(Self::ShouldNot),
            _ => None,
        }
    }
}

/// A dependency assertion between an object and a subject partition.
///
/// Partitions are the file-level vertices matching every filter of a side.
#[derive(Debug, Clone)]
pub struct DependencyRule {
    mode: RuleMode,
    objects: Vec<Filter>,
    subjects: Vec<Filter>,
    allow_empty: bool,
    include_external: bool,
}

impl DependencyRule {
    /// Creates a rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NoFilters`] if both filter sets are empty.
    pub fn new(
        mode: RuleMode,
        objects: Vec<Filter>,
        subjects: Vec<Filter>,
    ) -> Result<Self, RuleError> {
        if objects.is_empty() && subjects.is_empty() {
            return Err(RuleError::NoFilters);
        }
        Ok(Self {
            mode,
            objects,
            subjects,
            allow_empty: false,
            include_external: false,
        })
    }

    /// Suppresses the empty-result violation when a partition matches nothing.
    #[must_use]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Keeps external edges (and their targets) in the graph.
    #[must_use]
    pub fn include_external(mut self, include: bool) -> Self {
        self.include_external = include;
        self
    }

    /// Returns the rule direction.
    #[must_use]
    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    /// Evaluates the rule against raw edges.
    #[must_use]
    pub fn check(&self, edges: &[Edge]) -> Vec<Violation> {
        let projected = project_edges(
            select_edges(edges, !self.include_external),
            &Projection::Identity,
        );
        let nodes = project_to_nodes(&projected, false);

        let objects: HashSet<&str> = nodes
            .iter()
            .map(|n| n.label)
            .filter(|label| matches_all(&self.objects, label))
            .collect();
        let subjects: HashSet<&str> = nodes
            .iter()
            .map(|n| n.label)
            .filter(|label| matches_all(&self.subjects, label))
            .collect();

        tracing::debug!(
            "Dependency rule partitions: {} object(s), {} subject(s)",
            objects.len(),
            subjects.len()
        );

        if !self.allow_empty {
            let mut partitions = Vec::new();
            if objects.is_empty() {
                partitions.push(EmptyPartition {
                    partition: Partition::Object,
                    filters: describe(&self.objects),
                });
            }
            if subjects.is_empty() {
                partitions.push(EmptyPartition {
                    partition: Partition::Subject,
                    filters: describe(&self.subjects),
                });
            }
            if !partitions.is_empty() {
                return vec![Violation::EmptyResult(EmptyResultViolation { partitions })];
            }
        }

        projected
            .iter()
            .filter(|edge| !edge.is_self_loop())
            .filter(|edge| objects.contains(edge.source_label.as_str()))
            .filter(|edge| {
                let in_subjects = subjects.contains(edge.target_label.as_str());
                match self.mode {
                    RuleMode::Should => !in_subjects,
                    RuleMode::ShouldNot => in_subjects,
                }
            })
            .map(|edge| {
                Violation::Dependency(DependencyViolation {
                    edge: edge.clone(),
                    negated: self.mode == RuleMode::ShouldNot,
                })
            })
            .collect()
    }
}
