//! Node-level rules: naming conventions, folder placement, custom predicates.

use std::fmt;
use std::sync::Arc;

use crate::dependency::{RuleError, RuleMode};
use crate::edge::Edge;
use crate::nodes::{project_to_nodes, Node};
use crate::pattern::{describe, matches_all, Filter};
use crate::projection::{project_edges, select_edges, Projection};
use crate::violation::{
    EmptyPartition, EmptyResultViolation, FileViolation, Partition, Violation,
};

type NodePredicate = dyn Fn(&Node<'_>) -> bool + Send + Sync;

/// What every object unit should (or should not) satisfy.
#[derive(Clone)]
pub enum FileAssertion {
    /// The unit matches a filter.
    Matches(Filter),
    /// A custom predicate over the vertex and its adjacency.
    Predicate {
        /// Text used in violation messages.
        description: String,
        /// The check itself.
        predicate: Arc<NodePredicate>,
    },
}

impl FileAssertion {
    /// Wraps a closure as an assertion.
    pub fn predicate<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Node<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    fn holds(&self, node: &Node<'_>) -> bool {
        match self {
            Self::Matches(filter) => filter.matches(node.label),
            Self::Predicate { predicate, .. } => predicate(node),
        }
    }
}

impl fmt::Display for FileAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matches(filter) => write!(f, "{filter}"),
            Self::Predicate { description, .. } => write!(f, "{description}"),
        }
    }
}

impl fmt::Debug for FileAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matches(filter) => f.debug_tuple("Matches").field(filter).finish(),
            Self::Predicate { description, .. } => f
                .debug_struct("Predicate")
                .field("description", description)
                .finish_non_exhaustive(),
        }
    }
}

/// Asserts something about every unit in the object partition.
#[derive(Debug, Clone)]
pub struct FileRule {
    objects: Vec<Filter>,
    mode: RuleMode,
    assertion: FileAssertion,
    allow_empty: bool,
}

impl FileRule {
    /// Creates a file rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NoFilters`] when there are no object filters and
    /// the assertion is a custom predicate, so neither side constrains units.
    pub fn new(
        objects: Vec<Filter>,
        mode: RuleMode,
        assertion: FileAssertion,
    ) -> Result<Self, RuleError> {
        if objects.is_empty() && matches!(assertion, FileAssertion::Predicate { .. }) {
            return Err(RuleError::NoFilters);
        }
        Ok(Self {
            objects,
            mode,
            assertion,
            allow_empty: false,
        })
    }

    /// Suppresses the empty-result violation.
    #[must_use]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Evaluates the rule over the internal vertices of `edges`.
    #[must_use]
    pub fn check(&self, edges: &[Edge]) -> Vec<Violation> {
        let projected = project_edges(select_edges(edges, true), &Projection::Identity);
        let nodes = project_to_nodes(&projected, true);
        let objects: Vec<&Node<'_>> = nodes
            .iter()
            .filter(|node| matches_all(&self.objects, node.label))
            .collect();

        if objects.is_empty() {
            if self.allow_empty {
                return Vec::new();
            }
            return vec![Violation::EmptyResult(EmptyResultViolation {
                partitions: vec![EmptyPartition {
                    partition: Partition::Object,
                    filters: describe(&self.objects),
                }],
            })];
        }

        let negated = self.mode == RuleMode::ShouldNot;
        let expectation = self.assertion.to_string();
        objects
            .into_iter()
            .filter(|node| self.assertion.holds(node) == negated)
            .map(|node| {
                Violation::File(FileViolation {
                    unit: node.label.to_string(),
                    expectation: expectation.clone(),
                    negated,
                })
            })
            .collect()
    }
}
