use crate::edge::ProjectedEdge;
use crate::violation::{DiagramReason, DiagramViolation, Rule, Violation};

use super::Diagram;

/// Flags projected edges that the diagram does not declare.
#[derive(Debug, Clone)]
pub struct DiagramCheck {
    diagram: Diagram,
    ignore_unknown_nodes: bool,
}

impl DiagramCheck {
    /// Creates a check against `diagram`.
    #[must_use]
    pub fn new(diagram: Diagram) -> Self {
        Self {
            diagram,
            ignore_unknown_nodes: false,
        }
    }

    /// Tolerates edges touching labels the diagram does not model.
    #[must_use]
    pub fn ignore_unknown_nodes(mut self, ignore: bool) -> Self {
        self.ignore_unknown_nodes = ignore;
        self
    }

    /// Returns the diagram.
    #[must_use]
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Checks every projected edge.
    ///
    /// Edges within one label never violate. An edge between two declared
    /// components violates iff its relation is undeclared. An edge touching
    /// an undeclared label violates unless unknown nodes are ignored.
    #[must_use]
    pub fn check(&self, edges: &[ProjectedEdge]) -> Vec<Violation> {
        edges
            .iter()
            .filter(|edge| !edge.is_self_loop())
            .filter_map(|edge| {
                let known = self.diagram.declares(&edge.source_label)
                    && self.diagram.declares(&edge.target_label);
                let reason = if known {
                    if self.diagram.allows(&edge.source_label, &edge.target_label) {
                        return None;
                    }
                    DiagramReason::UndeclaredRelation
                } else if self.ignore_unknown_nodes {
                    return None;
                } else {
                    DiagramReason::UnknownComponent
                };
                Some(Violation::Diagram(DiagramViolation {
                    edge: edge.clone(),
                    rule: None,
                    reason,
                }))
            })
            .collect()
    }
}

/// Flags projected edges matching an explicit forbidden relation.
#[derive(Debug, Clone, Default)]
pub struct ForbiddenCheck {
    rules: Vec<Rule>,
}

impl ForbiddenCheck {
    /// Creates a check over `rules`.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Returns the forbidden relations.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Reports one violation per edge that a forbidden rule covers.
    #[must_use]
    pub fn check(&self, edges: &[ProjectedEdge]) -> Vec<Violation> {
        edges
            .iter()
            .filter_map(|edge| {
                let rule = self.rules.iter().find(|rule| rule.covers(edge))?;
                Some(Violation::Diagram(DiagramViolation {
                    edge: edge.clone(),
                    rule: Some(rule.clone()),
                    reason: DiagramReason::Forbidden,
                }))
            })
            .collect()
    }
}
