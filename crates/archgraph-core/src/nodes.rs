//! Vertex view over projected edges.

use std::collections::BTreeMap;

use crate::edge::ProjectedEdge;

/// A labeled vertex with its incident edges.
///
/// Borrows from the projected edge list it was built from; it is a
/// recomputed view and never owns or mutates edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    /// Vertex label.
    pub label: &'a str,
    /// Edges whose target is this vertex.
    pub incoming: Vec<&'a ProjectedEdge>,
    /// Edges whose source is this vertex.
    pub outgoing: Vec<&'a ProjectedEdge>,
}

impl<'a> Node<'a> {
    fn new(label: &'a str) -> Self {
        Self {
            label,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Labels this vertex depends on.
    #[must_use]
    pub fn dependencies(&self) -> Vec<&'a str> {
        self.outgoing.iter().map(|e| e.target_label.as_str()).collect()
    }

    /// Labels that depend on this vertex.
    #[must_use]
    pub fn dependents(&self) -> Vec<&'a str> {
        self.incoming.iter().map(|e| e.source_label.as_str()).collect()
    }
}

/// Derives the distinct vertices of an edge set, sorted by label.
///
/// With `ignore_external`, edges made only of external imports are skipped
/// before vertices are collected.
#[must_use]
pub fn project_to_nodes(edges: &[ProjectedEdge], ignore_external: bool) -> Vec<Node<'_>> {
    let mut nodes: BTreeMap<&str, Node<'_>> = BTreeMap::new();

    for edge in edges {
        if ignore_external && edge.is_external() {
            continue;
        }
        nodes
            .entry(edge.source_label.as_str())
            .or_insert_with_key(|label| Node::new(*label))
            .outgoing
            .push(edge);
        nodes
            .entry(edge.target_label.as_str())
            .or_insert_with_key(|label| Node::new(*label))
            .incoming
            .push(edge);
    }

    nodes.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::projection::{project_edges, Projection};

    #[test]
    fn collects_distinct_labels_with_adjacency() {
        let raw = vec![
            Edge::new("b", "c"),
            Edge::new("a", "b"),
            Edge::new("a", "c"),
            Edge::new("a", "b"),
        ];
        let projected = project_edges(&raw, &Projection::Identity);
        let nodes = project_to_nodes(&projected, false);

        let labels: Vec<&str> = nodes.iter().map(|n| n.label).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(nodes[0].dependencies(), vec!["b", "c"]);
        assert!(nodes[0].incoming.is_empty());
        assert_eq!(nodes[2].dependents(), vec!["b", "a"]);
    }

    #[test]
    fn external_edges_can_be_dropped() {
        let raw = vec![Edge::new("a", "b"), Edge::external("a", "react")];
        let projected = project_edges(&raw, &Projection::Identity);

        assert_eq!(project_to_nodes(&projected, false).len(), 3);
        let internal = project_to_nodes(&projected, true);
        assert_eq!(internal.len(), 2);
        assert_eq!(internal[0].outgoing.len(), 1);
    }

    #[test]
    fn self_loop_is_both_incoming_and_outgoing() {
        let projected = project_edges(&[Edge::new("a", "a")], &Projection::Identity);
        let nodes = project_to_nodes(&projected, false);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].incoming.len(), 1);
        assert_eq!(nodes[0].outgoing.len(), 1);
    }
}
