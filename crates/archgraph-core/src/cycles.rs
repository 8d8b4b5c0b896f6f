//! Elementary cycle enumeration over projected edges.
//!
//! Vertices are ordered by label. For every start vertex `s`, a depth-first
//! search with an explicit path stack walks only vertices ordered after `s`
//! and emits a cycle whenever an edge closes back onto `s`. Each elementary
//! cycle is therefore reported exactly once, rotated to begin at its
//! smallest label, independent of input order. Path depth never exceeds the
//! vertex count.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::edge::ProjectedEdge;

/// A closed walk of at least two projected edges, starting at its smallest label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    edges: Vec<ProjectedEdge>,
}

impl Cycle {
    /// Returns the edges in walk order, with full raw-edge provenance.
    #[must_use]
    pub fn edges(&self) -> &[ProjectedEdge] {
        &self.edges
    }

    /// Returns the visited labels in order, without repeating the start.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.source_label.as_str()).collect()
    }

    /// Number of edges in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always false; cycles are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in &self.edges {
            write!(f, "{} -> ", edge.source_label)?;
        }
        match self.edges.first() {
            Some(first) => write!(f, "{}", first.source_label),
            None => Ok(()),
        }
    }
}

/// Limits for a cycle search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOptions {
    /// Stop after this many cycles have been found.
    pub max_cycles: Option<usize>,
}

/// Outcome of a cycle search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSearch {
    /// Cycles found, ordered by start label then walk.
    pub cycles: Vec<Cycle>,
    /// True if the search stopped at `max_cycles`.
    pub truncated: bool,
}

/// Enumerates every elementary cycle.
///
/// Self-loops are never part of a cycle and are skipped.
#[must_use]
pub fn find_cycles(edges: &[ProjectedEdge]) -> Vec<Cycle> {
    search_cycles(edges, CycleOptions::default()).cycles
}

/// Enumerates elementary cycles, honouring `options`.
#[must_use]
pub fn search_cycles(edges: &[ProjectedEdge], options: CycleOptions) -> CycleSearch {
    let graph = Graph::new(edges);
    let mut search = CycleSearch::default();

    let mut on_path = vec![false; graph.adjacency.len()];

    'starts: for start in 0..graph.adjacency.len() {
        // (vertex, index of the next outgoing edge to try)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        let mut path: Vec<&ProjectedEdge> = Vec::new();
        on_path[start] = true;

        while let Some(&(vertex, next)) = stack.last() {
            let Some(&(target, edge)) = graph.adjacency[vertex].get(next) else {
                stack.pop();
                on_path[vertex] = false;
                path.pop();
                continue;
            };
            let top = stack.len() - 1;
            stack[top].1 += 1;

            if target == start {
                // only a cycle beyond the limit marks the search incomplete
                if options
                    .max_cycles
                    .is_some_and(|max| search.cycles.len() >= max)
                {
                    search.truncated = true;
                    break 'starts;
                }
                let mut closed: Vec<ProjectedEdge> = path.iter().map(|e| (*e).clone()).collect();
                closed.push(edge.clone());
                search.cycles.push(Cycle { edges: closed });
            } else if target > start && !on_path[target] {
                on_path[target] = true;
                path.push(edge);
                stack.push((target, 0));
            }
        }
    }

    if search.truncated {
        tracing::warn!(
            "Cycle search stopped after {} cycle(s); results are incomplete",
            search.cycles.len()
        );
    }
    tracing::debug!("Found {} cycle(s)", search.cycles.len());
    search
}

/// Index-based adjacency over labels sorted ascending.
struct Graph<'a> {
    adjacency: Vec<Vec<(usize, &'a ProjectedEdge)>>,
}

impl<'a> Graph<'a> {
    fn new(edges: &'a [ProjectedEdge]) -> Self {
        let labels: BTreeSet<&str> = edges
            .iter()
            .filter(|e| !e.is_self_loop())
            .flat_map(|e| [e.source_label.as_str(), e.target_label.as_str()])
            .collect();
        let index: HashMap<&str, usize> = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label, i))
            .collect();

        let mut adjacency: Vec<Vec<(usize, &ProjectedEdge)>> = vec![Vec::new(); index.len()];
        for edge in edges.iter().filter(|e| !e.is_self_loop()) {
            let (Some(&source), Some(&target)) = (
                index.get(edge.source_label.as_str()),
                index.get(edge.target_label.as_str()),
            ) else {
                continue;
            };
            adjacency[source].push((target, edge));
        }
        for list in &mut adjacency {
            list.sort_by_key(|(target, _)| *target);
            list.dedup_by_key(|(target, _)| *target);
        }

        Self { adjacency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::projection::{project_edges, Projection};

    fn projected(pairs: &[(&str, &str)]) -> Vec<ProjectedEdge> {
        let raw: Vec<Edge> = pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect();
        project_edges(&raw, &Projection::Identity)
    }

    fn rendered(cycles: &[Cycle]) -> Vec<String> {
        cycles.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_graph_has_no_cycles() {
        assert!(find_cycles(&[]).is_empty());
    }

    #[test]
    fn triangle_is_one_cycle() {
        let cycles = find_cycles(&projected(&[("a", "b"), ("b", "c"), ("c", "a")]));
        assert_eq!(rendered(&cycles), vec!["a -> b -> c -> a"]);
        assert_eq!(cycles[0].len(), 3);
    }

    #[test]
    fn two_independent_back_and_forth_cycles() {
        let cycles = find_cycles(&projected(&[("a", "b"), ("b", "a"), ("a", "d"), ("d", "a")]));
        assert_eq!(rendered(&cycles), vec!["a -> b -> a", "a -> d -> a"]);
    }

    #[test]
    fn rotation_starts_at_smallest_label() {
        let cycles = find_cycles(&projected(&[("c", "a"), ("b", "c"), ("a", "b")]));
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].labels(), vec!["a", "b", "c"]);
    }

    #[test]
    fn self_loops_are_never_cycles() {
        let cycles = find_cycles(&projected(&[("a", "a"), ("a", "b"), ("b", "a"), ("b", "b")]));
        assert_eq!(rendered(&cycles), vec!["a -> b -> a"]);
        assert!(cycles
            .iter()
            .flat_map(|c| c.edges())
            .all(|e| !e.is_self_loop()));
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        assert!(find_cycles(&projected(&[("a", "b"), ("b", "c"), ("a", "c")])).is_empty());
    }

    #[test]
    fn distinct_orders_over_same_vertices_are_distinct_cycles() {
        let cycles = find_cycles(&projected(&[
            ("a", "b"),
            ("b", "c"),
            ("c", "a"),
            ("a", "c"),
            ("c", "b"),
            ("b", "a"),
        ]));
        let mut got = rendered(&cycles);
        got.sort();
        assert_eq!(
            got,
            vec![
                "a -> b -> a",
                "a -> b -> c -> a",
                "a -> c -> a",
                "a -> c -> b -> a",
                "b -> c -> b",
            ]
        );
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let pairs = [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "c"), ("b", "a")];
        let forward = find_cycles(&projected(&pairs));
        let mut reversed = pairs;
        reversed.reverse();
        let backward = find_cycles(&projected(&reversed));
        assert_eq!(rendered(&forward), rendered(&backward));
    }

    #[test]
    fn cycles_keep_raw_edge_provenance() {
        let raw = vec![
            Edge::new("src/a/x.ts", "src/b/y.ts"),
            Edge::new("src/a/z.ts", "src/b/y.ts"),
            Edge::new("src/b/y.ts", "src/a/x.ts"),
        ];
        let slices = crate::projection::SlicePattern::from_glob("src/(*)/").unwrap();
        let cycles = find_cycles(&project_edges(&raw, &Projection::Slices(slices)));
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].edges()[0].cumulated_edges.len(), 2);
        assert_eq!(cycles[0].edges()[1].cumulated_edges[0], raw[2]);
    }

    #[test]
    fn max_cycles_truncates_search() {
        let edges = projected(&[("a", "b"), ("b", "a"), ("a", "c"), ("c", "a")]);
        let search = search_cycles(&edges, CycleOptions { max_cycles: Some(1) });
        assert_eq!(search.cycles.len(), 1);
        assert!(search.truncated);

        let full = search_cycles(&edges, CycleOptions { max_cycles: Some(5) });
        assert_eq!(full.cycles.len(), 2);
        assert!(!full.truncated);

        let exact = search_cycles(&edges, CycleOptions { max_cycles: Some(2) });
        assert_eq!(exact.cycles.len(), 2);
        assert!(!exact.truncated);
    }

    #[test]
    fn zero_limit_is_truncated_only_when_a_cycle_exists() {
        let acyclic = projected(&[("a", "b"), ("b", "c")]);
        let search = search_cycles(&acyclic, CycleOptions { max_cycles: Some(0) });
        assert!(search.cycles.is_empty());
        assert!(!search.truncated);

        let cyclic = projected(&[("a", "b"), ("b", "a")]);
        let search = search_cycles(&cyclic, CycleOptions { max_cycles: Some(0) });
        assert!(search.cycles.is_empty());
        assert!(search.truncated);
    }
}
