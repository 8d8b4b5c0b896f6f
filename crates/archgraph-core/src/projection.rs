//! Graph projection: relabels raw edges and merges parallel ones.
//!
//! A [`Projection`] maps each raw [`Edge`] to an optional label pair. Edges
//! mapping to nothing are excluded entirely; all others are bucketed into
//! one [`ProjectedEdge`] per ordered label pair.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::edge::{Edge, ProjectedEdge};
use crate::pattern::{file_name, PatternError};

/// Labels units by a single capture group of a path pattern.
#[derive(Debug, Clone)]
pub struct SlicePattern {
    raw: String,
    regex: Regex,
}

impl SlicePattern {
    /// Compiles a glob-style slice pattern.
    ///
    /// `(**)` captures one or more whole path segments (the fewest that let
    /// the rest of the pattern match), `(*)` captures exactly one segment. Outside the capture, `**` spans
    /// segments, `*` stays within one and `?` matches one character.
    /// The pattern is matched from the start of the identifier.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern does not contain exactly one capture.
    pub fn from_glob(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let (translated, captures) =
            translate_slice_glob(pattern).map_err(|c| PatternError::InvalidGlob {
                pattern: pattern.to_string(),
                reason: format!("`{c}` is only allowed in `(*)` or `(**)`"),
            })?;
        if captures != 1 {
            return Err(PatternError::CaptureGroups {
                pattern: pattern.to_string(),
                found: captures,
            });
        }
        let regex = Regex::new(&translated).map_err(|e| PatternError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// Compiles a raw regex slice pattern (unanchored search).
    ///
    /// # Errors
    ///
    /// Returns error if the regex is invalid or has other than one capture group.
    pub fn from_regex(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let regex = Regex::new(pattern).map_err(|e| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let found = regex.captures_len() - 1;
        if found != 1 {
            return Err(PatternError::CaptureGroups {
                pattern: pattern.to_string(),
                found,
            });
        }
        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// Returns the captured slice name, or `None` if the unit is not in any slice.
    #[must_use]
    pub fn label(&self, unit: &str) -> Option<String> {
        self.regex
            .captures(unit)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Translates a slice glob into an anchored regex, counting captures.
///
/// Returns the offending character for parentheses outside `(*)` / `(**)`.
fn translate_slice_glob(pattern: &str) -> Result<(String, usize), char> {
    let mut out = String::from("^");
    let mut captures = 0;
    let mut rest = pattern;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("(**)") {
            // whole segments only; shortest match unless the capture ends the pattern
            if tail.is_empty() {
                out.push_str("([^/]+(?:/[^/]+)*)");
            } else {
                out.push_str("([^/]+(?:/[^/]+)*?)");
            }
            captures += 1;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("(*)") {
            out.push_str("([^/]+)");
            captures += 1;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("**") {
            out.push_str(".*");
            rest = tail;
        } else {
            let mut chars = rest.chars();
            let Some(c) = chars.next() else { break };
            match c {
                '*' => out.push_str("[^/]*"),
                '?' => out.push_str("[^/]"),
                '(' | ')' => return Err(c),
                other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
            rest = chars.as_str();
        }
    }
    Ok((out, captures))
}

/// Classifies units by the suffix of their base name.
///
/// Resolution uses longest-suffix-match so that `.spec.ts` wins over `.ts`.
#[derive(Debug, Clone, Default)]
pub struct SuffixTable {
    /// (suffix, group) sorted by suffix length descending.
    map: Vec<(String, String)>,
}

impl SuffixTable {
    /// Builds a table from `(suffix, group)` pairs.
    #[must_use]
    pub fn new<I, S, G>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, G)>,
        S: Into<String>,
        G: Into<String>,
    {
        let mut map: Vec<(String, String)> = entries
            .into_iter()
            .map(|(s, g)| (s.into(), g.into()))
            .collect();
        map.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { map }
    }

    /// Which group does this unit belong to?
    #[must_use]
    pub fn resolve(&self, unit: &str) -> Option<&str> {
        let name = file_name(unit);
        self.map
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix.as_str()))
            .map(|(_, group)| group.as_str())
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The closed set of projection policies.
#[derive(Debug, Clone, Default)]
pub enum Projection {
    /// Label is the raw identifier.
    #[default]
    Identity,
    /// Label is the slice captured by a path pattern; edges with an
    /// unmatched endpoint are dropped.
    Slices(SlicePattern),
    /// Label is the group of the longest matching base-name suffix; edges
    /// with an unclassified endpoint are dropped.
    Suffix(SuffixTable),
}

impl Projection {
    /// Maps one raw edge to its label pair.
    #[must_use]
    pub fn project(&self, edge: &Edge) -> Option<(String, String)> {
        match self {
            Self::Identity => Some((edge.source.clone(), edge.target.clone())),
            Self::Slices(pattern) => {
                let source = pattern.label(&edge.source)?;
                let target = pattern.label(&edge.target)?;
                Some((source, target))
            }
            Self::Suffix(table) => {
                let source = table.resolve(&edge.source)?;
                let target = table.resolve(&edge.target)?;
                Some((source.to_string(), target.to_string()))
            }
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Slices(pattern) => write!(f, "slices of \"{}\"", pattern.as_str()),
            Self::Suffix(table) => write!(f, "suffix groups ({})", table.map.len()),
        }
    }
}

/// Projects raw edges and merges edges sharing a label pair.
///
/// Buckets keep first-seen order; each raw edge lands in at most one bucket.
pub fn project_edges<'a, I>(edges: I, projection: &Projection) -> Vec<ProjectedEdge>
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut buckets: Vec<ProjectedEdge> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for edge in edges {
        let Some(key) = projection.project(edge) else {
            continue;
        };
        let slot = *index.entry(key).or_insert_with_key(|(source, target)| {
            buckets.push(ProjectedEdge::new(source.clone(), target.clone()));
            buckets.len() - 1
        });
        buckets[slot].cumulated_edges.push(edge.clone());
    }

    tracing::debug!(
        "Projected into {} edge(s) using {}",
        buckets.len(),
        projection
    );
    buckets
}

/// Iterates over edges, dropping external ones when `ignore_external` is set.
pub fn select_edges(edges: &[Edge], ignore_external: bool) -> impl Iterator<Item = &Edge> {
    edges.iter().filter(move |e| !(ignore_external && e.external))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        let none: Vec<Edge> = Vec::new();
        assert!(project_edges(&none, &Projection::Identity).is_empty());
    }

    #[test]
    fn identity_merges_parallel_edges() {
        let raw = edges(&[("a", "b"), ("a", "b"), ("b", "a")]);
        let projected = project_edges(&raw, &Projection::Identity);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].to_string(), "a -> b");
        assert_eq!(projected[0].cumulated_edges.len(), 2);
        assert_eq!(projected[1].to_string(), "b -> a");
    }

    #[test]
    fn slices_capture_first_folder() {
        let pattern = SlicePattern::from_glob("src/(**)/").unwrap();
        assert_eq!(pattern.label("src/billing/invoice.ts").as_deref(), Some("billing"));
        assert_eq!(pattern.label("src/billing/deep/x.ts").as_deref(), Some("billing"));
        assert_eq!(pattern.label("src/root.ts"), None);
        assert_eq!(pattern.label("lib/billing/x.ts"), None);
    }

    #[test]
    fn trailing_capture_takes_the_rest_of_the_path() {
        let pattern = SlicePattern::from_glob("src/(**)").unwrap();
        assert_eq!(
            pattern.label("src/billing/invoice.ts").as_deref(),
            Some("billing/invoice.ts")
        );
        assert_eq!(pattern.label("src/root.ts").as_deref(), Some("root.ts"));

        let nested = SlicePattern::from_glob("src/(**)/*.ts").unwrap();
        assert_eq!(nested.label("src/billing/api/x.ts").as_deref(), Some("billing/api"));
    }

    #[test]
    fn stray_parentheses_are_invalid() {
        assert!(matches!(
            SlicePattern::from_glob("src/(x"),
            Err(PatternError::InvalidGlob { .. })
        ));
        assert!(matches!(
            SlicePattern::from_glob("src/(*)/x)"),
            Err(PatternError::InvalidGlob { .. })
        ));
    }

    #[test]
    fn single_segment_capture() {
        let pattern = SlicePattern::from_glob("packages/(*)/**").unwrap();
        assert_eq!(pattern.label("packages/ui/src/a.ts").as_deref(), Some("ui"));
    }

    #[test]
    fn slice_pattern_needs_exactly_one_capture() {
        assert!(matches!(
            SlicePattern::from_glob("src/**"),
            Err(PatternError::CaptureGroups { found: 0, .. })
        ));
        assert!(matches!(
            SlicePattern::from_glob("(*)/(*)/"),
            Err(PatternError::CaptureGroups { found: 2, .. })
        ));
        assert!(matches!(
            SlicePattern::from_regex("^src/([^/]+)/([^/]+)"),
            Err(PatternError::CaptureGroups { found: 2, .. })
        ));
        assert!(SlicePattern::from_regex("^src/([^/]+)/").is_ok());
    }

    #[test]
    fn slices_drop_edges_with_unmatched_endpoint() {
        let raw = edges(&[
            ("src/a/x.ts", "src/b/y.ts"),
            ("src/a/x.ts", "lodash"),
            ("scripts/run.ts", "src/a/x.ts"),
        ]);
        let pattern = SlicePattern::from_glob("src/(**)/").unwrap();
        let projected = project_edges(&raw, &Projection::Slices(pattern));
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].to_string(), "a -> b");
    }

    #[test]
    fn suffix_table_prefers_longest_suffix() {
        let table = SuffixTable::new([
            (".ts", "code"),
            (".spec.ts", "tests"),
            (".service.ts", "services"),
        ]);
        assert_eq!(table.resolve("src/user.service.ts"), Some("services"));
        assert_eq!(table.resolve("src/user.spec.ts"), Some("tests"));
        assert_eq!(table.resolve("src/user.ts"), Some("code"));
        assert_eq!(table.resolve("src/README.md"), None);
    }

    #[test]
    fn suffix_projection_groups_edges() {
        let table = SuffixTable::new([(".controller.ts", "controllers"), (".service.ts", "services")]);
        let raw = edges(&[
            ("a.controller.ts", "a.service.ts"),
            ("b.controller.ts", "b.service.ts"),
            ("b.controller.ts", "util.ts"),
        ]);
        let projected = project_edges(&raw, &Projection::Suffix(table));
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].to_string(), "controllers -> services");
        assert_eq!(projected[0].cumulated_edges.len(), 2);
    }

    #[test]
    fn aggregation_partitions_the_projected_edges() {
        let raw = edges(&[
            ("src/a/1.ts", "src/b/1.ts"),
            ("src/a/2.ts", "src/b/2.ts"),
            ("src/b/1.ts", "src/a/1.ts"),
            ("src/c/1.ts", "src/c/2.ts"),
            ("other.ts", "src/a/1.ts"),
        ]);
        let projection = Projection::Slices(SlicePattern::from_glob("src/(*)/").unwrap());
        let mapped = raw.iter().filter(|e| projection.project(e).is_some()).count();
        let projected = project_edges(&raw, &projection);
        let total: usize = projected.iter().map(|p| p.cumulated_edges.len()).sum();
        assert_eq!(total, mapped);
        assert_eq!(total, 4);
    }

    #[test]
    fn select_edges_drops_externals_on_request() {
        let raw = vec![Edge::new("a", "b"), Edge::external("a", "react")];
        assert_eq!(select_edges(&raw, true).count(), 1);
        assert_eq!(select_edges(&raw, false).count(), 2);
    }
}
