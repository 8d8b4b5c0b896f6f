//! # archgraph-core
//!
//! Architecture rule checks over import graphs.
//!
//! Raw [`Edge`]s come from an extractor. Everything in this crate is a pure,
//! synchronous transformation over them:
//!
//! - [`project_edges`] relabels edges through a [`Projection`] (identity,
//!   slices, suffix groups) and merges parallel edges
//! - [`project_to_nodes`] derives a vertex view for per-unit checks
//! - [`find_cycles`] enumerates elementary cycles
//! - [`DependencyRule`] evaluates should / should-not assertions
//! - [`DiagramCheck`] and [`ForbiddenCheck`] compare edges with a diagram
//! - [`FileRule`] asserts naming and placement conventions
//!
//! Every checker reports [`Violation`] values. [`run_checks`] evaluates a
//! list of [`NamedCheck`]s, usually loaded from `archgraph.toml` via
//! [`declarative::load_config_from_file`].
//!
//! ## Example
//!
//! ```ignore
//! use archgraph_core::{find_cycles, project_edges, Edge, Projection, SlicePattern};
//!
//! let edges = vec![Edge::new("src/a/x.ts", "src/b/y.ts"), Edge::new("src/b/y.ts", "src/a/z.ts")];
//! let slices = Projection::Slices(SlicePattern::from_glob("src/(*)/**")?);
//! let cycles = find_cycles(&project_edges(&edges, &slices));
//! assert_eq!(cycles[0].to_string(), "a -> b -> a");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check;
mod context;
mod cycles;
mod dependency;
mod diagram;
mod edge;
mod files;
mod nodes;
mod pattern;
mod projection;
mod types;
mod violation;

pub mod declarative;

pub use check::{run_checks, Adherence, Check, CycleCheck, NamedCheck};
pub use context::{CheckContext, EdgeCache};
pub use cycles::{find_cycles, search_cycles, Cycle, CycleOptions, CycleSearch};
pub use dependency::{DependencyRule, RuleError, RuleMode};
pub use diagram::{Diagram, DiagramCheck, DiagramError, ForbiddenCheck};
pub use edge::{Edge, ImportKind, ProjectedEdge};
pub use files::{FileAssertion, FileRule};
pub use nodes::{project_to_nodes, Node};
pub use pattern::{
    describe, file_name, matches_all, Filter, GlobPattern, MatchTarget, Pattern, PatternError,
};
pub use projection::{project_edges, select_edges, Projection, SlicePattern, SuffixTable};
pub use types::{CheckResult, Finding, Severity};
pub use violation::{
    CycleViolation, DependencyViolation, DiagramReason, DiagramViolation, EmptyPartition,
    EmptyResultViolation, FileViolation, Partition, Rule, Violation,
};
