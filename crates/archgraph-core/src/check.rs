//! Named, configured checks and the runner that evaluates them.

use crate::context::CheckContext;
use crate::cycles::{search_cycles, CycleOptions};
use crate::dependency::DependencyRule;
use crate::diagram::{DiagramCheck, ForbiddenCheck};
use crate::edge::Edge;
use crate::files::FileRule;
use crate::projection::{project_edges, select_edges, Projection};
use crate::types::{CheckResult, Finding, Severity};
use crate::violation::{CycleViolation, Violation};

/// Cycle-freedom over a projection.
#[derive(Debug, Clone)]
pub struct CycleCheck {
    /// How raw units are grouped before searching.
    pub projection: Projection,
    /// Drop external edges before projecting.
    pub ignore_external: bool,
    /// Search limits.
    pub options: CycleOptions,
}

impl CycleCheck {
    /// Creates a check over `projection` that ignores external edges.
    #[must_use]
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            ignore_external: true,
            options: CycleOptions::default(),
        }
    }

    /// Reports one violation per elementary cycle.
    #[must_use]
    pub fn check(&self, edges: &[Edge]) -> Vec<Violation> {
        let projected = project_edges(select_edges(edges, self.ignore_external), &self.projection);
        search_cycles(&projected, self.options)
            .cycles
            .into_iter()
            .map(|cycle| Violation::Cycle(CycleViolation { cycle }))
            .collect()
    }
}

/// A diagram (or forbidden list) applied to projected edges.
#[derive(Debug, Clone)]
pub struct Adherence<C> {
    /// How raw units are grouped into components.
    pub projection: Projection,
    /// The conformance check.
    pub check: C,
    /// Drop external edges before projecting.
    pub ignore_external: bool,
}

impl<C> Adherence<C> {
    /// Creates an adherence check that ignores external edges.
    #[must_use]
    pub fn new(projection: Projection, check: C) -> Self {
        Self {
            projection,
            check,
            ignore_external: true,
        }
    }

    fn project(&self, edges: &[Edge]) -> Vec<crate::edge::ProjectedEdge> {
        project_edges(select_edges(edges, self.ignore_external), &self.projection)
    }
}

/// One configured check.
#[derive(Debug, Clone)]
pub enum Check {
    /// Cycle-freedom.
    Cycles(CycleCheck),
    /// Should / should-not dependency rule.
    Dependency(DependencyRule),
    /// Diagram conformance.
    Diagram(Adherence<DiagramCheck>),
    /// Explicit forbidden relations.
    Forbidden(Adherence<ForbiddenCheck>),
    /// Node-level rule.
    Files(FileRule),
}

impl Check {
    /// Short name of the check kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cycles(_) => "cycles",
            Self::Dependency(_) => "dependency",
            Self::Diagram(_) => "diagram",
            Self::Forbidden(_) => "forbidden",
            Self::Files(_) => "files",
        }
    }

    /// Evaluates the check against raw edges.
    #[must_use]
    pub fn evaluate(&self, edges: &[Edge]) -> Vec<Violation> {
        match self {
            Self::Cycles(check) => check.check(edges),
            Self::Dependency(rule) => rule.check(edges),
            Self::Diagram(adherence) => adherence.check.check(&adherence.project(edges)),
            Self::Forbidden(adherence) => adherence.check.check(&adherence.project(edges)),
            Self::Files(rule) => rule.check(edges),
        }
    }
}

/// A check with its name and severity.
#[derive(Debug, Clone)]
pub struct NamedCheck {
    /// Unique name used in reports and `--only` selection.
    pub name: String,
    /// Severity attached to its findings.
    pub severity: Severity,
    /// The check.
    pub check: Check,
}

impl NamedCheck {
    /// Creates a named check with error severity.
    #[must_use]
    pub fn new(name: impl Into<String>, check: Check) -> Self {
        Self {
            name: name.into(),
            severity: Severity::Error,
            check,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Runs every check against one edge snapshot.
#[must_use]
pub fn run_checks(ctx: &CheckContext, edges: &[Edge], checks: &[NamedCheck]) -> CheckResult {
    ctx.in_scope(|| {
        let mut result = CheckResult::new();
        result.edges_checked = edges.len();

        for named in checks {
            let violations = named.check.evaluate(edges);
            tracing::debug!(
                "{} check '{}': {} violation(s)",
                named.check.kind(),
                named.name,
                violations.len()
            );
            result
                .findings
                .extend(violations.into_iter().map(|violation| Finding {
                    check: named.name.clone(),
                    severity: named.severity,
                    violation,
                }));
            result.checks_run += 1;
        }

        tracing::info!(
            "Ran {} check(s) over {} edge(s): {} finding(s)",
            result.checks_run,
            result.edges_checked,
            result.findings.len()
        );
        result
    })
}
