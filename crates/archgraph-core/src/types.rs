//! Severity levels and aggregated check results.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::violation::Violation;

/// Severity level attached to a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Error
    }
}

impl Severity {
    /// Parses a severity from its configuration name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A violation attributed to the check that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Name of the check.
    pub check: String,
    /// Severity configured for the check.
    pub severity: Severity,
    /// The violation itself.
    pub violation: Violation,
}

impl Finding {
    /// Formats the finding for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = format!("{} {}\n", self.violation.code(), self.check);
        let _ = writeln!(output, "  {}: {}", self.severity, self.violation.describe());
        output
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {}", self.check, self.severity, self.violation)
    }
}

/// Result of running a set of checks against one edge snapshot.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CheckResult {
    /// All findings, grouped by check in run order.
    pub findings: Vec<Finding>,
    /// Number of raw edges evaluated.
    pub edges_checked: usize,
    /// Number of checks run.
    pub checks_run: usize,
}

impl CheckResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any findings meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// Returns findings of one check.
    #[must_use]
    pub fn for_check(&self, check: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.check == check).collect()
    }

    /// Counts findings by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.findings.iter().filter(|f| f.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats findings at or above `fail_on` as a multi-line report.
    #[must_use]
    pub fn format_report(&self, fail_on: Severity) -> String {
        let failing: Vec<&Finding> = self
            .findings
            .iter()
            .filter(|f| f.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(report, "\n=== archgraph: {} violation(s) ===\n", failing.len());
        for finding in &failing {
            let _ = writeln!(report, "{}", finding.format());
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) from {} check(s) over {} edge(s)",
            errors, warnings, infos, self.checks_run, self.edges_checked
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::FileViolation;

    fn finding(severity: Severity) -> Finding {
        Finding {
            check: "services-naming".to_string(),
            severity,
            violation: Violation::File(FileViolation {
                unit: "src/services/user.ts".to_string(),
                expectation: "filename matching glob \"*.service.ts\"".to_string(),
                negated: false,
            }),
        }
    }

    #[test]
    fn severity_threshold() {
        let mut result = CheckResult::new();
        result.findings.push(finding(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_violations_at(Severity::Warning));
        assert!(result.has_violations_at(Severity::Info));
    }

    #[test]
    fn report_filters_by_severity() {
        let mut result = CheckResult::new();
        result.checks_run = 2;
        result.edges_checked = 10;
        result.findings.push(finding(Severity::Warning));
        result.findings.push(finding(Severity::Error));

        let report = result.format_report(Severity::Error);
        assert!(report.contains("1 violation(s)"));
        assert!(report.contains("1 error(s), 1 warning(s), 0 info(s)"));
        assert!(report.contains("FILE001 services-naming"));
    }

    #[test]
    fn severity_parse() {
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::default(), Severity::Error);
    }
}
