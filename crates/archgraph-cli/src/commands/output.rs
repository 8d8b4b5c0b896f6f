//! Shared output formatting for check results.

use anyhow::Result;
use archgraph_core::{CheckResult, Severity};

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(result: &CheckResult, format: OutputFormat, fail_on: Severity) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, fail_on),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &CheckResult, fail_on: Severity) {
    let (errors, warnings, infos) = result.count_by_severity();

    for finding in &result.findings {
        let severity_indicator = match finding.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!("{} {}", finding.violation.code(), finding.check);
        println!("  {}: {}", severity_indicator, finding.violation.describe());
        println!();
    }

    let summary_color = if result.has_violations_at(fail_on) {
        "\x1b[31m"
    } else if errors + warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) from {} check(s) over {} edge(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.checks_run, result.edges_checked
    );
}

fn print_json(result: &CheckResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &CheckResult) {
    for finding in &result.findings {
        println!("{}: {} {}", finding.check, finding.severity, finding.violation);
    }
}
