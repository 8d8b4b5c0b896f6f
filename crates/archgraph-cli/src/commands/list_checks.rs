//! List checks command implementation.

use anyhow::Result;

use crate::config_resolver::ConfigSource;

const CHECK_KINDS: &[(&str, &str, &str)] = &[
    ("CYCLE001", "cycles", "No dependency cycles between projected labels"),
    ("DEP001", "dependency", "Objects should / should not depend on subjects"),
    ("DIAGRAM001", "diagram", "Edges must be relations of a PlantUML component diagram"),
    ("DIAGRAM001", "forbidden", "Edges must not match listed relations"),
    ("FILE001", "files", "Matching units should / should not match a pattern"),
    ("EMPTY001", "-", "A dependency or file rule matched no units"),
];

/// Runs the list-checks command.
pub fn run(source: &ConfigSource) -> Result<()> {
    println!("Check kinds:\n");
    println!("{:<12} {:<12} Description", "Code", "Kind");
    println!("{}", "-".repeat(80));
    for (code, kind, description) in CHECK_KINDS {
        println!("{code:<12} {kind:<12} {description}");
    }

    let Some(path) = source.path() else {
        println!("\nNo archgraph.toml found. Run `archgraph init` to create one.");
        return Ok(());
    };
    let config = source.load()?;

    println!("\nConfigured in {}:\n", path.display());
    println!("{:<30} {:<12} Severity", "Name", "Kind");
    println!("{}", "-".repeat(80));
    for named in &config.checks {
        println!(
            "{:<30} {:<12} {}",
            named.name,
            named.check.kind(),
            named.severity
        );
    }

    println!("\nUse --only to run specific checks, e.g.:");
    println!("  archgraph check --only no-layer-cycles,layers");

    Ok(())
}
