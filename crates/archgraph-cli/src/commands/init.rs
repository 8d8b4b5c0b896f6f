//! Init command implementation.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# archgraph configuration

[extraction]
# Scan a TS/JS project (tsconfig.json or directory) ...
project = "."
# ... or load pre-extracted edges instead:
# edges = "build/edges.json"

exclude = [
    "**/*.test.ts",
    "**/*.spec.ts",
]

# No cycles between top-level folders under src/
[[cycles]]
name = "no-module-cycles"
projection = { kind = "slices", pattern = "src/(*)/**" }

# [[dependency]]
# name = "domain-is-independent"
# mode = "should-not"
# objects = [{ glob = "src/domain/**" }]
# subjects = [{ glob = "src/infrastructure/**" }]

# [[diagram]]
# name = "layers"
# projection = { kind = "slices", pattern = "src/(*)/**" }
# file = "docs/architecture.puml"
# ignore_unknown_nodes = true

# [[files]]
# name = "service-naming"
# objects = [{ glob = "src/services", target = "directory" }]
# pattern = { glob = "*.service.ts", target = "filename" }
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = write_config(Path::new("."), force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit archgraph.toml to configure checks");
    println!("  2. Run: archgraph check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join("archgraph.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
