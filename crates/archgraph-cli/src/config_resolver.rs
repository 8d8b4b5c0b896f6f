//! Configuration file resolution with global fallback.
//!
//! Priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/archgraph.toml` or `.archgraph.toml`
//! 3. `$ARCHGRAPH_CONFIG_DIR/config.toml`, else `~/.archgraph/config.toml`
//! 4. Nothing found

use anyhow::{bail, Context, Result};
use archgraph_core::declarative::{self, ArchgraphConfig};
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No config found.
    Missing,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Missing => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }

    /// Loads the configuration.
    ///
    /// Configuration diagnostics are rendered to stderr with their source
    /// context before the error is returned.
    pub fn load(&self) -> Result<ArchgraphConfig> {
        let Some(path) = self.path() else {
            bail!("No archgraph.toml found. Run `archgraph init` to create one.");
        };
        if self.is_global() {
            tracing::info!("Using global config: {}", path.display());
        }

        declarative::load_config_from_file(path)
            .map_err(|e| {
                eprintln!("{:?}", miette::Report::new(e));
                anyhow::anyhow!("invalid configuration")
            })
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["archgraph.toml", ".archgraph.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Missing
}

/// Returns the global config directory: `$ARCHGRAPH_CONFIG_DIR` or `~/.archgraph/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("ARCHGRAPH_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".archgraph"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_without_existence_check() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("archgraph.toml"), "").unwrap();

        let result = resolve_inner(tmp.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn project_config_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".archgraph.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".archgraph.toml"))
        );

        fs::write(tmp.path().join("archgraph.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("archgraph.toml"))
        );
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Missing);

        fs::write(global.path().join("config.toml"), "").unwrap();
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));
        assert!(result.is_global());
    }

    #[test]
    fn missing_config_fails_to_load() {
        let err = ConfigSource::Missing.load().unwrap_err();
        assert!(err.to_string().contains("archgraph init"));
    }

    #[test]
    fn project_config_loads() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("archgraph.toml"),
            "[[cycles]]\nname = \"no-cycles\"\n",
        )
        .unwrap();

        let config = resolve_inner(tmp.path(), None, None).load().unwrap();
        assert_eq!(config.checks.len(), 1);
        assert_eq!(config.checks[0].name, "no-cycles");
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("archgraph.toml"),
            "[[cycles]]\nname = \"bad\"\nseverity = \"fatal\"\n",
        )
        .unwrap();

        assert!(resolve_inner(tmp.path(), None, None).load().is_err());
    }
}
