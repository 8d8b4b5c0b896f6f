//! Architecture checks driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert (loader)
//! ArchgraphConfig (extraction settings + Vec<NamedCheck>)
//!   ↓ run_checks()
//! CheckResult
//! ```

use miette::Diagnostic;
use std::path::{Path, PathBuf};

pub mod config_dto;
pub mod loader;
pub mod model;

pub use loader::LoadError;
pub use model::{ArchgraphConfig, ExtractionSettings, ExtractionSource};

/// Errors from reading, parsing and validating a configuration.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// The config path.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

/// Parses TOML content into a validated configuration.
///
/// Relative paths resolve against `base_dir`.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_config_from_toml(content: &str, base_dir: &Path) -> Result<ArchgraphConfig, ConfigError> {
    let dto: config_dto::ArchgraphConfigDto = toml::from_str(content)?;
    Ok(loader::load(dto, base_dir)?)
}

/// Reads and loads a configuration file. Relative paths resolve against its directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is invalid.
pub fn load_config_from_file(path: &Path) -> Result<ArchgraphConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    tracing::debug!("Loading config from {}", path.display());
    load_config_from_toml(&content, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn diagram_file_resolves_against_config_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        fs::write(
            tmp.path().join("docs/arch.puml"),
            "@startuml\n[ui] --> [core]\n@enduml\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("archgraph.toml"),
            "[[diagram]]\nname = \"layers\"\nfile = \"docs/arch.puml\"\n",
        )
        .unwrap();

        let config = load_config_from_file(&tmp.path().join("archgraph.toml")).unwrap();
        assert_eq!(config.checks.len(), 1);
        assert_eq!(config.checks[0].check.kind(), "diagram");
    }

    #[test]
    fn unreadable_config_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_from_file(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let result = load_config_from_toml("[[cycles]\nname = 1", Path::new("."));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
