//! # archgraph-extract
//!
//! Produces raw import [`Edge`](archgraph_core::Edge)s for `archgraph-core`.
//!
//! Two sources are supported, named by an [`EdgeLocator`]:
//!
//! - an edge file: a JSON array of `{source, target, external, importKinds}`
//! - a TS/JS project: files are walked (honoring `.gitignore`), imports are
//!   scanned, and specifiers are resolved against relative paths and
//!   `tsconfig.json` `baseUrl` / `paths`
//!
//! Extraction is the only async boundary. Scans run on a blocking thread;
//! results are cached in the [`EdgeCache`](archgraph_core::EdgeCache) of the
//! caller's [`CheckContext`](archgraph_core::CheckContext) when one is set.
//!
//! ## Example
//!
//! ```ignore
//! use archgraph_core::{declarative, CheckContext};
//! use archgraph_extract::{evaluate_with, EdgeLocator, ScanOptions};
//!
//! let config = declarative::load_config_from_file(Path::new("archgraph.toml"))?;
//! let locator = EdgeLocator::from_settings(&config.extraction, Path::new("."));
//! let options = ScanOptions::from_settings(&config.extraction);
//! let result = evaluate_with(&CheckContext::new("ci"), &locator, &options, &config.checks).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod imports;
mod locator;
mod pipeline;
mod resolve;
mod scan;
mod tsconfig;

pub use error::ExtractError;
pub use imports::{parse_imports, ImportSpec};
pub use locator::{EdgeLocator, ScanOptions, DEFAULT_EXTENSIONS};
pub use pipeline::{evaluate, evaluate_with, extract, extract_with};
pub use resolve::{normalize, Resolution, Resolver};
pub use scan::scan_project;
pub use tsconfig::TsConfig;
