//! DTO → Domain model conversion with validation.

use miette::Diagnostic;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::check::{Adherence, Check, CycleCheck, NamedCheck};
use crate::cycles::CycleOptions;
use crate::dependency::{DependencyRule, RuleError, RuleMode};
use crate::diagram::{Diagram, DiagramCheck, DiagramError, ForbiddenCheck};
use crate::files::{FileAssertion, FileRule};
use crate::pattern::{Filter, GlobPattern, MatchTarget, Pattern, PatternError};
use crate::projection::{Projection, SlicePattern, SuffixTable};
use crate::types::Severity;
use crate::violation::Rule;

use super::config_dto::{
    ArchgraphConfigDto, CyclesDto, DependencyDto, DiagramDto, ExtractionDto, FilesDto,
    FilterDto, ForbiddenDto, ProjectionDto,
};
use super::model::{ArchgraphConfig, ExtractionSettings, ExtractionSource};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadError {
    /// A pattern failed to compile.
    #[error("{context}: {source}")]
    Pattern {
        /// Where the error occurred (e.g., "dependency[0].objects[1]").
        context: String,
        /// The underlying pattern error.
        source: PatternError,
    },

    /// A rule could not be built.
    #[error("{context}: {source}")]
    Rule {
        /// Where the error occurred.
        context: String,
        /// The underlying rule error.
        source: RuleError,
    },

    /// Diagram text is invalid.
    #[error("{context}: invalid diagram")]
    Diagram {
        /// Where the error occurred.
        context: String,
        /// The parse error, with source and span.
        #[source]
        #[diagnostic_source]
        source: DiagramError,
    },

    /// A diagram file could not be read.
    #[error("{context}: cannot read diagram file {}", path.display())]
    DiagramIo {
        /// Where the error occurred.
        context: String,
        /// The resolved file path.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// Exactly one of two fields must be set.
    #[error("{context}: exactly one of `{first}` or `{second}` must be set")]
    Ambiguous {
        /// Where the conflict is.
        context: String,
        /// First field name.
        first: &'static str,
        /// Second field name.
        second: &'static str,
    },

    /// A suffix projection without groups.
    #[error("{context}: suffix projection needs at least one group")]
    EmptySuffixTable {
        /// Where the error occurred.
        context: String,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown rule mode string.
    #[error("{context}: unknown mode `{value}`, expected: should, should-not")]
    UnknownMode {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Two checks share a name.
    #[error("duplicate check name `{0}`")]
    DuplicateName(String),
}

/// Converts an `ArchgraphConfigDto` to a validated `ArchgraphConfig`.
///
/// Relative paths (diagram files, edge files, projects) resolve against
/// `base_dir`, normally the directory holding the config file.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: ArchgraphConfigDto, base_dir: &Path) -> Result<ArchgraphConfig, LoadError> {
    let extraction = convert_extraction(&dto.extraction, base_dir)?;

    let mut checks = Vec::new();
    for (i, c) in dto.cycles.into_iter().enumerate() {
        checks.push(convert_cycles(c, i)?);
    }
    for (i, d) in dto.dependency.into_iter().enumerate() {
        checks.push(convert_dependency(d, i)?);
    }
    for (i, d) in dto.diagram.into_iter().enumerate() {
        checks.push(convert_diagram(d, i, base_dir)?);
    }
    for (i, f) in dto.forbidden.into_iter().enumerate() {
        checks.push(convert_forbidden(f, i)?);
    }
    for (i, f) in dto.files.into_iter().enumerate() {
        checks.push(convert_files(f, i)?);
    }

    let mut seen = HashSet::new();
    if let Some(dup) = checks.iter().find(|c| !seen.insert(c.name.as_str())) {
        return Err(LoadError::DuplicateName(dup.name.clone()));
    }

    tracing::debug!("Loaded {} check(s)", checks.len());
    Ok(ArchgraphConfig { extraction, checks })
}

fn convert_extraction(
    dto: &ExtractionDto,
    base_dir: &Path,
) -> Result<ExtractionSettings, LoadError> {
    let source = match (&dto.edges, &dto.project) {
        (Some(_), Some(_)) => {
            return Err(LoadError::Ambiguous {
                context: "extraction".to_string(),
                first: "edges",
                second: "project",
            })
        }
        (Some(edges), None) => Some(ExtractionSource::EdgeFile(base_dir.join(edges))),
        (None, Some(project)) => Some(ExtractionSource::Project(base_dir.join(project))),
        (None, None) => None,
    };

    let exclude = dto
        .exclude
        .iter()
        .enumerate()
        .map(|(i, p)| {
            GlobPattern::new(p).map_err(|e| LoadError::Pattern {
                context: format!("extraction.exclude[{i}]"),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let extensions = dto
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_string())
        .collect();

    Ok(ExtractionSettings {
        source,
        exclude,
        extensions,
    })
}

fn convert_cycles(dto: CyclesDto, index: usize) -> Result<NamedCheck, LoadError> {
    let context = format!("cycles[{index}]");
    let check = CycleCheck {
        projection: convert_projection(&dto.projection, &context)?,
        ignore_external: dto.ignore_external,
        options: CycleOptions {
            max_cycles: dto.max_cycles,
        },
    };
    Ok(NamedCheck::new(dto.name, Check::Cycles(check))
        .with_severity(parse_severity(&dto.severity, &context)?))
}

fn convert_dependency(dto: DependencyDto, index: usize) -> Result<NamedCheck, LoadError> {
    let context = format!("dependency[{index}]");
    let mode = parse_mode(&dto.mode, &context)?;
    let objects = convert_filters(&dto.objects, &format!("{context}.objects"))?;
    let subjects = convert_filters(&dto.subjects, &format!("{context}.subjects"))?;

    let rule = DependencyRule::new(mode, objects, subjects)
        .map_err(|e| LoadError::Rule {
            context: context.clone(),
            source: e,
        })?
        .allow_empty(dto.allow_empty)
        .include_external(dto.include_external);

    Ok(NamedCheck::new(dto.name, Check::Dependency(rule))
        .with_severity(parse_severity(&dto.severity, &context)?))
}

fn convert_diagram(
    dto: DiagramDto,
    index: usize,
    base_dir: &Path,
) -> Result<NamedCheck, LoadError> {
    let context = format!("diagram[{index}]");
    let text = match (dto.file, dto.text) {
        (Some(file), None) => {
            let path = base_dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| LoadError::DiagramIo {
                context: context.clone(),
                path,
                source: e,
            })?
        }
        (None, Some(text)) => text,
        _ => {
            return Err(LoadError::Ambiguous {
                context,
                first: "file",
                second: "text",
            })
        }
    };
    let diagram = Diagram::parse(&text).map_err(|e| LoadError::Diagram {
        context: context.clone(),
        source: e,
    })?;

    let mut adherence = Adherence::new(
        convert_projection(&dto.projection, &context)?,
        DiagramCheck::new(diagram).ignore_unknown_nodes(dto.ignore_unknown_nodes),
    );
    adherence.ignore_external = dto.ignore_external;

    Ok(NamedCheck::new(dto.name, Check::Diagram(adherence))
        .with_severity(parse_severity(&dto.severity, &context)?))
}

fn convert_forbidden(dto: ForbiddenDto, index: usize) -> Result<NamedCheck, LoadError> {
    let context = format!("forbidden[{index}]");
    let rules = dto
        .rules
        .into_iter()
        .map(|r| Rule::new(r.from, r.to))
        .collect();

    let mut adherence = Adherence::new(
        convert_projection(&dto.projection, &context)?,
        ForbiddenCheck::new(rules),
    );
    adherence.ignore_external = dto.ignore_external;

    Ok(NamedCheck::new(dto.name, Check::Forbidden(adherence))
        .with_severity(parse_severity(&dto.severity, &context)?))
}

fn convert_files(dto: FilesDto, index: usize) -> Result<NamedCheck, LoadError> {
    let context = format!("files[{index}]");
    let objects = convert_filters(&dto.objects, &format!("{context}.objects"))?;
    let pattern = convert_filter(&dto.pattern, &format!("{context}.pattern"))?;
    let mode = parse_mode(&dto.mode, &context)?;

    let rule = FileRule::new(objects, mode, FileAssertion::Matches(pattern))
        .map_err(|e| LoadError::Rule {
            context: context.clone(),
            source: e,
        })?
        .allow_empty(dto.allow_empty);

    Ok(NamedCheck::new(dto.name, Check::Files(rule))
        .with_severity(parse_severity(&dto.severity, &context)?))
}

fn convert_projection(dto: &ProjectionDto, context: &str) -> Result<Projection, LoadError> {
    let context = format!("{context}.projection");
    match dto {
        ProjectionDto::Identity => Ok(Projection::Identity),
        ProjectionDto::Slices { pattern, regex } => {
            let slices = match (pattern, regex) {
                (Some(p), None) => SlicePattern::from_glob(p),
                (None, Some(r)) => SlicePattern::from_regex(r),
                _ => {
                    return Err(LoadError::Ambiguous {
                        context,
                        first: "pattern",
                        second: "regex",
                    })
                }
            }
            .map_err(|e| LoadError::Pattern {
                context: context.clone(),
                source: e,
            })?;
            Ok(Projection::Slices(slices))
        }
        ProjectionDto::Suffix { groups } => {
            if groups.is_empty() {
                return Err(LoadError::EmptySuffixTable { context });
            }
            Ok(Projection::Suffix(SuffixTable::new(
                groups.iter().map(|(s, g)| (s.as_str(), g.as_str())),
            )))
        }
    }
}

fn convert_filters(dtos: &[FilterDto], context: &str) -> Result<Vec<Filter>, LoadError> {
    dtos.iter()
        .enumerate()
        .map(|(i, f)| convert_filter(f, &format!("{context}[{i}]")))
        .collect()
}

fn convert_filter(dto: &FilterDto, context: &str) -> Result<Filter, LoadError> {
    let wrap = |e: PatternError| LoadError::Pattern {
        context: context.to_string(),
        source: e,
    };
    let pattern = match (&dto.glob, &dto.regex) {
        (Some(g), None) => Pattern::glob(g).map_err(wrap)?,
        (None, Some(r)) => Pattern::regex(r).map_err(wrap)?,
        _ => {
            return Err(LoadError::Ambiguous {
                context: context.to_string(),
                first: "glob",
                second: "regex",
            })
        }
    };
    let target = dto
        .target
        .as_deref()
        .map_or(Ok(MatchTarget::Path), MatchTarget::parse)
        .map_err(wrap)?;
    Ok(Filter::new(pattern, target))
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::parse(value).ok_or_else(|| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}

fn parse_mode(value: &str, context: &str) -> Result<RuleMode, LoadError> {
    RuleMode::parse(value).ok_or_else(|| LoadError::UnknownMode {
        context: context.to_string(),
        value: value.to_string(),
    })
}
