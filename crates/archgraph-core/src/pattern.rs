//! Unit filters: glob or regex patterns applied to one part of a unit identifier.

use regex::Regex;
use std::fmt;

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Pattern text is empty.
    #[error("pattern must not be empty")]
    Empty,

    /// Glob pattern has invalid syntax.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    InvalidGlob {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// Regular expression has invalid syntax.
    #[error("invalid regex `{pattern}`: {reason}")]
    InvalidRegex {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// A slicing pattern must capture exactly one group.
    #[error("slice pattern `{pattern}` must have exactly one capture group, found {found}")]
    CaptureGroups {
        /// The offending pattern.
        pattern: String,
        /// Number of capture groups found.
        found: usize,
    },

    /// Unknown match target name.
    #[error("unknown match target `{0}`, expected: filename, path, directory, unit")]
    UnknownTarget(String),
}

/// Which part of a unit identifier a pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchTarget {
    /// Base name only (`user.service.ts`).
    Filename,
    /// Full identifier (`src/services/user.service.ts`).
    #[default]
    Path,
    /// Identifier without the filename (`src/services`).
    Directory,
    /// Base name without its final extension (`user.service`).
    Unit,
}

impl MatchTarget {
    /// Parses a target from its configuration name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is not a known target.
    pub fn parse(name: &str) -> Result<Self, PatternError> {
        match name {
            "filename" => Ok(Self::Filename),
            "path" => Ok(Self::Path),
            "directory" => Ok(Self::Directory),
            "unit" => Ok(Self::Unit),
            other => Err(PatternError::UnknownTarget(other.to_string())),
        }
    }

    /// Selects the matched part of `unit`.
    #[must_use]
    pub fn select(self, unit: &str) -> &str {
        match self {
            Self::Path => unit,
            Self::Filename => file_name(unit),
            Self::Directory => unit.rsplit_once('/').map_or("", |(dir, _)| dir),
            Self::Unit => {
                let name = file_name(unit);
                match name.rsplit_once('.') {
                    Some((stem, _)) if !stem.is_empty() => stem,
                    _ => name,
                }
            }
        }
    }
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filename => write!(f, "filename"),
            Self::Path => write!(f, "path"),
            Self::Directory => write!(f, "directory"),
            Self::Unit => write!(f, "unit"),
        }
    }
}

/// Returns the last `/`-separated segment of an identifier.
#[must_use]
pub fn file_name(unit: &str) -> &str {
    unit.rsplit('/').next().unwrap_or(unit)
}

/// A compiled glob pattern.
///
/// `*` and `?` never cross a `/`; `**` spans any number of segments.
/// The whole selected string must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    raw: String,
    compiled: glob::Pattern,
}

const GLOB_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl GlobPattern {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let compiled = glob::Pattern::new(pattern).map_err(|e| PatternError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether `text` matches this pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        if self.compiled.matches_with(text, GLOB_OPTIONS) {
            return true;
        }
        // `dir/**` accepts anything below `dir/`
        if let Some(prefix) = self.raw.strip_suffix("/**") {
            let normalized = prefix.trim_end_matches('/');
            if !normalized.contains(['*', '?', '[']) {
                return text.starts_with(normalized)
                    && text.as_bytes().get(normalized.len()) == Some(&b'/');
            }
        }
        false
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// A glob or a regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Whole-string glob match.
    Glob(GlobPattern),
    /// Unanchored regex search.
    Regex(Regex),
}

impl Pattern {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error on empty or invalid glob text.
    pub fn glob(pattern: &str) -> Result<Self, PatternError> {
        GlobPattern::new(pattern).map(Self::Glob)
    }

    /// Compiles a regular expression.
    ///
    /// # Errors
    ///
    /// Returns error on empty or invalid regex text.
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Tests whether `text` matches.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Glob(glob) => glob.matches(text),
            Self::Regex(regex) => regex.is_match(text),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glob(glob) => write!(f, "glob \"{}\"", glob.as_str()),
            Self::Regex(regex) => write!(f, "regex /{}/", regex.as_str()),
        }
    }
}

/// A pattern paired with the part of the identifier it inspects.
#[derive(Debug, Clone)]
pub struct Filter {
    pattern: Pattern,
    target: MatchTarget,
}

impl Filter {
    /// Creates a filter.
    #[must_use]
    pub fn new(pattern: Pattern, target: MatchTarget) -> Self {
        Self { pattern, target }
    }

    /// Glob over the full path.
    ///
    /// # Errors
    ///
    /// Returns error on invalid glob text.
    pub fn path_glob(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self::new(Pattern::glob(pattern)?, MatchTarget::Path))
    }

    /// Glob over the filename.
    ///
    /// # Errors
    ///
    /// Returns error on invalid glob text.
    pub fn filename_glob(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self::new(Pattern::glob(pattern)?, MatchTarget::Filename))
    }

    /// Returns the pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the match target.
    #[must_use]
    pub fn target(&self) -> MatchTarget {
        self.target
    }

    /// Tests a unit identifier against this filter.
    #[must_use]
    pub fn matches(&self, unit: &str) -> bool {
        self.pattern.matches(self.target.select(unit))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} matching {}", self.target, self.pattern)
    }
}

/// Tests a unit against an AND-combined filter set. An empty set matches everything.
#[must_use]
pub fn matches_all(filters: &[Filter], unit: &str) -> bool {
    filters.iter().all(|f| f.matches(unit))
}

/// Human-readable descriptions of a filter set.
#[must_use]
pub fn describe(filters: &[Filter]) -> Vec<String> {
    filters.iter().map(ToString::to_string).collect()
}
