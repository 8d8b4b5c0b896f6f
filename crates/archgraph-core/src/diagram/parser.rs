//! PlantUML component-diagram parser.
//!
//! Understands the subset of the component syntax that carries architectural
//! meaning:
//!
//! ```text
//! @startuml
//! ' comments start with a quote
//! component [Controllers] as C
//! component Services
//! [Repositories]
//! C --> Services : uses
//! [Services] ..> [Repositories]
//! [Repositories] <-- [Jobs]
//! @enduml
//! ```
//!
//! Bracketed names declare components wherever they appear. Bare names are
//! resolved through `as` aliases first. Lines that declare nothing
//! (`skinparam`, `title`, `package` braces) are skipped.

use miette::{Diagnostic, SourceSpan};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::violation::Rule;

/// Errors raised while parsing diagram text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum DiagramError {
    /// No `@startuml` line.
    #[error("diagram has no @startuml marker")]
    #[diagnostic(
        code(archgraph::diagram::missing_start),
        help("wrap the diagram in @startuml ... @enduml")
    )]
    MissingStart,

    /// `@startuml` without a matching `@enduml`.
    #[error("diagram has no @enduml marker")]
    #[diagnostic(
        code(archgraph::diagram::missing_end),
        help("close the diagram with @enduml")
    )]
    MissingEnd,

    /// A component or relation line that cannot be read.
    #[error("malformed diagram line {line}: `{content}`")]
    #[diagnostic(
        code(archgraph::diagram::malformed_line),
        help("expected `component [Name]`, `[Name]` or `[A] --> [B]`")
    )]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The trimmed line text.
        content: String,
        /// The full diagram text.
        #[source_code]
        src: String,
        /// Location of the line in `src`.
        #[label("cannot parse this line")]
        span: SourceSpan,
    },
}

/// Declared components and directed relations of a diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    components: BTreeSet<String>,
    relations: BTreeSet<Rule>,
}

const NAME: &str = r#"\[[^\]]+\]|"[^"]+"|[A-Za-z_][\w.]*"#;

#[allow(clippy::expect_used)]
fn relation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?P<left>{NAME})\s*(?P<arrow><?[-.]+(?:(?:up|down|left|right|u|d|l|r|\[[^\]]*\])[-.]+)?>?)\s*(?P<right>{NAME})\s*(?::.*)?$"
        ))
        .expect("relation regex")
    })
}

#[allow(clippy::expect_used)]
fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^(?:component\s+)?(?P<name>{NAME})(?:\s+as\s+(?P<alias>[A-Za-z_][\w.]*))?\s*(?:<<[^>]*>>)?\s*(?:#\w+)?\s*$"
        ))
        .expect("declaration regex")
    })
}

impl Diagram {
    /// Parses diagram text.
    ///
    /// # Errors
    ///
    /// Returns error if the start or end marker is missing, or if a
    /// component or relation line is malformed.
    pub fn parse(text: &str) -> Result<Self, DiagramError> {
        let mut diagram = Self::default();
        let mut aliases: HashMap<String, String> = HashMap::new();
        let mut started = false;
        let mut offset = 0;

        for (index, raw_line) in text.split_inclusive('\n').enumerate() {
            let line_start = offset;
            offset += raw_line.len();
            let line = raw_line.trim();

            if !started {
                started = line.starts_with("@startuml");
                continue;
            }
            if line.starts_with("@enduml") {
                tracing::debug!(
                    "Parsed diagram: {} component(s), {} relation(s)",
                    diagram.components.len(),
                    diagram.relations.len()
                );
                return Ok(diagram);
            }
            if line.is_empty() || line.starts_with('\'') {
                continue;
            }

            if let Some(caps) = relation_regex().captures(line) {
                let arrow = &caps["arrow"];
                let left = diagram.resolve(&caps["left"], &aliases);
                let right = diagram.resolve(&caps["right"], &aliases);
                let rule = match (arrow.starts_with('<'), arrow.ends_with('>')) {
                    (false, true) => Rule::new(left, right),
                    (true, false) => Rule::new(right, left),
                    _ => return Err(malformed(text, index, line_start, raw_line)),
                };
                diagram.relations.insert(rule);
            } else if let Some(caps) = declaration_regex()
                .captures(line)
                .filter(|_| line.starts_with("component") || line.starts_with('['))
            {
                let name = unquote(&caps["name"]).to_string();
                if let Some(alias) = caps.name("alias") {
                    aliases.insert(alias.as_str().to_string(), name.clone());
                }
                diagram.components.insert(name);
            } else if looks_structural(line) {
                return Err(malformed(text, index, line_start, raw_line));
            } else {
                tracing::debug!("Skipping diagram line {}: {line}", index + 1);
            }
        }

        Err(if started {
            DiagramError::MissingEnd
        } else {
            DiagramError::MissingStart
        })
    }

    /// Builds a diagram from an explicit rule list. Every endpoint becomes a component.
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut diagram = Self::default();
        for rule in rules {
            diagram.components.insert(rule.source.clone());
            diagram.components.insert(rule.target.clone());
            diagram.relations.insert(rule);
        }
        diagram
    }

    /// Declared component names.
    #[must_use]
    pub fn components(&self) -> &BTreeSet<String> {
        &self.components
    }

    /// Declared relations.
    #[must_use]
    pub fn relations(&self) -> &BTreeSet<Rule> {
        &self.relations
    }

    /// Returns true if `label` is a declared component.
    #[must_use]
    pub fn declares(&self, label: &str) -> bool {
        self.components.contains(label)
    }

    /// Returns true if `source -> target` is a declared relation.
    #[must_use]
    pub fn allows(&self, source: &str, target: &str) -> bool {
        self.relations.contains(&Rule::new(source, target))
    }

    fn resolve(&mut self, token: &str, aliases: &HashMap<String, String>) -> String {
        let name = if token.starts_with('[') || token.starts_with('"') {
            unquote(token).to_string()
        } else {
            aliases.get(token).cloned().unwrap_or_else(|| token.to_string())
        };
        self.components.insert(name.clone());
        name
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .or_else(|| token.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
        .map_or(token, str::trim)
}

fn looks_structural(line: &str) -> bool {
    line.starts_with('[')
        || line.starts_with("component")
        || line.contains("->")
        || line.contains("<-")
        || line.contains(".>")
        || line.contains("<.")
}

fn malformed(text: &str, index: usize, start: usize, raw_line: &str) -> DiagramError {
    let content = raw_line.trim_end_matches(['\r', '\n']);
    DiagramError::MalformedLine {
        line: index + 1,
        content: content.trim().to_string(),
        src: text.to_string(),
        span: SourceSpan::from((start, content.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_components_and_relations() {
        let diagram = Diagram::parse(
            "@startuml\n\
             ' layers\n\
             component [Controllers] as C\n\
             component Services\n\
             [Repositories]\n\
             skinparam monochrome true\n\
             C --> Services : uses\n\
             [Services] ..> [Repositories]\n\
             [Repositories] <-- [Jobs]\n\
             @enduml\n",
        )
        .unwrap();

        let components: Vec<&str> = diagram.components().iter().map(String::as_str).collect();
        assert_eq!(
            components,
            vec!["Controllers", "Jobs", "Repositories", "Services"]
        );
        assert!(diagram.allows("Controllers", "Services"));
        assert!(diagram.allows("Services", "Repositories"));
        assert!(diagram.allows("Jobs", "Repositories"));
        assert!(!diagram.allows("Repositories", "Jobs"));
        assert_eq!(diagram.relations().len(), 3);
    }

    #[test]
    fn directional_arrows_are_accepted() {
        let diagram = Diagram::parse("@startuml\n[a] -down-> [b]\n[b] -[#red]-> [c]\n@enduml").unwrap();
        assert!(diagram.allows("a", "b"));
        assert!(diagram.allows("b", "c"));
    }

    #[test]
    fn missing_markers_are_errors() {
        assert_eq!(Diagram::parse("[A] --> [B]"), Err(DiagramError::MissingStart));
        assert_eq!(
            Diagram::parse("@startuml\n[A] --> [B]\n"),
            Err(DiagramError::MissingEnd)
        );
    }

    #[test]
    fn malformed_line_points_at_source() {
        let text = "@startuml\n[A] --> [B\n@enduml\n";
        let Err(DiagramError::MalformedLine { line, content, span, .. }) = Diagram::parse(text)
        else {
            panic!("expected malformed line error");
        };
        assert_eq!(line, 2);
        assert_eq!(content, "[A] --> [B");
        assert_eq!(span.offset(), 10);
        assert_eq!(span.len(), 10);
    }

    #[test]
    fn undirected_link_is_malformed() {
        let err = Diagram::parse("@startuml\n[A] <--> [B]\n@enduml").unwrap_err();
        assert!(matches!(err, DiagramError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn from_rules_declares_endpoints() {
        let diagram = Diagram::from_rules([Rule::new("ui", "api")]);
        assert!(diagram.declares("ui"));
        assert!(diagram.declares("api"));
        assert!(diagram.allows("ui", "api"));
    }
}
