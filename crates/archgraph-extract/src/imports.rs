//! Import statement scanning for TS/JS sources.
//!
//! Recognized forms:
//!
//! | Statement                          | Kinds                 |
//! |------------------------------------|-----------------------|
//! | `import './polyfill'`              | (none)                |
//! | `import Foo from 'x'`              | value, default        |
//! | `import { a, b } from 'x'`         | value, named          |
//! | `import * as ns from 'x'`          | value, namespace      |
//! | `import type { T } from 'x'`       | type, named           |
//! | `export { a } from 'x'`            | value, named          |
//! | `export * from 'x'`                | value, namespace      |
//! | `require('x')`, `import('x')`      | value                 |

use archgraph_core::ImportKind;
use regex::Regex;
use std::sync::OnceLock;

/// One import statement: what it names and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// The module specifier as written.
    pub specifier: String,
    /// Import kinds; empty for side-effect imports.
    pub kinds: Vec<ImportKind>,
    /// Byte offset of the statement, for ordering.
    offset: usize,
}

#[allow(clippy::expect_used)]
fn static_import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[ \t]*import\s+(?P<type>type\s+)?(?P<clause>[\w$*{][^'"]*?)\s*from\s*['"](?P<spec>[^'"]+)['"]"#,
        )
        .expect("static import regex")
    })
}

#[allow(clippy::expect_used)]
fn side_effect_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*import\s*['"](?P<spec>[^'"]+)['"]"#).expect("side effect regex")
    })
}

#[allow(clippy::expect_used)]
fn reexport_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^[ \t]*export\s+(?P<type>type\s+)?(?P<clause>\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"](?P<spec>[^'"]+)['"]"#,
        )
        .expect("re-export regex")
    })
}

#[allow(clippy::expect_used)]
fn call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\b(?:require|import)\s*\(\s*['"](?P<spec>[^'"]+)['"]\s*\)"#)
            .expect("call regex")
    })
}

/// Extracts every import from `source`, in source order.
#[must_use]
pub fn parse_imports(source: &str) -> Vec<ImportSpec> {
    let code = strip_comments(source);
    let mut imports = Vec::new();

    for caps in static_import_regex().captures_iter(&code) {
        let type_only = caps.name("type").is_some();
        imports.push(spec(&caps, clause_kinds(&caps["clause"], type_only)));
    }
    for caps in side_effect_regex().captures_iter(&code) {
        imports.push(spec(&caps, Vec::new()));
    }
    for caps in reexport_regex().captures_iter(&code) {
        let type_only = caps.name("type").is_some();
        imports.push(spec(&caps, clause_kinds(&caps["clause"], type_only)));
    }
    for caps in call_regex().captures_iter(&code) {
        imports.push(spec(&caps, vec![ImportKind::Value]));
    }

    imports.sort_by_key(|i| i.offset);
    imports
}

fn spec(caps: &regex::Captures<'_>, kinds: Vec<ImportKind>) -> ImportSpec {
    ImportSpec {
        specifier: caps["spec"].to_string(),
        kinds,
        offset: caps.get(0).map_or(0, |m| m.start()),
    }
}

/// Kinds for an import or export clause such as `Foo, { a, type B }`.
fn clause_kinds(clause: &str, type_only: bool) -> Vec<ImportKind> {
    let clause = clause.trim();
    let (head, braces) = match clause.find('{') {
        Some(open) => {
            let close = clause.rfind('}').unwrap_or(clause.len());
            (&clause[..open], Some(&clause[open + 1..close.max(open + 1)]))
        }
        None => (clause, None),
    };
    let head = head.trim().trim_end_matches(',').trim();

    let namespace = head.starts_with('*');
    let default = !head.is_empty() && !namespace;
    let named: Vec<&str> = braces
        .map(|b| {
            b.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let inline_types_only =
        !named.is_empty() && !default && !namespace && named.iter().all(|n| n.starts_with("type "));

    let mut kinds = vec![if type_only || inline_types_only {
        ImportKind::Type
    } else {
        ImportKind::Value
    }];
    if default {
        kinds.push(ImportKind::Default);
    }
    if braces.is_some() {
        kinds.push(ImportKind::Named);
    }
    if namespace {
        kinds.push(ImportKind::Namespace);
    }
    kinds
}

/// Blanks out `//` and `/* */` comments, leaving string literals intact.
///
/// Byte offsets and line structure are preserved.
#[must_use]
pub fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Line,
        Block,
        Str(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                '"' | '\'' | '`' => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    push_blank(&mut out, c);
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    push_blank(&mut out, c);
                }
            }
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
        }
    }
    out
}

fn push_blank(out: &mut String, c: char) {
    for _ in 0..c.len_utf8() {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ImportKind::{Default, Named, Namespace, Type, Value};

    fn parsed(source: &str) -> Vec<(String, Vec<ImportKind>)> {
        parse_imports(source)
            .into_iter()
            .map(|i| (i.specifier, i.kinds))
            .collect()
    }

    #[test]
    fn recognizes_every_import_form() {
        let source = r#"
import './polyfill';
import React, { useState } from 'react';
import * as path from "node:path";
import type { User } from './model';
import {
  a,
  b,
} from '../shared/util';
export { helper } from './helper';
export * from './barrel';
const legacy = require('./legacy');
const lazy = await import('./lazy');
"#;
        assert_eq!(
            parsed(source),
            vec![
                ("./polyfill".to_string(), vec![]),
                ("react".to_string(), vec![Value, Default, Named]),
                ("node:path".to_string(), vec![Value, Namespace]),
                ("./model".to_string(), vec![Type, Named]),
                ("../shared/util".to_string(), vec![Value, Named]),
                ("./helper".to_string(), vec![Value, Named]),
                ("./barrel".to_string(), vec![Value, Namespace]),
                ("./legacy".to_string(), vec![Value]),
                ("./lazy".to_string(), vec![Value]),
            ]
        );
    }

    #[test]
    fn inline_type_specifiers_are_type_only() {
        assert_eq!(
            parsed("import { type A, type B } from './types';"),
            vec![("./types".to_string(), vec![Type, Named])]
        );
        assert_eq!(
            parsed("import { type A, b } from './mixed';"),
            vec![("./mixed".to_string(), vec![Value, Named])]
        );
    }

    #[test]
    fn commented_imports_are_ignored() {
        let source = "// import a from './a';\n/* import b from './b'; */\nimport c from './c';";
        assert_eq!(parsed(source), vec![("./c".to_string(), vec![Value, Default])]);
    }

    #[test]
    fn strings_keep_comment_markers() {
        let stripped = strip_comments("const url = 'http://x'; // tail");
        assert_eq!(stripped, "const url = 'http://x';        ");
    }
}
