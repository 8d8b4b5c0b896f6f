//! `tsconfig.json` path aliases.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ExtractError;
use crate::imports::strip_comments;
use crate::resolve::normalize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TsConfigFile {
    #[serde(default)]
    compiler_options: CompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    paths: BTreeMap<String, Vec<String>>,
}

/// Module resolution settings, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsConfig {
    /// `compilerOptions.baseUrl`, root-relative (`""` for the root itself).
    pub base_url: Option<String>,
    /// `compilerOptions.paths` as `(pattern, targets)`, longest prefix first.
    pub paths: Vec<(String, Vec<String>)>,
}

impl TsConfig {
    /// Reads a tsconfig file. Comments and trailing commas are tolerated.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text).map_err(|e| ExtractError::TsConfig {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parses tsconfig text.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not valid JSON after comment removal.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let cleaned = strip_trailing_commas(&strip_comments(text));
        let file: TsConfigFile = serde_json::from_str(&cleaned)?;
        let options = file.compiler_options;

        let base_url = options.base_url.as_deref().and_then(normalize);
        let mut paths: Vec<(String, Vec<String>)> = options.paths.into_iter().collect();
        paths.sort_by(|a, b| prefix_len(&b.0).cmp(&prefix_len(&a.0)));

        Ok(Self { base_url, paths })
    }

    /// Candidate root-relative paths for a non-relative specifier, in
    /// priority order.
    #[must_use]
    pub fn candidates(&self, specifier: &str) -> Vec<String> {
        let base = self.base_url.as_deref().unwrap_or("");
        let mut out = Vec::new();

        for (pattern, targets) in &self.paths {
            let Some(captured) = match_alias(pattern, specifier) else {
                continue;
            };
            out.extend(
                targets
                    .iter()
                    .filter_map(|t| normalize(&join(base, &t.replacen('*', captured, 1)))),
            );
            break;
        }

        if self.base_url.is_some() {
            if let Some(path) = normalize(&join(base, specifier)) {
                out.push(path);
            }
        }
        out
    }
}

/// Drops commas that directly precede `}` or `]`, outside string literals.
fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut chars = json.char_indices();

    while let Some((i, c)) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if json[i + 1..]
                .trim_start()
                .starts_with(['}', ']']) => {}
            _ => out.push(c),
        }
    }
    out
}

fn prefix_len(pattern: &str) -> usize {
    pattern.find('*').unwrap_or(pattern.len())
}

/// Matches `@app/*` against `@app/x/y`, returning `x/y`.
fn match_alias<'a>(pattern: &str, specifier: &'a str) -> Option<&'a str> {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => specifier
            .strip_prefix(prefix)?
            .strip_suffix(suffix),
        None => (pattern == specifier).then_some(""),
    }
}

fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else {
        format!("{base}/{rest}")
    }
}
