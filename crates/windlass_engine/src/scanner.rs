//! Content scanning
//!
//! Enumerates the files named by the `content` globs and pulls candidate
//! class tokens out of their text. Extraction is lexical only: any maximal
//! run of class characters is a candidate, and the interpreter decides what
//! is real.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{ConfigError, ScanWarning, ScanWarningKind};

/// Default per-file size limit (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Larger files are skipped with a warning
    pub max_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Expand `{a,b}` alternatives. Nested groups are supported; an unmatched
/// brace is kept literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let mut out = Vec::new();
    expand_into(pattern, &mut out);
    let mut seen = BTreeSet::new();
    out.retain(|p| seen.insert(p.clone()));
    out
}

fn expand_into(pattern: &str, out: &mut Vec<String>) {
    let Some((open, close)) = first_group(pattern) else {
        out.push(pattern.to_string());
        return;
    };
    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    for alternative in split_alternatives(&pattern[open + 1..close]) {
        expand_into(&format!("{prefix}{alternative}{suffix}"), out);
    }
}

/// Byte offsets of the first balanced `{ ... }`
fn first_group(pattern: &str) -> Option<(usize, usize)> {
    let open = pattern.find('{')?;
    let mut depth = 0usize;
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, open + i));
                }
            }
            _ => {}
        }
    }
    None
}

fn split_alternatives(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

/// One `content` entry, brace-expanded and anchored at the project root
#[derive(Clone, Debug)]
struct ContentPattern {
    source: String,
    globs: Vec<(String, Pattern)>,
}

/// The compiled `content` globs of a project
#[derive(Clone, Debug)]
pub struct ContentMatcher {
    root: PathBuf,
    patterns: Vec<ContentPattern>,
}

impl ContentMatcher {
    /// Compile `patterns`, relative to `root`
    pub fn new<S: AsRef<str>>(root: impl Into<PathBuf>, patterns: &[S]) -> Result<Self, ConfigError> {
        let root = root.into();
        let anchor = Pattern::escape(&root.to_string_lossy());

        let mut compiled = Vec::with_capacity(patterns.len());
        for (index, source) in patterns.iter().enumerate() {
            let source = source.as_ref();
            let mut globs = Vec::new();
            for expanded in expand_braces(source) {
                let relative = expanded.trim_start_matches("./");
                let full = if anchor.is_empty() {
                    relative.to_string()
                } else {
                    format!("{}/{relative}", anchor.trim_end_matches('/'))
                };
                let pattern = Pattern::new(&full).map_err(|e| ConfigError::InvalidPattern {
                    index,
                    pattern: source.to_string(),
                    message: e.msg.to_string(),
                })?;
                globs.push((full, pattern));
            }
            compiled.push(ContentPattern {
                source: source.to_string(),
                globs,
            });
        }

        Ok(Self {
            root,
            patterns: compiled,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The patterns as written in the configuration
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// File extensions the patterns are restricted to, e.g. `rs` for
    /// `src/**/*.rs`. Patterns without a literal extension add nothing.
    pub fn extensions(&self) -> BTreeSet<&str> {
        self.patterns
            .iter()
            .flat_map(|p| &p.globs)
            .filter_map(|(full, _)| {
                let name = full.rsplit('/').next()?;
                let (_, extension) = name.rsplit_once('.')?;
                extension
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric())
                    .then_some(extension)
                    .filter(|e| !e.is_empty())
            })
            .collect()
    }

    /// Whether `path` falls under any pattern. Relative paths are taken
    /// relative to the root.
    pub fn matches(&self, path: &Path) -> bool {
        let path = if path.is_relative() {
            self.root.join(path)
        } else {
            path.to_path_buf()
        };
        self.patterns
            .iter()
            .flat_map(|p| &p.globs)
            .any(|(_, glob)| glob.matches_path_with(&path, MATCH_OPTIONS))
    }

    /// Every matching regular file, deduplicated and sorted by path.
    /// A glob root that does not exist matches nothing.
    pub fn files(&self) -> (Vec<PathBuf>, Vec<ScanWarning>) {
        let mut files = BTreeSet::new();
        let mut warnings = Vec::new();

        for (full, _) in self.patterns.iter().flat_map(|p| &p.globs) {
            let entries = match glob::glob_with(full, MATCH_OPTIONS) {
                Ok(entries) => entries,
                // Already validated by `Pattern::new`
                Err(_) => continue,
            };
            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => {
                        files.insert(path);
                    }
                    Ok(_) => {}
                    Err(e) => warnings.push(ScanWarning {
                        path: e.path().to_path_buf(),
                        reason: ScanWarningKind::Walk(e.error().to_string()),
                    }),
                }
            }
        }

        (files.into_iter().collect(), warnings)
    }
}

fn is_class_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '/' | '.' | '_' | '!' | '[' | ']')
}

/// Extra characters allowed inside `[...]`
fn is_arbitrary_char(c: char) -> bool {
    matches!(c, '#' | '%' | '(' | ')' | ',' | '+' | '*')
}

/// Extract candidate tokens from `text` in discovery order
pub fn extract_tokens(text: &str) -> IndexSet<String> {
    let mut tokens = IndexSet::new();
    extract_into(text, &mut tokens);
    tokens
}

/// Like [`extract_tokens`], appending to an existing set
pub fn extract_into(text: &str, tokens: &mut IndexSet<String>) {
    let mut start = None;
    let mut depth = 0usize;

    for (i, c) in text.char_indices() {
        let accepted = is_class_char(c) || (depth > 0 && is_arbitrary_char(c));
        if accepted {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                _ => {}
            }
            start.get_or_insert(i);
        } else if let Some(from) = start.take() {
            push_candidate(&text[from..i], tokens);
            depth = 0;
        }
    }
    if let Some(from) = start {
        push_candidate(&text[from..], tokens);
    }
}

fn push_candidate(run: &str, tokens: &mut IndexSet<String>) {
    let token = run.trim_matches(|c| c == '.' || c == ':');
    if token.bytes().any(|b| b.is_ascii_alphabetic()) && !tokens.contains(token) {
        tokens.insert(token.to_string());
    }
}

/// Read one file and extract its tokens
pub fn scan_file(path: &Path, options: &ScanOptions) -> Result<IndexSet<String>, ScanWarning> {
    let warning = |reason| ScanWarning {
        path: path.to_path_buf(),
        reason,
    };

    let size = fs::metadata(path)
        .map_err(|e| warning(ScanWarningKind::Unreadable(e.to_string())))?
        .len();
    if size > options.max_file_size {
        return Err(warning(ScanWarningKind::TooLarge {
            size,
            limit: options.max_file_size,
        }));
    }

    let text = fs::read_to_string(path).map_err(|e| warning(ScanWarningKind::Unreadable(e.to_string())))?;
    Ok(extract_tokens(&text))
}

/// Tokens per file, in path order
#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    pub per_file: Vec<(PathBuf, IndexSet<String>)>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanOutput {
    /// All tokens, merged in path order then discovery order
    pub fn tokens(&self) -> IndexSet<String> {
        let mut merged = IndexSet::new();
        for (_, tokens) in &self.per_file {
            merged.extend(tokens.iter().cloned());
        }
        merged
    }

    pub fn files_scanned(&self) -> usize {
        self.per_file.len()
    }
}

/// Scan every file the matcher names. Files are read in parallel; results
/// keep path order.
pub fn scan(matcher: &ContentMatcher, options: &ScanOptions) -> ScanOutput {
    let (files, mut warnings) = matcher.files();
    debug!(files = files.len(), "scanning content");

    let results: Vec<_> = files
        .into_par_iter()
        .map(|path| {
            let result = scan_file(&path, options);
            (path, result)
        })
        .collect();

    let mut per_file = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(tokens) => per_file.push((path, tokens)),
            Err(warning) => warnings.push(warning),
        }
    }
    for warning in &warnings {
        warn!("{warning}");
    }

    ScanOutput { per_file, warnings }
}
