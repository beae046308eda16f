//! Incremental rebuilds for watch mode
//!
//! [`IncrementalBuild`] caches tokens per file and one generated rule (or a
//! rejection) per token. A rebuild re-reads only the files named by its
//! events, interprets only tokens it has not seen, and then reassembles in
//! full-build order, so its output is byte-identical to [`Engine::build`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::{EngineError, Result, ScanWarning};
use crate::generator::{dedup_rules, GeneratedRule};
use crate::scanner::{scan, scan_file};

/// A file system change relevant to the content set
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    /// Created or modified
    Changed(PathBuf),
    Removed(PathBuf),
}

impl ChangeEvent {
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Changed(path) | ChangeEvent::Removed(path) => path,
        }
    }
}

/// Shared flag telling an in-flight rebuild to stop
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancelled
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// What a rebuild did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub files_rescanned: usize,
    pub files_removed: usize,
    pub tokens_added: usize,
    pub tokens_dropped: usize,
    /// The stylesheet text differs from the previous one
    pub changed: bool,
}

/// Cached build state. Cloning is the snapshot taken before a rebuild.
#[derive(Clone)]
pub struct IncrementalBuild {
    engine: Arc<Engine>,
    files: BTreeMap<PathBuf, IndexSet<String>>,
    rules: FxHashMap<String, Option<GeneratedRule>>,
    warnings: BTreeMap<PathBuf, ScanWarning>,
    stylesheet: String,
}

impl IncrementalBuild {
    /// Scan everything once and fill the caches
    pub fn initial(engine: Arc<Engine>) -> Self {
        let scanned = scan(engine.matcher(), engine.scan_options());
        let mut build = Self {
            engine,
            files: scanned.per_file.into_iter().collect(),
            rules: FxHashMap::default(),
            warnings: scanned
                .warnings
                .into_iter()
                .map(|w| (w.path.clone(), w))
                .collect(),
            stylesheet: String::new(),
        };
        let tokens = build.tokens();
        for token in &tokens {
            build.fill_rule(token);
        }
        build.stylesheet = build.assemble(&tokens);
        build
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    /// Files currently contributing tokens, in path order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ScanWarning> {
        self.warnings.values()
    }

    /// Apply `events`. Returns `Err(Cancelled)` as soon as `cancel` is set;
    /// the state is then partially updated and must be discarded.
    pub fn rebuild(&mut self, events: &[ChangeEvent], cancel: &CancelToken) -> Result<RebuildSummary> {
        let mut summary = RebuildSummary::default();

        let mut changed: IndexSet<&Path> = IndexSet::new();
        for event in events {
            match event {
                ChangeEvent::Removed(path) => {
                    changed.shift_remove(path.as_path());
                    summary.files_removed += self.forget(path);
                }
                ChangeEvent::Changed(path) if path.is_dir() => {
                    for file in self.engine.matcher().files().0 {
                        if file.starts_with(path) && !self.files.contains_key(&file) {
                            summary.files_rescanned += self.rescan(&file);
                        }
                    }
                }
                ChangeEvent::Changed(path) => {
                    changed.insert(path.as_path());
                }
            }
        }

        for path in changed {
            cancel.check()?;
            if path.is_file() && self.engine.matcher().matches(path) {
                summary.files_rescanned += self.rescan(path);
            } else {
                summary.files_removed += self.forget(path);
            }
        }

        cancel.check()?;
        let tokens = self.tokens();
        summary.tokens_added = self.fill_rules(&tokens, cancel)?;

        let before = self.rules.len();
        self.rules.retain(|token, _| tokens.contains(token));
        summary.tokens_dropped = before - self.rules.len();

        cancel.check()?;
        let stylesheet = self.assemble(&tokens);
        summary.changed = stylesheet != self.stylesheet;
        self.stylesheet = stylesheet;

        debug!(
            rescanned = summary.files_rescanned,
            removed = summary.files_removed,
            added = summary.tokens_added,
            dropped = summary.tokens_dropped,
            "incremental rebuild"
        );
        Ok(summary)
    }

    /// Re-read one file; returns 1 if its tokens were refreshed
    fn rescan(&mut self, path: &Path) -> usize {
        match scan_file(path, self.engine.scan_options()) {
            Ok(tokens) => {
                self.warnings.remove(path);
                self.files.insert(path.to_path_buf(), tokens);
                1
            }
            Err(warning) => {
                warn!("{warning}");
                self.files.remove(path);
                self.warnings.insert(path.to_path_buf(), warning);
                0
            }
        }
    }

    /// Drop a file, or every cached file under a removed directory
    fn forget(&mut self, path: &Path) -> usize {
        let before = self.files.len();
        self.files.retain(|file, _| !file.starts_with(path));
        self.warnings.retain(|file, _| !file.starts_with(path));
        before - self.files.len()
    }

    /// All cached tokens in full-build order
    fn tokens(&self) -> IndexSet<String> {
        let mut tokens = IndexSet::new();
        for file_tokens in self.files.values() {
            tokens.extend(file_tokens.iter().cloned());
        }
        tokens
    }

    /// Interpret tokens missing from the rule cache
    fn fill_rules(&mut self, tokens: &IndexSet<String>, cancel: &CancelToken) -> Result<usize> {
        let mut added = 0;
        for token in tokens {
            cancel.check()?;
            if self.fill_rule(token) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Cache the rule for `token` unless already known. Returns `true` if
    /// the token was new.
    fn fill_rule(&mut self, token: &str) -> bool {
        if self.rules.contains_key(token) {
            return false;
        }
        let rule = self.engine.rule_for(token);
        self.rules.insert(token.to_string(), rule);
        true
    }

    fn assemble(&self, tokens: &IndexSet<String>) -> String {
        let rules = dedup_rules(
            tokens
                .iter()
                .filter_map(|token| self.rules.get(token).cloned().flatten()),
        );
        self.engine.assemble(&rules)
    }
}
