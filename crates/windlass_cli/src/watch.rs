//! File system watching: notify events into the watch coordinator

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};
use windlass_engine::{ChangeEvent, Engine, IncrementalBuild, WatchCoordinator, WatchOptions};

use crate::output::OutputTarget;

/// Events buffered between the notify thread and the coordinator
const CHANNEL_CAPACITY: usize = 1024;

pub struct WatchSettings {
    pub root: PathBuf,
    pub debounce: Duration,
    /// Poll instead of using native notifications
    pub poll: Option<Duration>,
}

/// Translate a notify event, dropping writes to `ignore` (our own output)
pub fn change_events(event: &Event, ignore: &[PathBuf]) -> Vec<ChangeEvent> {
    let paths = event
        .paths
        .iter()
        .filter(|path| !ignore.iter().any(|ignored| path.as_path() == ignored.as_path()));
    match event.kind {
        EventKind::Remove(_) => paths.cloned().map(ChangeEvent::Removed).collect(),
        EventKind::Create(_) | EventKind::Modify(_) => paths.cloned().map(ChangeEvent::Changed).collect(),
        _ => Vec::new(),
    }
}

/// Build once, then rebuild on every relevant change until interrupted
pub async fn run(engine: Arc<Engine>, target: OutputTarget, settings: WatchSettings) -> Result<()> {
    let build = IncrementalBuild::initial(engine);
    if target.write(build.stylesheet())? {
        info!(path = %target.path.display(), "wrote stylesheet");
    }

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let ignore = ignored_paths(&target);
    let handler = move |result: notify::Result<Event>| match result {
        Ok(event) => {
            for change in change_events(&event, &ignore) {
                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        }
        Err(e) => warn!("watch error: {e}"),
    };

    let mut watcher: Box<dyn Watcher + Send> = match settings.poll {
        Some(interval) => Box::new(
            notify::PollWatcher::new(handler, notify::Config::default().with_poll_interval(interval))
                .context("Failed to start poll watcher")?,
        ),
        None => Box::new(notify::recommended_watcher(handler).context("Failed to start watcher")?),
    };
    watcher
        .watch(&settings.root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", settings.root.display()))?;
    let inputs = template_paths(&target);
    if let Some(outside) = inputs
        .iter()
        .find(|path| path.is_absolute() && !path.starts_with(&settings.root))
    {
        watcher
            .watch(outside, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", outside.display()))?;
    }

    info!(root = %settings.root.display(), "watching for changes (press Ctrl+C to stop)");

    let sink = move |stylesheet: &str| -> windlass_engine::Result<()> {
        if target.write(stylesheet)? {
            info!(path = %target.path.display(), "wrote stylesheet");
        }
        Ok(())
    };
    let options = WatchOptions {
        debounce: settings.debounce,
        inputs,
    };
    let stats = WatchCoordinator::new(build, sink, options).run(rx).await;

    // Keep the watcher alive for the coordinator's lifetime
    drop(watcher);
    info!(
        commits = stats.commits,
        superseded = stats.superseded,
        failed = stats.failed,
        "watch stopped"
    );
    Ok(())
}

/// The output file, both as given and canonicalized
fn ignored_paths(target: &OutputTarget) -> Vec<PathBuf> {
    with_canonical(&target.path)
}

/// The template stylesheet, if any, in the forms notify may report it
fn template_paths(target: &OutputTarget) -> Vec<PathBuf> {
    target.template.as_deref().map(with_canonical).unwrap_or_default()
}

fn with_canonical(path: &Path) -> Vec<PathBuf> {
    let mut paths = vec![path.to_path_buf()];
    if let Some(canonical) = canonical_path(path).filter(|c| c != path) {
        paths.push(canonical);
    }
    paths
}

fn canonical_path(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?.canonicalize().ok()?;
    Some(parent.join(path.file_name()?))
}
