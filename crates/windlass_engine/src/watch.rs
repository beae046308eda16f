//! Watch coordination
//!
//! A single task owns the committed [`IncrementalBuild`]. Change events are
//! debounced into a batch; each batch is rebuilt on a blocking thread
//! against a snapshot. An event arriving mid-rebuild cancels it, joins the
//! pending batch, and the merged batch is rebuilt from the last committed
//! state. Only rebuilds that were never cancelled reach the sink.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::incremental::{CancelToken, ChangeEvent, IncrementalBuild};

/// Default quiet period before a batch is rebuilt
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Receives each committed stylesheet
pub trait RebuildSink: Send + 'static {
    fn commit(&mut self, stylesheet: &str) -> Result<()>;
}

impl<F> RebuildSink for F
where
    F: FnMut(&str) -> Result<()> + Send + 'static,
{
    fn commit(&mut self, stylesheet: &str) -> Result<()> {
        self(stylesheet)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchOptions {
    pub debounce: Duration,
    /// Files outside the content set that the committed output depends on,
    /// such as a template stylesheet. A change to one commits even when the
    /// generated rules are unchanged.
    pub inputs: Vec<PathBuf>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            inputs: Vec::new(),
        }
    }
}

/// Counters returned when the event stream closes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Rebuilds whose stylesheet was handed to the sink
    pub commits: usize,
    /// Rebuilds that finished with an unchanged stylesheet
    pub unchanged: usize,
    /// Rebuilds abandoned because newer events arrived
    pub superseded: usize,
    /// Rebuilds or sink writes that failed
    pub failed: usize,
}

pub struct WatchCoordinator<S> {
    build: IncrementalBuild,
    sink: S,
    options: WatchOptions,
}

impl<S: RebuildSink> WatchCoordinator<S> {
    pub fn new(build: IncrementalBuild, sink: S, options: WatchOptions) -> Self {
        Self {
            build,
            sink,
            options,
        }
    }

    /// The last committed state
    pub fn build(&self) -> &IncrementalBuild {
        &self.build
    }

    /// Consume events until the sender side closes and every pending
    /// change has been rebuilt
    pub async fn run(mut self, mut events: mpsc::Receiver<ChangeEvent>) -> WatchStats {
        let mut stats = WatchStats::default();
        let mut pending: Vec<ChangeEvent> = Vec::new();
        let mut closed = false;

        loop {
            if pending.is_empty() {
                if closed {
                    break;
                }
                match events.recv().await {
                    Some(event) => pending.push(event),
                    None => break,
                }
            }
            closed |= self.debounce(&mut events, &mut pending).await;

            let batch = std::mem::take(&mut pending);
            let cancel = CancelToken::new();
            let mut snapshot = self.build.clone();
            let mut task = {
                let batch = batch.clone();
                let cancel = cancel.clone();
                tokio::task::spawn_blocking(move || {
                    snapshot
                        .rebuild(&batch, &cancel)
                        .map(|summary| (snapshot, summary))
                })
            };

            let joined = loop {
                tokio::select! {
                    joined = &mut task => break joined,
                    event = events.recv(), if !closed => match event {
                        Some(event) => {
                            cancel.cancel();
                            pending.push(event);
                        }
                        None => closed = true,
                    },
                }
            };

            if cancel.is_cancelled() {
                debug!(events = batch.len(), "rebuild superseded");
                stats.superseded += 1;
                let newer = std::mem::replace(&mut pending, batch);
                pending.extend(newer);
                continue;
            }

            match joined {
                Ok(Ok((next, summary))) => {
                    self.build = next;
                    if !summary.changed && !self.touches_inputs(&batch) {
                        stats.unchanged += 1;
                        continue;
                    }
                    match self.sink.commit(self.build.stylesheet()) {
                        Ok(()) => {
                            stats.commits += 1;
                            info!(
                                rescanned = summary.files_rescanned,
                                added = summary.tokens_added,
                                dropped = summary.tokens_dropped,
                                "stylesheet updated"
                            );
                        }
                        Err(e) => {
                            stats.failed += 1;
                            error!("failed to commit stylesheet: {e}");
                        }
                    }
                }
                Ok(Err(e)) => {
                    stats.failed += 1;
                    error!("rebuild failed: {e}");
                }
                Err(e) => {
                    stats.failed += 1;
                    error!("rebuild task panicked: {e}");
                }
            }
        }

        stats
    }

    fn touches_inputs(&self, batch: &[ChangeEvent]) -> bool {
        batch
            .iter()
            .any(|event| self.options.inputs.iter().any(|input| event.path() == input))
    }

    /// Collect events until the stream stays quiet for the debounce period.
    /// Returns `true` if the stream closed.
    async fn debounce(&self, events: &mut mpsc::Receiver<ChangeEvent>, pending: &mut Vec<ChangeEvent>) -> bool {
        loop {
            match tokio::time::timeout(self.options.debounce, events.recv()).await {
                Ok(Some(event)) => pending.push(event),
                Ok(None) => return true,
                Err(_) => return false,
            }
        }
    }
}
