//! Live monitoring orchestrator.
//!
//! Runs the ingest loop in a tokio task, sending periodic
//! [`MonitorSnapshot`]s through an `mpsc` channel so the TUI event loop can
//! consume them without any shared mutable state.

use std::collections::VecDeque;
use std::time::Duration;

use taskmon_core::models::{SampleColumn, TaskSample};
use taskmon_core::summary::TaskAverages;
use taskmon_data::aggregator::TaskAggregator;
use taskmon_data::analysis::{build_report, UtilizationReport};
use tokio::sync::mpsc;
use tokio::time;

use crate::source::LineSource;

// ── Public types ──────────────────────────────────────────────────────────────

/// A single monitoring snapshot forwarded to the TUI layer.
///
/// This is the primary data contract between the background runtime and the
/// presentation layer.
#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    /// Recent total-utilization points, oldest first, at most the configured
    /// window length.
    pub window: Vec<f64>,
    /// The most recent sample of each task, in stable task order.
    pub latest: Vec<(String, TaskSample)>,
    /// Running per-task averages.
    pub averages: Vec<TaskAverages>,
    /// Total lines seen so far.
    pub lines_read: u64,
    /// Lines that qualified and parsed cleanly.
    pub lines_accepted: u64,
    /// Task records ingested (after the ignore filter).
    pub records_ingested: u64,
    /// Set on the last snapshot, once end of input was reached.
    pub finished: bool,
    /// Full report computed at end of input; `None` on interim snapshots.
    pub report: Option<UtilizationReport>,
}

// ── MonitorOrchestrator ───────────────────────────────────────────────────────

/// Background ingest coordinator.
///
/// Call [`MonitorOrchestrator::start`] to spin up the ingest loop in a
/// dedicated tokio task and receive a channel endpoint for
/// [`MonitorSnapshot`] updates.
pub struct MonitorOrchestrator {
    /// How often interim snapshots are published.
    refresh_interval: Duration,
    /// Maximum number of total-utilization points kept for the live chart.
    window_len: usize,
    /// Substring gating which lines are parsed.
    marker: String,
    /// Task skipped during aggregation, if any.
    ignore_task: Option<String>,
}

impl MonitorOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Parameters
    /// - `refresh_secs` – seconds between interim snapshots.
    /// - `window_len`   – live chart window length in samples.
    /// - `marker`       – data-line marker substring.
    /// - `ignore_task`  – task name excluded from aggregation.
    pub fn new(
        refresh_secs: u64,
        window_len: usize,
        marker: impl Into<String>,
        ignore_task: Option<String>,
    ) -> Self {
        Self {
            refresh_interval: Duration::from_secs(refresh_secs),
            window_len,
            marker: marker.into(),
            ignore_task,
        }
    }

    /// Start the ingest loop over `source`.
    ///
    /// Returns:
    /// - An `mpsc::Receiver<MonitorSnapshot>` for the caller to poll.
    /// - A [`MonitorHandle`] that can be used to abort the loop.
    pub fn start(self, source: LineSource) -> (mpsc::Receiver<MonitorSnapshot>, MonitorHandle) {
        // Buffer a modest number of snapshots so slow consumers don't stall
        // the loop.
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.monitor_loop(source, tx).await;
        });

        (rx, MonitorHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// The main ingest loop.
    ///
    /// Lines are ingested as they arrive; interim snapshots are published on
    /// the refresh interval when new data accumulated. End of input triggers
    /// the one-time finalization: a last snapshot carrying the full report.
    async fn monitor_loop(self, mut source: LineSource, tx: mpsc::Sender<MonitorSnapshot>) {
        let mut aggregator = TaskAggregator::new(self.marker.clone(), self.ignore_task.clone());
        let mut window: VecDeque<f64> = VecDeque::with_capacity(self.window_len);
        let mut finalized = false;
        let mut dirty = false;

        let mut interval = time::interval(self.refresh_interval);
        // Consume the first tick which fires immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                maybe_line = source.next_line() => match maybe_line {
                    Ok(Some(line)) => {
                        if aggregator.ingest_line(&line) > 0 {
                            self.push_window_point(&aggregator, &mut window);
                            dirty = true;
                        }
                    }
                    Ok(None) => {
                        // End of input: compute final averages exactly once.
                        if !finalized {
                            finalized = true;
                            let snapshot = self.snapshot(&aggregator, &window, true);
                            if tx.send(snapshot).await.is_err() {
                                tracing::debug!("receiver dropped before final snapshot");
                            }
                        }
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "read failed; stopping ingest loop");
                        break;
                    }
                },

                _ = interval.tick() => {
                    if tx.is_closed() {
                        tracing::debug!("snapshot channel closed; exiting loop");
                        break;
                    }
                    if dirty {
                        dirty = false;
                        let snapshot = self.snapshot(&aggregator, &window, false);
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Append the newest total-utilization point, dropping the oldest once
    /// the window is full.
    fn push_window_point(&self, aggregator: &TaskAggregator, window: &mut VecDeque<f64>) {
        let index = aggregator.sample_count().saturating_sub(1);
        let total = aggregator.column_total_at(index, SampleColumn::Utilization);

        if window.len() == self.window_len {
            window.pop_front();
        }
        window.push_back(total);
    }

    /// Build a snapshot of the current aggregation state.
    fn snapshot(
        &self,
        aggregator: &TaskAggregator,
        window: &VecDeque<f64>,
        finished: bool,
    ) -> MonitorSnapshot {
        let latest = aggregator
            .latest_samples()
            .into_iter()
            .map(|(name, sample)| (name.to_string(), sample.clone()))
            .collect();

        MonitorSnapshot {
            window: window.iter().copied().collect(),
            latest,
            averages: aggregator.averages(),
            lines_read: aggregator.lines_read(),
            lines_accepted: aggregator.lines_accepted(),
            records_ingested: aggregator.records_ingested(),
            finished,
            report: finished.then(|| build_report(aggregator)),
        }
    }
}

// ── MonitorHandle ─────────────────────────────────────────────────────────────

/// A handle to the background ingest task.
///
/// Drop or call [`MonitorHandle::abort`] to stop the loop.
pub struct MonitorHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl MonitorHandle {
    /// Immediately abort the ingest loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
