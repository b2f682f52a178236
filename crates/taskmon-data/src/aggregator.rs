//! Per-task sample series accumulation and column extraction.

use std::collections::BTreeMap;

use taskmon_core::models::{SampleColumn, TaskRecord, TaskSample};
use taskmon_core::summary::TaskAverages;

use crate::parser::parse_line;

// ── TaskAggregator ────────────────────────────────────────────────────────────

/// Accumulates derived samples per task name.
///
/// The aggregator exclusively owns the series mapping; extraction functions
/// borrow read-only views. Series lengths may differ when a line is missing
/// a task; extraction treats an absent index as contributing zero.
#[derive(Debug, Clone)]
pub struct TaskAggregator {
    /// Task name → ordered sample history. BTreeMap keeps task iteration
    /// order stable across runs.
    series: BTreeMap<String, Vec<TaskSample>>,
    /// Substring gating which lines are parsed.
    marker: String,
    /// Task skipped during aggregation, if any.
    ignore_task: Option<String>,
    lines_read: u64,
    lines_accepted: u64,
    records_ingested: u64,
}

impl TaskAggregator {
    pub fn new(marker: impl Into<String>, ignore_task: Option<String>) -> Self {
        Self {
            series: BTreeMap::new(),
            marker: marker.into(),
            ignore_task,
            lines_read: 0,
            lines_accepted: 0,
            records_ingested: 0,
        }
    }

    // ── Ingestion ─────────────────────────────────────────────────────────────

    /// Parse `line` and record every resulting task record.
    ///
    /// Returns the number of records ingested (0 for a rejected line).
    pub fn ingest_line(&mut self, line: &str) -> usize {
        self.lines_read += 1;

        let records = parse_line(line, &self.marker);
        if records.is_empty() {
            return 0;
        }

        self.lines_accepted += 1;
        let mut ingested = 0;
        for record in &records {
            if self.record(record) {
                ingested += 1;
            }
        }
        ingested
    }

    /// Derive a sample from `record` and append it to that task's series,
    /// creating the series on first occurrence.
    ///
    /// Returns `false` when the record belongs to the ignored task.
    pub fn record(&mut self, record: &TaskRecord) -> bool {
        if self.ignore_task.as_deref() == Some(record.name.as_str()) {
            return false;
        }

        self.series
            .entry(record.name.clone())
            .or_default()
            .push(TaskSample::from_record(record));
        self.records_ingested += 1;
        true
    }

    // ── Read-only views ───────────────────────────────────────────────────────

    /// The full task-name → series mapping.
    pub fn series(&self) -> &BTreeMap<String, Vec<TaskSample>> {
        &self.series
    }

    /// Task names in stable (sorted) order.
    pub fn task_names(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    /// Length of the longest series, i.e. the number of chart points.
    pub fn sample_count(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    /// The most recent sample of each task, in stable order.
    pub fn latest_samples(&self) -> Vec<(&str, &TaskSample)> {
        self.series
            .iter()
            .filter_map(|(name, samples)| samples.last().map(|s| (name.as_str(), s)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn lines_accepted(&self) -> u64 {
        self.lines_accepted
    }

    pub fn records_ingested(&self) -> u64 {
        self.records_ingested
    }

    // ── Column extraction ─────────────────────────────────────────────────────

    /// Produce a fixed-length numeric sequence for one sample column.
    ///
    /// At each index the requested column is summed across all tasks (or
    /// taken from `task` alone when a filter is given), with an absent
    /// sample contributing zero. Utilization and time-error extraction are
    /// this one operation parameterized by `column`.
    pub fn extract_column(
        &self,
        len: usize,
        column: SampleColumn,
        task: Option<&str>,
    ) -> Vec<f64> {
        let mut values = vec![0.0; len];

        for (name, samples) in &self.series {
            if let Some(filter) = task {
                if name != filter {
                    continue;
                }
            }
            for (i, sample) in samples.iter().take(len).enumerate() {
                values[i] += sample.column(column);
            }
        }

        values
    }

    /// Sum one column across all tasks at a single sample index, counting
    /// only the series long enough to have a sample there.
    pub fn column_total_at(&self, index: usize, column: SampleColumn) -> f64 {
        self.series
            .values()
            .filter_map(|samples| samples.get(index))
            .map(|sample| sample.column(column))
            .sum()
    }

    /// Per-task averages over every ingested sample, in stable order.
    pub fn averages(&self) -> Vec<TaskAverages> {
        self.series
            .iter()
            .map(|(name, samples)| TaskAverages::from_series(name.clone(), samples))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
