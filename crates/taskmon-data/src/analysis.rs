//! Batch analysis pipeline for taskmon.
//!
//! Loads a captured log, accumulates per-task series and produces a
//! [`UtilizationReport`] ready for the chart and summary views.

use std::path::Path;

use chrono::Utc;
use taskmon_core::error::Result;
use taskmon_core::models::SampleColumn;
use taskmon_core::summary::{TaskAverages, UtilizationBreakdown, BREAKDOWN_TOP_N};

use crate::aggregator::TaskAggregator;
use crate::reader::load_capture;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters produced alongside the report.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Total lines seen in the input.
    pub lines_read: u64,
    /// Lines that qualified and parsed cleanly.
    pub lines_accepted: u64,
    /// Task records ingested (after the ignore filter).
    pub records_ingested: u64,
    /// Number of distinct tasks observed.
    pub tasks: usize,
}

/// The complete output of [`analyze_capture`].
#[derive(Debug, Clone)]
pub struct UtilizationReport {
    /// Per-task averages in stable (sorted) task order.
    pub averages: Vec<TaskAverages>,
    /// Top-4 + "Other" ranking by average utilization.
    pub breakdown: UtilizationBreakdown,
    /// Total utilization % per sample index, summed across tasks.
    pub total_utilization: Vec<f64>,
    /// Per-task utilization % series, one entry per task in stable order.
    pub per_task_utilization: Vec<(String, Vec<f64>)>,
    /// Total time error % per sample index, summed across tasks.
    pub total_time_error: Vec<f64>,
    /// Number of chart points (length of the longest series).
    pub sample_count: usize,
    /// Ingestion counters.
    pub metadata: ReportMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the batch pipeline: ingest the capture at `path`, then derive every
/// series and summary the views need.
pub fn analyze_capture(
    path: &Path,
    marker: &str,
    ignore_task: Option<&str>,
) -> Result<UtilizationReport> {
    let mut aggregator = TaskAggregator::new(marker, ignore_task.map(str::to_string));
    load_capture(&mut aggregator, path)?;
    Ok(build_report(&aggregator))
}

/// Derive a [`UtilizationReport`] from an already-populated aggregator.
///
/// Shared by the batch pipeline and the live orchestrator's end-of-input
/// finalization.
pub fn build_report(aggregator: &TaskAggregator) -> UtilizationReport {
    let sample_count = aggregator.sample_count();

    let total_utilization =
        aggregator.extract_column(sample_count, SampleColumn::Utilization, None);
    let total_time_error = aggregator.extract_column(sample_count, SampleColumn::TimeError, None);

    let per_task_utilization: Vec<(String, Vec<f64>)> = aggregator
        .task_names()
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                aggregator.extract_column(sample_count, SampleColumn::Utilization, Some(name)),
            )
        })
        .collect();

    let averages = aggregator.averages();
    let breakdown = UtilizationBreakdown::top_n(&averages, BREAKDOWN_TOP_N);

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        lines_read: aggregator.lines_read(),
        lines_accepted: aggregator.lines_accepted(),
        records_ingested: aggregator.records_ingested(),
        tasks: aggregator.task_names().len(),
    };

    UtilizationReport {
        averages,
        breakdown,
        total_utilization,
        per_task_utilization,
        total_time_error,
        sample_count,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_analyze_capture_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "flight.log",
            &[
                "altitude,100,10000,100\tyaw,200,10000,100",
                "altitude,300,10000,100\tyaw,400,10000,100",
            ],
        );

        let report = analyze_capture(&path, "altitude", None).unwrap();

        assert_eq!(report.sample_count, 2);
        assert_eq!(report.metadata.lines_read, 2);
        assert_eq!(report.metadata.lines_accepted, 2);
        assert_eq!(report.metadata.tasks, 2);

        // totals: 3.0 then 7.0
        assert!((report.total_utilization[0] - 3.0).abs() < 1e-9);
        assert!((report.total_utilization[1] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_capture_ignore_task() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "flight.log",
            &["altitude,100,10000,100\tuart_kernel_data,900,10000,100"],
        );

        let report = analyze_capture(&path, "altitude", Some("uart_kernel_data")).unwrap();
        assert_eq!(report.metadata.tasks, 1);
        assert!((report.total_utilization[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_breakdown_sums_to_total() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "flight.log",
            &["altitude,100,10000,100\tyaw,200,10000,100\tclock,50,10000,100\tpwm,25,10000,100\tinput,10,10000,100\tdisplay,5,10000,100"],
        );

        let report = analyze_capture(&path, "altitude", None).unwrap();
        assert_eq!(report.breakdown.top.len(), 4);

        let top_sum: f64 = report.breakdown.top.iter().map(|(_, p)| p).sum();
        assert!(
            (top_sum + report.breakdown.other_pct - report.breakdown.total_pct).abs() < 1e-9
        );
    }

    #[test]
    fn test_report_per_task_series_lengths() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "flight.log",
            &[
                "altitude,100,10000,100\tyaw,200,10000,100",
                "altitude,300,10000,100",
            ],
        );

        let report = analyze_capture(&path, "altitude", None).unwrap();
        assert_eq!(report.sample_count, 2);
        for (_, series) in &report.per_task_utilization {
            assert_eq!(series.len(), 2);
        }

        // yaw is absent at index 1 → contributes 0.
        let yaw = report
            .per_task_utilization
            .iter()
            .find(|(name, _)| name == "yaw")
            .map(|(_, s)| s.clone())
            .unwrap();
        assert_eq!(yaw[1], 0.0);
    }

    #[test]
    fn test_report_empty_log() {
        let dir = TempDir::new().unwrap();
        let path = write_log(dir.path(), "empty.log", &["no data at all"]);

        let report = analyze_capture(&path, "altitude", None).unwrap();
        assert_eq!(report.sample_count, 0);
        assert!(report.averages.is_empty());
        assert!(report.total_utilization.is_empty());
        assert_eq!(report.breakdown.total_pct, 0.0);
    }

    #[test]
    fn test_report_metadata_generated_at_set() {
        let dir = TempDir::new().unwrap();
        let path = write_log(dir.path(), "flight.log", &["altitude,100,10000,100"]);
        let report = analyze_capture(&path, "altitude", None).unwrap();
        assert!(!report.metadata.generated_at.is_empty());
    }
}
