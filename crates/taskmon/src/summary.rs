//! Plain-console summary output for `--view summary`.

use taskmon_core::formatting::{format_count, format_percent, pretty_task_name};
use taskmon_data::analysis::UtilizationReport;

/// Build the console summary: per-task averages followed by the heaviest-task
/// breakdown. Returned as lines so callers (and tests) control the writer.
pub fn build_summary_lines(report: &UtilizationReport) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Kernel task utilization: {} samples, {} tasks ({} of {} lines accepted)",
        format_count(report.sample_count as u64),
        report.metadata.tasks,
        format_count(report.metadata.lines_accepted),
        format_count(report.metadata.lines_read),
    ));
    lines.push(String::new());

    if report.averages.is_empty() {
        lines.push("No task data found.".to_string());
        return lines;
    }

    for avg in &report.averages {
        lines.push(format!(
            "  {:<24} {:>7}   (time error {:>6}, {} samples)",
            pretty_task_name(&avg.name),
            format_percent(avg.avg_utilization_pct),
            format_percent(avg.avg_time_error_pct),
            avg.samples,
        ));
    }
    lines.push(format!(
        "  {:<24} {:>7}",
        "TOTAL",
        format_percent(report.breakdown.total_pct)
    ));

    lines.push(String::new());
    lines.push("Heaviest tasks:".to_string());
    for (name, pct) in &report.breakdown.top {
        lines.push(format!(
            "  {:<24} {:>7}",
            pretty_task_name(name),
            format_percent(*pct)
        ));
    }
    lines.push(format!(
        "  {:<24} {:>7}",
        "Other",
        format_percent(report.breakdown.other_pct)
    ));

    lines
}

// ── Tests ──────────────────────────────────────────────────────────────────────
