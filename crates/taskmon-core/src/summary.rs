//! Per-task summary statistics and the top-N utilization breakdown.

use crate::models::TaskSample;

// ── TaskAverages ──────────────────────────────────────────────────────────────

/// Mean utilization and time error for one task's series.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAverages {
    pub name: String,
    /// Mean of the task's utilization samples, in percent.
    pub avg_utilization_pct: f64,
    /// Mean of the task's time-error samples, in percent of the period.
    pub avg_time_error_pct: f64,
    /// Number of samples the averages were computed over.
    pub samples: usize,
}

impl TaskAverages {
    /// Compute the averages for one task's series.
    ///
    /// An empty series yields zero averages (not NaN).
    pub fn from_series(name: impl Into<String>, series: &[TaskSample]) -> Self {
        let n = series.len();
        let (util_sum, err_sum) = series.iter().fold((0.0, 0.0), |(u, e), s| {
            (u + s.utilization_pct, e + s.time_error_pct)
        });

        let (avg_utilization_pct, avg_time_error_pct) = if n > 0 {
            (util_sum / n as f64, err_sum / n as f64)
        } else {
            (0.0, 0.0)
        };

        Self {
            name: name.into(),
            avg_utilization_pct,
            avg_time_error_pct,
            samples: n,
        }
    }
}

// ── UtilizationBreakdown ──────────────────────────────────────────────────────

/// Top-N ranking of tasks by average utilization with an "Other" bucket.
///
/// The bucket is defined as the total average utilization minus the sum of
/// the ranked entries, so the ranked values plus `other_pct` always sum
/// exactly to `total_pct`.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilizationBreakdown {
    /// `(task name, average utilization %)` sorted descending.
    pub top: Vec<(String, f64)>,
    /// Combined average utilization of every task not in `top`.
    pub other_pct: f64,
    /// Sum of all tasks' average utilization.
    pub total_pct: f64,
}

/// Number of tasks shown individually before the rest collapses into
/// "Other".
pub const BREAKDOWN_TOP_N: usize = 4;

impl UtilizationBreakdown {
    /// Rank `averages` by average utilization descending and keep the top
    /// `n`; everything below the cut contributes to the "Other" bucket.
    ///
    /// Ties are broken by task name so the ranking is deterministic.
    pub fn top_n(averages: &[TaskAverages], n: usize) -> Self {
        let total_pct: f64 = averages.iter().map(|a| a.avg_utilization_pct).sum();

        let mut ranked: Vec<&TaskAverages> = averages.iter().collect();
        ranked.sort_by(|a, b| {
            b.avg_utilization_pct
                .partial_cmp(&a.avg_utilization_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        let top: Vec<(String, f64)> = ranked
            .iter()
            .take(n)
            .map(|a| (a.name.clone(), a.avg_utilization_pct))
            .collect();

        let top_sum: f64 = top.iter().map(|(_, pct)| pct).sum();
        let other_pct = total_pct - top_sum;

        Self {
            top,
            other_pct,
            total_pct,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
