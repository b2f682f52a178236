use serde::{Deserialize, Serialize};

/// One task's entry on one kernel log line: the raw fields as emitted over
/// the serial port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task name, e.g. `"altitude"` or `"uart_flight_data"`.
    pub name: String,
    /// Measured execution duration in microseconds.
    pub duration_us: u64,
    /// Configured scheduling period in microseconds.
    pub period_us: u64,
    /// Scheduling frequency in Hz.
    pub frequency_hz: u64,
}

impl TaskRecord {
    pub fn new(
        name: impl Into<String>,
        duration_us: u64,
        period_us: u64,
        frequency_hz: u64,
    ) -> Self {
        Self {
            name: name.into(),
            duration_us,
            period_us,
            frequency_hz,
        }
    }
}

/// A derived measurement appended to a task's series for each accepted
/// record.
///
/// Retains the raw fields alongside the two derived figures so that any
/// column can be extracted later without re-parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSample {
    /// Raw execution duration in microseconds.
    pub duration_us: u64,
    /// Raw configured period in microseconds.
    pub period_us: u64,
    /// Raw scheduling frequency in Hz.
    pub frequency_hz: u64,
    /// Fraction of the sampling window the task was executing, in percent:
    /// `duration_us * frequency_hz / 10_000`.
    pub utilization_pct: f64,
    /// Absolute deviation between the configured period and the ideal period
    /// implied by the frequency, in microseconds. Zero when the frequency is
    /// zero.
    pub time_error_us: f64,
    /// `time_error_us` expressed as a percentage of the configured period.
    /// Zero when the period is zero.
    pub time_error_pct: f64,
}

impl TaskSample {
    /// Derive a sample from a raw record.
    pub fn from_record(record: &TaskRecord) -> Self {
        let utilization_pct =
            record.duration_us as f64 * record.frequency_hz as f64 / 10_000.0;

        let time_error_us = if record.frequency_hz != 0 {
            (1_000_000.0 / record.frequency_hz as f64 - record.period_us as f64).abs()
        } else {
            0.0
        };

        let time_error_pct = if record.period_us != 0 {
            time_error_us / record.period_us as f64 * 100.0
        } else {
            0.0
        };

        Self {
            duration_us: record.duration_us,
            period_us: record.period_us,
            frequency_hz: record.frequency_hz,
            utilization_pct,
            time_error_us,
            time_error_pct,
        }
    }

    /// Read the numeric value of one column of this sample.
    pub fn column(&self, column: SampleColumn) -> f64 {
        match column {
            SampleColumn::Duration => self.duration_us as f64,
            SampleColumn::Period => self.period_us as f64,
            SampleColumn::Frequency => self.frequency_hz as f64,
            SampleColumn::Utilization => self.utilization_pct,
            SampleColumn::TimeError => self.time_error_pct,
        }
    }
}

impl From<&TaskRecord> for TaskSample {
    fn from(record: &TaskRecord) -> Self {
        Self::from_record(record)
    }
}

/// Selects one numeric field of a [`TaskSample`] for column extraction.
///
/// Utilization and time-error extraction are the same operation
/// parameterized by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleColumn {
    Duration,
    Period,
    Frequency,
    Utilization,
    TimeError,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── TaskSample derivation ─────────────────────────────────────────────────

    #[test]
    fn test_utilization_duration_500_frequency_20() {
        let sample = TaskSample::from_record(&TaskRecord::new("t", 500, 50_000, 20));
        // 500 * 20 / 10000 = 1.0 %
        assert!((sample.utilization_pct - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_error_zero_for_exact_period() {
        // frequency 100 Hz → ideal period 10_000 µs; configured 10_000 µs.
        let sample = TaskSample::from_record(&TaskRecord::new("t", 1, 10_000, 100));
        assert_eq!(sample.time_error_us, 0.0);
        assert_eq!(sample.time_error_pct, 0.0);
    }

    #[test]
    fn test_time_error_nonzero_period_mismatch() {
        // frequency 100 Hz → ideal 10_000 µs; configured 12_500 µs.
        let sample = TaskSample::from_record(&TaskRecord::new("t", 1, 12_500, 100));
        assert!((sample.time_error_us - 2_500.0).abs() < 1e-9);
        // 2500 / 12500 * 100 = 20 %
        assert!((sample.time_error_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_frequency_guards() {
        let sample = TaskSample::from_record(&TaskRecord::new("t", 500, 10_000, 0));
        assert_eq!(sample.utilization_pct, 0.0);
        assert_eq!(sample.time_error_us, 0.0);
        assert_eq!(sample.time_error_pct, 0.0);
    }

    #[test]
    fn test_zero_period_guards_percentage() {
        // frequency 100 Hz with a zero configured period: the absolute error
        // is the full ideal period, but the percentage must not divide by 0.
        let sample = TaskSample::from_record(&TaskRecord::new("t", 500, 0, 100));
        assert!((sample.time_error_us - 10_000.0).abs() < 1e-9);
        assert_eq!(sample.time_error_pct, 0.0);
    }

    #[test]
    fn test_sample_retains_raw_fields() {
        let sample = TaskSample::from_record(&TaskRecord::new("t", 120, 5_000, 200));
        assert_eq!(sample.duration_us, 120);
        assert_eq!(sample.period_us, 5_000);
        assert_eq!(sample.frequency_hz, 200);
    }

    // ── SampleColumn ──────────────────────────────────────────────────────────

    #[test]
    fn test_column_selects_each_field() {
        let sample = TaskSample::from_record(&TaskRecord::new("t", 100, 10_000, 100));
        assert_eq!(sample.column(SampleColumn::Duration), 100.0);
        assert_eq!(sample.column(SampleColumn::Period), 10_000.0);
        assert_eq!(sample.column(SampleColumn::Frequency), 100.0);
        assert!((sample.column(SampleColumn::Utilization) - 1.0).abs() < 1e-9);
        assert_eq!(sample.column(SampleColumn::TimeError), 0.0);
    }
}
