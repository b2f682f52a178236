//! Kernel log line parsing.
//!
//! The kernel periodically writes one line listing every scheduled task as a
//! whitespace-separated sequence of `name,duration,period,frequency` tokens.
//! Only lines containing the marker substring qualify; anything else on the
//! wire (boot banners, flight telemetry, partial lines from a reset) is
//! silently dropped.

use taskmon_core::models::TaskRecord;

/// Parse one log line into task records.
///
/// Returns an empty vector when the line is rejected:
/// * the marker substring is absent, or
/// * any data token does not split into exactly 4 comma-separated fields, or
/// * any numeric field fails to parse as an unsigned integer.
///
/// A token exactly equal to the marker is the line-level tag and carries no
/// fields; it is skipped rather than counted against the field check.
/// Rejection is all-or-nothing: a single malformed token discards the whole
/// line, never a partial ingestion.
pub fn parse_line(line: &str, marker: &str) -> Vec<TaskRecord> {
    if !line.contains(marker) {
        return Vec::new();
    }

    let mut records = Vec::new();

    for token in line.split_whitespace() {
        if token == marker {
            continue;
        }

        let fields: Vec<&str> = token.split(',').collect();
        if fields.len() != 4 {
            return Vec::new();
        }

        let (Ok(duration_us), Ok(period_us), Ok(frequency_hz)) = (
            fields[1].parse::<u64>(),
            fields[2].parse::<u64>(),
            fields[3].parse::<u64>(),
        ) else {
            return Vec::new();
        };

        records.push(TaskRecord::new(fields[0], duration_us, period_us, frequency_hz));
    }

    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "altitude";

    #[test]
    fn test_valid_line_one_record_per_data_token() {
        let line = "altitude,120,5000,200\tyaw,80,5000,200\tuart_flight_data,300,100000,10";
        let records = parse_line(line, MARKER);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], TaskRecord::new("altitude", 120, 5_000, 200));
        assert_eq!(records[1], TaskRecord::new("yaw", 80, 5_000, 200));
        assert_eq!(records[2].name, "uart_flight_data");
    }

    #[test]
    fn test_line_without_marker_rejected() {
        let records = parse_line("yaw,80,5000,200\tmain_rotor,40,2500,400", MARKER);
        assert!(records.is_empty());
    }

    #[test]
    fn test_standalone_marker_token_is_skipped() {
        let line = "altitude taskA,100,1000,50\ttaskB,200,2000,25";
        let records = parse_line(line, MARKER);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "taskA");
        assert_eq!(records[1].name, "taskB");
    }

    #[test]
    fn test_wrong_field_count_rejects_whole_line() {
        // Second token has 3 fields; the valid first token must not survive.
        let line = "altitude,120,5000,200\tyaw,80,5000";
        assert!(parse_line(line, MARKER).is_empty());
    }

    #[test]
    fn test_extra_field_rejects_whole_line() {
        let line = "altitude,120,5000,200,7";
        assert!(parse_line(line, MARKER).is_empty());
    }

    #[test]
    fn test_non_numeric_field_rejects_whole_line() {
        let line = "altitude,120,5000,200\tyaw,eighty,5000,200";
        assert!(parse_line(line, MARKER).is_empty());
    }

    #[test]
    fn test_marker_only_line_yields_no_records() {
        assert!(parse_line("altitude", MARKER).is_empty());
        assert!(parse_line("", MARKER).is_empty());
    }

    #[test]
    fn test_marker_inside_token_gates_line() {
        // The marker normally appears as the altitude task's own record.
        let line = "altitude,120,5000,200";
        let records = parse_line(line, MARKER);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "altitude");
    }

    #[test]
    fn test_custom_marker() {
        let line = "telemetry enc,10,1000,1000";
        assert_eq!(parse_line(line, "telemetry").len(), 1);
        assert!(parse_line(line, MARKER).is_empty());
    }

    #[test]
    fn test_whitespace_mix_tabs_and_spaces() {
        let line = "  altitude,120,5000,200   yaw,80,5000,200\t clock,5,1000,1000 ";
        assert_eq!(parse_line(line, MARKER).len(), 3);
    }
}
