//! Top-N utilization breakdown rendering.
//!
//! The terminal rendition of the original pie chart: the four heaviest tasks
//! get their own bar, everything else collapses into an "Other" segment, and
//! the segments always account for the full total.

use ratatui::text::{Line, Span};
use taskmon_core::formatting::{format_percent, pretty_task_name};
use taskmon_core::summary::UtilizationBreakdown;
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Display columns reserved for the task label.
const LABEL_WIDTH: usize = 22;
/// Display columns of the bar itself.
const BAR_WIDTH: usize = 30;

/// Pad `label` with trailing spaces to [`LABEL_WIDTH`] display columns,
/// truncating over-long names.
fn pad_label(label: &str) -> String {
    let width = UnicodeWidthStr::width(label);
    if width >= LABEL_WIDTH {
        let truncated: String = label.chars().take(LABEL_WIDTH - 1).collect();
        format!("{}…", truncated)
    } else {
        format!("{}{}", label, " ".repeat(LABEL_WIDTH - width))
    }
}

/// One bar line: `<label> [███░░░░] 12.3%`.
fn bar_line<'a>(
    label: String,
    pct: f64,
    total_pct: f64,
    style: ratatui::style::Style,
    theme: &'a Theme,
) -> Line<'a> {
    let share = if total_pct > 0.0 {
        (pct / total_pct).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (share * BAR_WIDTH as f64).round() as usize;
    let empty = BAR_WIDTH - filled;

    Line::from(vec![
        Span::styled(pad_label(&label), theme.label),
        Span::styled("[", theme.dim),
        Span::styled("█".repeat(filled), style),
        Span::styled("░".repeat(empty), theme.bar_empty),
        Span::styled("] ", theme.dim),
        Span::styled(format!("{:>6}", format_percent(pct)), theme.value),
    ])
}

/// Build the breakdown lines: one bar per ranked task, the "Other" bucket,
/// and a total row.
pub fn build_breakdown_lines<'a>(
    breakdown: &UtilizationBreakdown,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let mut lines = Vec::with_capacity(breakdown.top.len() + 2);

    for (i, (name, pct)) in breakdown.top.iter().enumerate() {
        lines.push(bar_line(
            pretty_task_name(name),
            *pct,
            breakdown.total_pct,
            theme.task_style(i),
            theme,
        ));
    }

    if !breakdown.top.is_empty() {
        lines.push(bar_line(
            "Other".to_string(),
            breakdown.other_pct,
            breakdown.total_pct,
            theme.breakdown_other,
            theme,
        ));
    }

    lines.push(Line::from(vec![
        Span::styled(pad_label("Total"), theme.label),
        Span::raw(" ".repeat(BAR_WIDTH + 3)),
        Span::styled(
            format!("{:>6}", format_percent(breakdown.total_pct)),
            theme.table_total,
        ),
    ]));

    lines
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use taskmon_core::summary::TaskAverages;

    fn averages(name: &str, util: f64) -> TaskAverages {
        TaskAverages {
            name: name.to_string(),
            avg_utilization_pct: util,
            avg_time_error_pct: 0.0,
            samples: 1,
        }
    }

    #[test]
    fn test_lines_for_five_tasks() {
        let avgs: Vec<TaskAverages> = [
            ("altitude", 5.0),
            ("yaw", 4.0),
            ("clock", 3.0),
            ("pwm", 2.0),
            ("input", 1.0),
        ]
        .iter()
        .map(|(n, u)| averages(n, *u))
        .collect();
        let breakdown = UtilizationBreakdown::top_n(&avgs, 4);

        let theme = Theme::dark();
        let lines = build_breakdown_lines(&breakdown, &theme);
        // 4 ranked + Other + Total.
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_lines_for_empty_breakdown() {
        let breakdown = UtilizationBreakdown::top_n(&[], 4);
        let theme = Theme::dark();
        let lines = build_breakdown_lines(&breakdown, &theme);
        // Only the total row.
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_pad_label_fixed_width() {
        assert_eq!(pad_label("Yaw").len(), LABEL_WIDTH);
        let long = pad_label("a_very_long_task_name_indeed");
        assert_eq!(UnicodeWidthStr::width(long.as_str()), LABEL_WIDTH);
    }
}
