//! Live dashboard for the taskmon TUI.
//!
//! Renders the streaming view: a time-series chart of total CPU utilization
//! over the sample window, per-task bars for the most recent sample, and an
//! ingest status line.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use taskmon_core::formatting::{format_count, format_percent, pretty_task_name};
use taskmon_core::summary::{UtilizationBreakdown, BREAKDOWN_TOP_N};
use taskmon_runtime::orchestrator::MonitorSnapshot;
use unicode_width::UnicodeWidthStr;

use crate::breakdown::build_breakdown_lines;
use crate::themes::Theme;

/// All data required to render the live view.
pub struct LiveViewData {
    /// Display label of the input source (device or file path).
    pub source: String,
    /// Configured window length, used for the chart's x bounds.
    pub window_capacity: usize,
    /// The most recent snapshot from the orchestrator.
    pub snapshot: MonitorSnapshot,
}

/// Round `max` up to the next multiple of ten so the chart's y axis lands on
/// a clean gridline, with a floor of 10 %.
fn y_axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    ((max / 10.0).ceil() * 10.0).max(10.0)
}

/// Render the live dashboard into `area`.
pub fn render_live_view(frame: &mut Frame, area: Rect, data: &LiveViewData, theme: &Theme) {
    let breakdown = UtilizationBreakdown::top_n(&data.snapshot.averages, BREAKDOWN_TOP_N);
    let breakdown_lines = build_breakdown_lines(&breakdown, theme);

    let task_rows = data.snapshot.latest.len() as u16;
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(task_rows + 2),
        Constraint::Length(breakdown_lines.len() as u16 + 2),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, chunks[0], data, theme);
    render_utilization_chart(frame, chunks[1], data, theme);
    render_task_bars(frame, chunks[2], &data.snapshot, theme);
    frame.render_widget(
        Paragraph::new(Text::from(breakdown_lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Heaviest Tasks (running average) "),
        ),
        chunks[3],
    );
    render_status(frame, chunks[4], &data.snapshot, theme);
}

/// Render a placeholder until the first snapshot arrives.
pub fn render_waiting(frame: &mut Frame, area: Rect, source: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Waiting for kernel data…", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(format!("Source: {}", source), theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" taskmon "),
        ),
        area,
    );
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, data: &LiveViewData, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(" TASKMON / KERNEL TASK UTILIZATION ", theme.header)),
        Line::from(Span::styled("=".repeat(area.width as usize), theme.separator)),
        Line::from(vec![
            Span::styled("[ ", theme.label),
            Span::styled(data.source.clone(), theme.value),
            Span::styled(" ]", theme.label),
        ]),
    ];
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_utilization_chart(frame: &mut Frame, area: Rect, data: &LiveViewData, theme: &Theme) {
    let points: Vec<(f64, f64)> = data
        .snapshot
        .window
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    let x_max = data.window_capacity.max(1) as f64;
    let y_max = y_axis_max(&data.snapshot.window);

    let datasets = vec![Dataset::default()
        .name("Total")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_total)
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" CPU Utilization (%) "),
        )
        .x_axis(
            Axis::default()
                .title("Sample")
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{}", data.window_capacity)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", y_max / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_task_bars(frame: &mut Frame, area: Rect, snapshot: &MonitorSnapshot, theme: &Theme) {
    const LABEL_WIDTH: usize = 22;
    const BAR_WIDTH: usize = 40;

    let mut lines: Vec<Line> = Vec::with_capacity(snapshot.latest.len());

    for (name, sample) in &snapshot.latest {
        let label = pretty_task_name(name);
        let width = UnicodeWidthStr::width(label.as_str());
        let padding = LABEL_WIDTH.saturating_sub(width).max(1);

        let pct = sample.utilization_pct;
        let filled = ((pct / 100.0).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let empty = BAR_WIDTH - filled;

        lines.push(Line::from(vec![
            Span::styled(format!("{}{}", label, " ".repeat(padding)), theme.label),
            Span::styled("[", theme.dim),
            Span::styled("█".repeat(filled), theme.bar_style(pct)),
            Span::styled("░".repeat(empty), theme.bar_empty),
            Span::styled("] ", theme.dim),
            Span::styled(format!("{:>6}", format_percent(pct)), theme.value),
            Span::styled(
                format!("  err {}", format_percent(sample.time_error_pct)),
                theme.dim,
            ),
        ]));
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Latest Sample "),
        ),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, snapshot: &MonitorSnapshot, theme: &Theme) {
    let mut spans = vec![
        Span::styled(
            format!(
                "{} / {} lines accepted",
                format_count(snapshot.lines_accepted),
                format_count(snapshot.lines_read)
            ),
            theme.dim,
        ),
        Span::styled(
            format!(" • {} records", format_count(snapshot.records_ingested)),
            theme.dim,
        ),
    ];
    if snapshot.finished {
        spans.push(Span::styled(" • input finished", theme.warning));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use taskmon_core::models::{TaskRecord, TaskSample};
    use taskmon_core::summary::TaskAverages;

    fn sample(duration: u64) -> TaskSample {
        TaskSample::from_record(&TaskRecord::new("t", duration, 10_000, 100))
    }

    fn make_snapshot(finished: bool) -> MonitorSnapshot {
        MonitorSnapshot {
            window: vec![1.0, 2.0, 3.5],
            latest: vec![
                ("altitude".to_string(), sample(120)),
                ("yaw".to_string(), sample(80)),
            ],
            averages: vec![
                TaskAverages {
                    name: "altitude".to_string(),
                    avg_utilization_pct: 1.2,
                    avg_time_error_pct: 0.0,
                    samples: 3,
                },
                TaskAverages {
                    name: "yaw".to_string(),
                    avg_utilization_pct: 0.8,
                    avg_time_error_pct: 0.0,
                    samples: 3,
                },
            ],
            lines_read: 5,
            lines_accepted: 3,
            records_ingested: 6,
            finished,
            report: None,
        }
    }

    #[test]
    fn test_y_axis_max_rounds_up() {
        assert_eq!(y_axis_max(&[3.0, 14.2]), 20.0);
        assert_eq!(y_axis_max(&[]), 10.0);
        assert_eq!(y_axis_max(&[0.5]), 10.0);
        assert_eq!(y_axis_max(&[30.0]), 30.0);
    }

    #[test]
    fn test_render_live_view_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let data = LiveViewData {
            source: "/dev/ttyUSB0".to_string(),
            window_capacity: 100,
            snapshot: make_snapshot(false),
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_live_view(frame, area, &data, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_live_view_finished_does_not_panic() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let data = LiveViewData {
            source: "flight.log".to_string(),
            window_capacity: 10,
            snapshot: make_snapshot(true),
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_live_view(frame, area, &data, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_waiting_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_waiting(frame, area, "/dev/ttyUSB0", &theme);
            })
            .unwrap();
    }
}
