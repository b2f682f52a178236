//! Batch chart view for analyzed captures.
//!
//! Renders the full [`UtilizationReport`]: a utilization chart carrying the
//! total plus every per-task series, a total time-error chart, the per-task
//! averages table and the top-4 + "Other" breakdown.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};
use taskmon_core::formatting::{format_count, format_percent, pretty_task_name};
use taskmon_data::analysis::UtilizationReport;

use crate::breakdown::build_breakdown_lines;
use crate::themes::Theme;

/// Round the axis ceiling up to the next multiple of ten (floor 10 %).
fn y_axis_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    ((max / 10.0).ceil() * 10.0).max(10.0)
}

/// Render the complete report into `area`.
pub fn render_report(frame: &mut Frame, area: Rect, report: &UtilizationReport, theme: &Theme) {
    let table_rows = report.averages.len() as u16 + 3;
    let breakdown_rows = report.breakdown.top.len() as u16 + 4;

    let chunks = Layout::vertical([
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(table_rows),
        Constraint::Length(breakdown_rows),
    ])
    .split(area);

    render_utilization_chart(frame, chunks[0], report, theme);
    render_time_error_chart(frame, chunks[1], report, theme);
    render_averages_table(frame, chunks[2], report, theme);
    render_breakdown(frame, chunks[3], report, theme);
}

/// Render a "no data" placeholder when the capture held no parseable lines.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No task data found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check that the capture contains kernel task lines and that the marker matches.",
            theme.dim,
        )),
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

fn to_points(series: &[f64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

fn render_utilization_chart(
    frame: &mut Frame,
    area: Rect,
    report: &UtilizationReport,
    theme: &Theme,
) {
    let total_points = to_points(&report.total_utilization);
    let task_points: Vec<(String, Vec<(f64, f64)>)> = report
        .per_task_utilization
        .iter()
        .map(|(name, series)| (pretty_task_name(name), to_points(series)))
        .collect();

    let mut datasets = vec![Dataset::default()
        .name("Total")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_total)
        .data(&total_points)];

    for (i, (name, points)) in task_points.iter().enumerate() {
        datasets.push(
            Dataset::default()
                .name(name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.task_style(i))
                .data(points),
        );
    }

    let x_max = report.sample_count.max(1) as f64;
    let y_max = y_axis_max(&report.total_utilization);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Kernel Task Time / CPU Utilization (%) "),
        )
        .x_axis(
            Axis::default()
                .title("Sample")
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{}", report.sample_count)),
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

fn render_time_error_chart(
    frame: &mut Frame,
    area: Rect,
    report: &UtilizationReport,
    theme: &Theme,
) {
    let points = to_points(&report.total_time_error);
    let x_max = report.sample_count.max(1) as f64;
    let y_max = y_axis_max(&report.total_time_error);

    let datasets = vec![Dataset::default()
        .name("Total")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.warning)
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Timing Error (% of period) "),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{}", report.sample_count)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
        );

    frame.render_widget(chart, area);
}

fn render_averages_table(
    frame: &mut Frame,
    area: Rect,
    report: &UtilizationReport,
    theme: &Theme,
) {
    let header_cells = ["Task", "Avg Utilization", "Avg Time Error", "Samples"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = report
        .averages
        .iter()
        .enumerate()
        .map(|(i, avg)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(pretty_task_name(&avg.name)),
                Cell::from(format_percent(avg.avg_utilization_pct)),
                Cell::from(format_percent(avg.avg_time_error_pct)),
                Cell::from(format_count(avg.samples as u64)),
            ])
            .style(style)
        })
        .collect();

    let total_row = Row::new(vec![
        Cell::from("TOTAL"),
        Cell::from(format_percent(report.breakdown.total_pct)),
        Cell::from(""),
        Cell::from(format_count(report.metadata.records_ingested)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(24),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Average Utilization "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

fn render_breakdown(frame: &mut Frame, area: Rect, report: &UtilizationReport, theme: &Theme) {
    let lines = build_breakdown_lines(&report.breakdown, theme);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Heaviest Tasks "),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
