use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned as the safe
/// default.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by the taskmon
/// views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,
    pub error: Style,

    // ── Utilization bars ─────────────────────────────────────────────────────
    /// Filled portion when utilization is below 50 %.
    pub bar_low: Style,
    /// Filled portion between 50 % and 80 %.
    pub bar_medium: Style,
    /// Filled portion at or above 80 %.
    pub bar_high: Style,
    /// Unfilled (empty) portion of a bar.
    pub bar_empty: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// The total-utilization line.
    pub chart_total: Style,
    pub chart_axis: Style,
    /// Cycled through for per-task series.
    pub task_palette: [Style; 6],
    /// The "Other" bucket in the breakdown.
    pub breakdown_other: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_low: Style::default().fg(Color::Green),
            bar_medium: Style::default().fg(Color::Yellow),
            bar_high: Style::default().fg(Color::Red),
            bar_empty: Style::default().fg(Color::DarkGray),

            chart_total: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            chart_axis: Style::default().fg(Color::Gray),
            task_palette: [
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Yellow),
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Blue),
                Style::default().fg(Color::LightRed),
            ],
            breakdown_other: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Magenta),
            error: Style::default().fg(Color::Red),

            bar_low: Style::default().fg(Color::Green),
            bar_medium: Style::default().fg(Color::Magenta),
            bar_high: Style::default().fg(Color::Red),
            bar_empty: Style::default().fg(Color::Gray),

            chart_total: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            chart_axis: Style::default().fg(Color::DarkGray),
            task_palette: [
                Style::default().fg(Color::Blue),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Red),
                Style::default().fg(Color::DarkGray),
            ],
            breakdown_other: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Resolve a theme name from the CLI (`"dark"`, `"light"`, `"auto"`).
    ///
    /// `"auto"` (or anything unrecognised) falls back to background
    /// detection.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => match detect_background() {
                BackgroundType::Light => Self::light(),
                _ => Self::dark(),
            },
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    /// Bar fill style for a utilization percentage.
    pub fn bar_style(&self, pct: f64) -> Style {
        if pct >= 80.0 {
            self.bar_high
        } else if pct >= 50.0 {
            self.bar_medium
        } else {
            self.bar_low
        }
    }

    /// Series style for the task at `index`, cycling the palette.
    pub fn task_style(&self, index: usize) -> Style {
        self.task_palette[index % self.task_palette.len()]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_explicit() {
        let dark = Theme::from_name("dark");
        assert_eq!(dark.text.fg, Some(Color::White));

        let light = Theme::from_name("light");
        assert_eq!(light.text.fg, Some(Color::Black));
    }

    #[test]
    fn test_bar_style_thresholds() {
        let theme = Theme::dark();
        assert_eq!(theme.bar_style(10.0), theme.bar_low);
        assert_eq!(theme.bar_style(50.0), theme.bar_medium);
        assert_eq!(theme.bar_style(80.0), theme.bar_high);
        assert_eq!(theme.bar_style(120.0), theme.bar_high);
    }

    #[test]
    fn test_task_style_cycles() {
        let theme = Theme::dark();
        assert_eq!(theme.task_style(0), theme.task_style(6));
        assert_eq!(theme.task_style(2), theme.task_style(8));
    }
}
