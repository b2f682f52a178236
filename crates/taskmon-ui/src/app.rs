//! Main application state and TUI event loop for taskmon.
//!
//! [`App`] owns the theme and the last received monitoring snapshot and
//! drives both the live and the batch chart event loops.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use taskmon_data::analysis::UtilizationReport;
use taskmon_runtime::orchestrator::MonitorSnapshot;
use tokio::sync::mpsc;

use crate::chart_view;
use crate::live_view::{self, LiveViewData};
use crate::themes::Theme;

/// Root application state for the taskmon TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Display label of the input source.
    pub source: String,
    /// Configured live window length.
    pub window_capacity: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Most recent monitoring snapshot, `None` until the first data arrives.
    pub last_snapshot: Option<MonitorSnapshot>,
}

impl App {
    /// Construct a new application with the given configuration.
    pub fn new(theme_name: &str, source: String, window_capacity: usize) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source,
            window_capacity,
            should_quit: false,
            last_snapshot: None,
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Run the live monitoring TUI, receiving data from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// that the terminal event loop stays on the current thread while data
    /// updates arrive on the async channel via `try_recv`.
    ///
    /// The loop exits on `q`, `Q`, or `Ctrl+C`.
    pub async fn run_live(mut self, mut rx: mpsc::Receiver<MonitorSnapshot>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render_live(frame))?;

            // Handle keyboard events with a short timeout so we don't block.
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break Ok(());
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') => break Ok(()),
                        _ => {}
                    }
                }
            }

            // Drain any pending snapshots (non-blocking). The loop keeps
            // running after the source finishes so the final state stays on
            // screen until the user quits.
            loop {
                match rx.try_recv() {
                    Ok(snapshot) => self.last_snapshot = Some(snapshot),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => break,
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Run the static batch chart view, then wait for `q` / `Ctrl+C`.
    pub async fn run_report(self, report: UtilizationReport) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                if report.sample_count == 0 {
                    chart_view::render_no_data(frame, area, &self.theme);
                } else {
                    chart_view::render_report(frame, area, &report, &self.theme);
                }
            })?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break;
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        _ => {}
                    }
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn render_live(&self, frame: &mut Frame) {
        let area = frame.area();
        match &self.last_snapshot {
            Some(snapshot) => {
                let data = LiveViewData {
                    source: self.source.clone(),
                    window_capacity: self.window_capacity,
                    snapshot: snapshot.clone(),
                };
                live_view::render_live_view(frame, area, &data, &self.theme);
            }
            None => live_view::render_waiting(frame, area, &self.source, &self.theme),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
