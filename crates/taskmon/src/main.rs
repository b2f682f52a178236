mod bootstrap;
mod summary;

use anyhow::Result;
use taskmon_core::settings::{InputSelection, Settings, ViewKind};
use taskmon_data::analysis::analyze_capture;
use taskmon_runtime::orchestrator::MonitorOrchestrator;
use taskmon_runtime::source::LineSource;
use taskmon_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("taskmon v{} starting", env!("CARGO_PKG_VERSION"));

    let source_path = match settings.input() {
        InputSelection::File(path) | InputSelection::Port(path) => path,
    };
    let source_label = source_path.display().to_string();

    match settings.view_kind() {
        ViewKind::Live => {
            tracing::info!("Reading from {}...", source_label);

            let source = LineSource::open(&source_path).await?;
            let orchestrator = MonitorOrchestrator::new(
                u64::from(settings.refresh_rate),
                usize::from(settings.window),
                settings.marker.clone(),
                settings.ignored_task().map(str::to_string),
            );

            let (rx, handle) = orchestrator.start(source);

            let app = App::new(&settings.theme, source_label, usize::from(settings.window));

            // Run the TUI event loop. The loop exits on 'q' / Ctrl+C inside
            // the TUI. We also listen for Ctrl+C at the OS level so that
            // signals received while the terminal is in raw mode are handled
            // cleanly.
            tokio::select! {
                result = app.run_live(rx) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down ingest task");
                    handle.abort();
                }
            }
        }

        ViewKind::Chart => {
            tracing::info!("Analyzing capture {}...", source_label);

            let report =
                analyze_capture(&source_path, &settings.marker, settings.ignored_task())?;

            let app = App::new(&settings.theme, source_label, usize::from(settings.window));
            app.run_report(report).await?;
        }

        ViewKind::Summary => {
            let report =
                analyze_capture(&source_path, &settings.marker, settings.ignored_task())?;

            for line in summary::build_summary_lines(&report) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
