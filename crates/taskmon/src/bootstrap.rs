use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.taskmon/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.taskmon/`
/// - `~/.taskmon/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let taskmon_dir = home.join(".taskmon");
    std::fs::create_dir_all(&taskmon_dir)?;
    std::fs::create_dir_all(taskmon_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive,
/// falling back to `"info"` if the level string is not recognised.
///
/// Output goes to `log_file` when given, otherwise to stderr; stdout belongs
/// to the TUI.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    // Map CLI log-level names to tracing directives (lowercase).
    let directive = match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_ansi(log_file.is_none())
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        // Restore HOME.
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let taskmon_dir = tmp.path().join(".taskmon");
        assert!(taskmon_dir.is_dir(), ".taskmon dir must exist");
        assert!(taskmon_dir.join("logs").is_dir(), "logs subdir must exist");
    }
}
