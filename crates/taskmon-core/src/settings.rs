use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// CPU utilization monitor for kernel task logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskmon",
    about = "CPU utilization monitor for kernel task logs",
    version
)]
pub struct Settings {
    /// Captured log file, or a directory of captured logs, to analyze
    #[arg(long, value_name = "PATH", required_unless_present = "port", conflicts_with = "port")]
    pub file: Option<PathBuf>,

    /// Serial device carrying live kernel output (e.g. /dev/ttyUSB0)
    #[arg(long, value_name = "DEVICE", required_unless_present = "file")]
    pub port: Option<PathBuf>,

    /// View mode (defaults to "live" with --port, "chart" with --file)
    #[arg(long, value_parser = ["live", "chart", "summary"])]
    pub view: Option<String>,

    /// Substring identifying a parseable data line
    #[arg(long, default_value = "altitude")]
    pub marker: String,

    /// Task name excluded from aggregation
    #[arg(long, default_value = "uart_kernel_data")]
    pub ignore_task: String,

    /// Aggregate every task, including the one named by --ignore-task
    #[arg(long)]
    pub no_ignore: bool,

    /// Live chart window length in samples
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u16).range(10..=10_000))]
    pub window: u16,

    /// Live poll interval in seconds (1-60)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub refresh_rate: u32,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── Resolved views of the settings ─────────────────────────────────────────────

/// Which presentation the binary should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Live TUI dashboard fed by the monitoring orchestrator.
    Live,
    /// Batch TUI chart view over a fully ingested log.
    Chart,
    /// Plain console summary, no TUI.
    Summary,
}

/// The selected input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    /// A captured log file or a directory of captured logs.
    File(PathBuf),
    /// A serial character device read as a line stream.
    Port(PathBuf),
}

impl Settings {
    /// The input source. Clap guarantees exactly one of `--file` / `--port`
    /// is present.
    pub fn input(&self) -> InputSelection {
        match (&self.file, &self.port) {
            (Some(path), _) => InputSelection::File(path.clone()),
            (_, Some(device)) => InputSelection::Port(device.clone()),
            (None, None) => unreachable!("clap enforces --file or --port"),
        }
    }

    /// The effective view: an explicit `--view` wins, otherwise live for a
    /// serial port and chart for a file.
    pub fn view_kind(&self) -> ViewKind {
        match self.view.as_deref() {
            Some("live") => ViewKind::Live,
            Some("chart") => ViewKind::Chart,
            Some("summary") => ViewKind::Summary,
            _ => match self.input() {
                InputSelection::Port(_) => ViewKind::Live,
                InputSelection::File(_) => ViewKind::Chart,
            },
        }
    }

    /// The task name to skip during aggregation, unless `--no-ignore` was
    /// given.
    pub fn ignored_task(&self) -> Option<&str> {
        if self.no_ignore {
            None
        } else {
            Some(self.ignore_task.as_str())
        }
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted display parameters saved to `~/.taskmon/last_used.json`.
///
/// Only presentation knobs are remembered; the input source and parsing
/// options always come from the command line.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<u16>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".taskmon").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            refresh_rate: Some(s.refresh_rate),
            window: Some(s.window),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // Merge last-used values for fields that were NOT explicitly set on
        // the command line (CLI always wins).
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "refresh_rate") {
            if let Some(v) = last.refresh_rate {
                settings.refresh_rate = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "window") {
            if let Some(v) = last.window {
                settings.window = v;
            }
        }

        settings = Self::apply_debug_flag(settings);

        // Persist current settings for next run.
        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
