//! Captured log discovery and batch loading.
//!
//! Reads kernel log captures from a single file or from every `.log` / `.txt`
//! file under a directory, feeding each line to a [`TaskAggregator`].

use std::io::BufRead;
use std::path::{Path, PathBuf};

use taskmon_core::error::{Result, TaskmonError};
use tracing::{debug, warn};

use crate::aggregator::TaskAggregator;

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.log` and `.txt` files recursively under `path`, sorted by path.
pub fn find_log_files(path: &Path) -> Vec<PathBuf> {
    if !path.exists() {
        warn!("Log path does not exist: {}", path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "log" || ext == "txt")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Ingest a captured log into `aggregator`.
///
/// `path` may be a single file or a directory; a directory is scanned
/// recursively for `.log` / `.txt` files which are ingested in path order.
/// Unreadable lines within a file are skipped; a file that cannot be opened
/// is a fatal error.
pub fn load_capture(aggregator: &mut TaskAggregator, path: &Path) -> Result<()> {
    if path.is_dir() {
        let files = find_log_files(path);
        if files.is_empty() {
            return Err(TaskmonError::NoLogFiles(path.to_path_buf()));
        }
        for file in &files {
            ingest_file(aggregator, file)?;
        }
        Ok(())
    } else {
        ingest_file(aggregator, path)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Feed every line of one file to the aggregator.
fn ingest_file(aggregator: &mut TaskAggregator, path: &Path) -> Result<()> {
    let file = std::fs::File::open(path).map_err(|source| TaskmonError::LogRead {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = std::io::BufReader::new(file);
    let before = aggregator.lines_accepted();

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            // A capture interrupted mid-byte can leave invalid UTF-8 at the
            // tail; skip such lines like any other malformed data.
            Err(_) => continue,
        };
        aggregator.ingest_line(&line);
    }

    debug!(
        "Ingested {}: {} lines accepted",
        path.display(),
        aggregator.lines_accepted() - before
    );

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn aggregator() -> TaskAggregator {
        TaskAggregator::new("altitude", None)
    }

    // ── find_log_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_log_files_filters_extensions() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "a.log", &["x"]);
        write_log(dir.path(), "b.txt", &["x"]);
        write_log(dir.path(), "c.csv", &["x"]);

        let files = find_log_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_find_log_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("session-2");
        std::fs::create_dir_all(&sub).unwrap();
        write_log(dir.path(), "b.log", &["x"]);
        write_log(&sub, "a.log", &["x"]);

        let files = find_log_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1]);
    }

    #[test]
    fn test_find_log_files_nonexistent_path() {
        assert!(find_log_files(Path::new("/tmp/does-not-exist-taskmon-test")).is_empty());
    }

    // ── load_capture ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_capture_single_file() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "flight.log",
            &[
                "boot banner",
                "altitude,120,5000,200\tyaw,80,5000,200",
                "altitude,130,5000,200\tyaw,90,5000,200",
            ],
        );

        let mut agg = aggregator();
        load_capture(&mut agg, &path).unwrap();

        assert_eq!(agg.lines_read(), 3);
        assert_eq!(agg.lines_accepted(), 2);
        assert_eq!(agg.sample_count(), 2);
    }

    #[test]
    fn test_load_capture_directory_in_path_order() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "b.log", &["altitude,300,5000,200"]);
        write_log(dir.path(), "a.log", &["altitude,100,5000,200"]);

        let mut agg = aggregator();
        load_capture(&mut agg, dir.path()).unwrap();

        // a.log is ingested first.
        let series = &agg.series()["altitude"];
        assert_eq!(series[0].duration_us, 100);
        assert_eq!(series[1].duration_us, 300);
    }

    #[test]
    fn test_load_capture_empty_directory_errors() {
        let dir = TempDir::new().unwrap();
        let mut agg = aggregator();
        let err = load_capture(&mut agg, dir.path()).unwrap_err();
        assert!(matches!(err, TaskmonError::NoLogFiles(_)));
    }

    #[test]
    fn test_load_capture_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let mut agg = aggregator();
        let err = load_capture(&mut agg, &dir.path().join("missing.log")).unwrap_err();
        assert!(matches!(err, TaskmonError::LogRead { .. }));
    }

    #[test]
    fn test_load_capture_skips_malformed_lines_silently() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "flight.log",
            &["altitude,1,2", "altitude,120,5000,200"],
        );

        let mut agg = aggregator();
        load_capture(&mut agg, &path).unwrap();
        assert_eq!(agg.lines_accepted(), 1);
    }
}
