//! Async line-oriented input sources.
//!
//! A [`LineSource`] wraps anything openable as a file: a captured log or a
//! serial character device such as `/dev/ttyUSB0`. The device's line
//! discipline and baud rate must be configured externally (e.g. via `stty`);
//! taskmon only consumes the resulting line stream.

use std::path::{Path, PathBuf};

use taskmon_core::error::{Result, TaskmonError};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// A line stream over an open file or serial device.
#[derive(Debug)]
pub struct LineSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl LineSource {
    /// Open `path` for line-oriented reading.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .await
            .map_err(|_| TaskmonError::SourceUnavailable(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
        })
    }

    /// The path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next line.
    ///
    /// Resolves to `Ok(None)` at end of input. A serial device produces no
    /// end of input while the port stays open; the future simply stays
    /// pending until the kernel writes another line.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
