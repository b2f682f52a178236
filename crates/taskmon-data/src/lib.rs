//! Data ingestion layer for taskmon.
//!
//! Responsible for parsing kernel log lines into task records, accumulating
//! per-task sample series, extracting chart columns and running the batch
//! analysis pipeline over captured log files.

pub mod aggregator;
pub mod analysis;
pub mod parser;
pub mod reader;

pub use taskmon_core as core;
