//! Runtime orchestration layer for taskmon.
//!
//! Provides the async line sources and the live monitoring loop that feeds
//! snapshots to the UI through an mpsc channel.

pub mod orchestrator;
pub mod source;

pub use taskmon_core as core;
pub use taskmon_data as data;
