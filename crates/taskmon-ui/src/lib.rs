//! Terminal UI layer for taskmon.
//!
//! Provides themes, the live dashboard, the batch chart and summary views,
//! and the main application event loop built on top of [`ratatui`] for
//! rendering utilization dashboards in the terminal.

pub mod app;
pub mod breakdown;
pub mod chart_view;
pub mod live_view;
pub mod themes;

pub use taskmon_core as core;
