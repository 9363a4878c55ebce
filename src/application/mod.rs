//! Application Layer - Pipeline orchestration
//!
//! Wires ports and domain policy into the running monitor:
//! - `aggregator`: concurrent fan-out over token sources with baseline fallback
//! - `formatter`: Telegram alert rendering
//! - `monitor`: seeding, cycle execution and the interval scheduler
//! - `diagnostics`: connectivity checks behind `token-monitor check`

pub mod aggregator;
pub mod formatter;
pub mod monitor;
pub mod diagnostics;

pub use aggregator::SourceAggregator;
pub use formatter::{format_compact, format_startup_message, format_token_alert};
pub use monitor::{CycleOutcome, CycleReport, MonitorError, MonitorSettings, TokenMonitor};
pub use diagnostics::{run_diagnostics, CheckStatus, DiagnosticItem, DiagnosticReport};
