//! Event Sink Implementations
//!
//! Provides concrete implementations of BuildEventSink:
//! - ConsoleEventSink: Human-readable progress lines
//! - JsonEventSink: NDJSON output for CI/automation

mod console;
mod json;

use std::time::Duration;

pub use console::ConsoleEventSink;
pub use json::JsonEventSink;

/// Archive size as KiB with one decimal, e.g. `12.5 KiB`
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

/// Elapsed time in seconds with one decimal, e.g. `0.4s`
pub fn format_duration(duration: Duration) -> String {
    format!("{:.1}s", duration.as_secs_f64())
}
