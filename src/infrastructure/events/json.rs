//! JSON Event Sink
//!
//! Outputs build events as NDJSON for CI/automation consumption.

use crate::domain::ports::{BuildEvent, BuildEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        let json = match event {
            BuildEvent::Started { target } => serde_json::json!({
                "event": "start",
                "command": "build",
                "target": target.display().to_string(),
            }),

            BuildEvent::MainPackage { name } => serde_json::json!({
                "event": "main_package",
                "command": "build",
                "name": name,
            }),

            BuildEvent::ConfigRewritten { path, changed } => serde_json::json!({
                "event": "rewrite",
                "command": "build",
                "rule": "enable-scan-cacheable",
                "path": path,
                "changed": changed,
            }),

            BuildEvent::RuntimeContainer => serde_json::json!({
                "event": "runtime_container",
                "command": "build",
            }),

            BuildEvent::ComposerBase => serde_json::json!({
                "event": "composer_base",
                "command": "build",
            }),

            BuildEvent::Dependency { name, path } => serde_json::json!({
                "event": "dependency",
                "command": "build",
                "name": name,
                "path": path,
            }),

            BuildEvent::ConfigFactoryRewritten { path, changed } => serde_json::json!({
                "event": "rewrite",
                "command": "build",
                "rule": "config-factory-pathname",
                "path": path,
                "changed": changed,
            }),

            BuildEvent::EntryPoint { path } => serde_json::json!({
                "event": "entry_point",
                "command": "build",
                "path": path,
            }),

            BuildEvent::StubSet { entry_point } => serde_json::json!({
                "event": "stub",
                "command": "build",
                "entry_point": entry_point,
            }),

            BuildEvent::FileAdded { local } => serde_json::json!({
                "event": "item_added",
                "command": "build",
                "path": local,
            }),

            BuildEvent::Overwriting { target, size } => serde_json::json!({
                "event": "overwriting",
                "command": "build",
                "target": target.display().to_string(),
                "size": size,
            }),

            BuildEvent::MountPrepared { path } => serde_json::json!({
                "event": "mount_prepared",
                "command": "build",
                "path": path.display().to_string(),
            }),

            BuildEvent::Published {
                target,
                size,
                entries,
                duration,
            } => serde_json::json!({
                "event": "complete",
                "command": "build",
                "status": "success",
                "target": target.display().to_string(),
                "size": size,
                "entries": entries,
                "duration_ms": duration.as_millis() as u64,
            }),
        };

        self.write_event(json);
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
