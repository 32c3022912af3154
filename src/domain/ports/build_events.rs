//! Build Event Port
//!
//! Provides an observable interface for archive builds.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;
use std::time::Duration;

/// Event emitted during a build
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// Build started
    Started { target: PathBuf },

    /// Main project files are being added
    MainPackage { name: String },

    /// `config/config.php` was passed through the cache-flag rewrite
    ConfigRewritten { path: String, changed: bool },

    /// Generated container files under `runtime/container` are being added
    RuntimeContainer,

    /// Composer autoload glue is being added
    ComposerBase,

    /// A dependency package is being added
    Dependency { name: String, path: String },

    /// The config factory was passed through the pathname rewrite
    ConfigFactoryRewritten { path: String, changed: bool },

    /// The bootstrap-wrapped entry point was added
    EntryPoint { path: String },

    /// The startup stub was set
    StubSet { entry_point: String },

    /// A single file was staged (detailed sinks only)
    FileAdded { local: String },

    /// An existing archive is about to be replaced
    Overwriting { target: PathBuf, size: u64 },

    /// A mount target was created beside the archive
    MountPrepared { path: PathBuf },

    /// The archive was published at its final path
    Published {
        target: PathBuf,
        size: u64,
        entries: usize,
        duration: Duration,
    },
}

/// Trait for receiving build events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress lines in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait BuildEventSink: Send + Sync {
    /// Handle a build event
    fn on_event(&self, event: BuildEvent);

    /// Check if this sink wants detailed events (per-file)
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
