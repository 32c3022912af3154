//! Console Event Sink
//!
//! One progress line per build step; per-file lines only when verbose.

use std::io::{self, Write};
use std::sync::Mutex;

use super::{format_duration, format_size};
use crate::domain::ports::{BuildEvent, BuildEventSink};

const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Event sink printing human-readable progress
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    verbose: bool,
    color: bool,
}

impl ConsoleEventSink {
    /// Progress on stdout, colored when stdout is a terminal
    pub fn stdout(verbose: bool) -> Self {
        use is_terminal::IsTerminal;

        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            verbose,
            color: io::stdout().is_terminal(),
        }
    }

    /// Create a console sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            verbose,
            color: false,
        }
    }

    fn highlight(&self, text: &str) -> String {
        if self.color {
            format!("{}{}{}", GREEN, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        let line = match event {
            BuildEvent::Started { target } => {
                format!("Creating phar {}", self.highlight(&target.display().to_string()))
            }
            BuildEvent::MainPackage { name } => format!("Adding main package \"{}\"", name),
            BuildEvent::ConfigRewritten { path, changed: true } => {
                format!("Forcing scan_cacheable to true in \"{}\"", path)
            }
            BuildEvent::ConfigRewritten {
                path,
                changed: false,
            } => format!("Adding \"{}\" (scan_cacheable not set or already true)", path),
            BuildEvent::RuntimeContainer => "Adding runtime container files".to_string(),
            BuildEvent::ComposerBase => "Adding composer base files".to_string(),
            BuildEvent::Dependency { name, path } => {
                format!("Adding dependency \"{}\" from \"{}\"", name, path)
            }
            BuildEvent::ConfigFactoryRewritten { path, changed } => {
                if changed {
                    format!(
                        "Replaced \"getRealPath\" with \"getPathname\" in method \"readPaths\" of \"{}\"",
                        path
                    )
                } else {
                    format!("Adding \"{}\" (no \"getRealPath\" call in \"readPaths\")", path)
                }
            }
            BuildEvent::EntryPoint { path } => format!("Adding main file \"{}\"", path),
            BuildEvent::StubSet { entry_point } => {
                format!("Setting default stub {}.", self.highlight(&entry_point))
            }
            BuildEvent::FileAdded { local } => {
                if !self.verbose {
                    return;
                }
                format!("  + {}", local)
            }
            BuildEvent::Overwriting { target, size } => format!(
                "Overwriting existing file {} ({})",
                self.highlight(&target.display().to_string()),
                format_size(size)
            ),
            BuildEvent::MountPrepared { path } => format!("Prepared mount target {}", path.display()),
            BuildEvent::Published {
                target,
                size,
                duration,
                ..
            } => format!(
                "\n    {} - Creating {} ({}) completed after {}",
                self.highlight("OK"),
                self.highlight(&target.display().to_string()),
                format_size(size),
                format_duration(duration)
            ),
        };
        self.write_line(&line);
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
