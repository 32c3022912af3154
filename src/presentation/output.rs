//! Output Rendering
//!
//! Renders command results, config warnings and errors as text or JSON.

use std::io::{self, Write};

use crate::application::InspectResult;
use crate::config::ConfigWarning;
use crate::error::PharpackError;
use crate::infrastructure::events::format_size;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// NDJSON for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Render an inspected archive
pub fn render_inspect(
    out: &mut dyn Write,
    result: &InspectResult,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "Archive: {}", result.archive.display())?;
            writeln!(
                out,
                "  {} entries, {} ({} signature)",
                result.entries.len(),
                format_size(result.size),
                result.signature
            )?;
            match &result.entry_point {
                Some(entry) => writeln!(out, "  Entry point: {}", entry)?,
                None => writeln!(out, "  Entry point: (custom stub)")?,
            }
            writeln!(out)?;
            for entry in &result.entries {
                writeln!(out, "  {:>10}  {}", entry.size, entry.name)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "event": "inspect",
                "archive": result.archive.display().to_string(),
                "size": result.size,
                "signature": result.signature.to_string(),
                "entry_point": result.entry_point,
                "entries": result.entries.iter().map(|e| serde_json::json!({
                    "name": e.name,
                    "size": e.size,
                    "crc32": format!("{:08x}", e.crc32),
                })).collect::<Vec<_>>(),
            });
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

/// Render non-fatal config warnings
pub fn render_warnings(
    out: &mut dyn Write,
    warnings: &[ConfigWarning],
    format: OutputFormat,
) -> io::Result<()> {
    for warning in warnings {
        match format {
            OutputFormat::Text => writeln!(out, "[WARN] {}", warning)?,
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "event": "warning",
                    "kind": "config",
                    "key": warning.key,
                    "file": warning.file.display().to_string(),
                    "line": warning.line,
                    "suggestion": warning.suggestion,
                    "message": warning.to_string(),
                });
                writeln!(out, "{}", json)?;
            }
        }
    }
    Ok(())
}

/// Render a failed command as a single error block
pub fn render_error(out: &mut dyn Write, err: &anyhow::Error, format: OutputFormat) -> io::Result<()> {
    let pharpack = err.downcast_ref::<PharpackError>();
    match format {
        OutputFormat::Text => {
            writeln!(out, "[ERROR] {}", err)?;
            // PublishFailed already embeds its io cause in the message.
            if !matches!(pharpack, Some(PharpackError::PublishFailed { .. })) {
                for cause in err.chain().skip(1) {
                    writeln!(out, "  caused by: {}", cause)?;
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "event": "error",
                "message": err.to_string(),
                "path": pharpack
                    .and_then(PharpackError::path)
                    .map(|p| p.display().to_string()),
            });
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

/// Print a failed command to the right stream: JSON goes to stdout with the
/// event stream, text to stderr
pub fn print_error(err: &anyhow::Error, json: bool) {
    let format = OutputFormat::from_json_flag(json);
    let _ = if json {
        render_error(&mut io::stdout().lock(), err, format)
    } else {
        render_error(&mut io::stderr().lock(), err, format)
    };
}
