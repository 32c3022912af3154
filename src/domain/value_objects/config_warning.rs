//! Configuration warning value object.

use std::fmt;
use std::path::PathBuf;

/// Non-fatal problem found while loading `pharpack.toml`
/// (for example an unknown key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The unknown key, dotted (`build.mount_link`)
    pub key: String,
    /// Config file the key was found in
    pub file: PathBuf,
    /// 1-indexed line, when it could be located
    pub line: Option<usize>,
    /// Closest known key
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}
