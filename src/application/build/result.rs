//! Build Result

use std::path::PathBuf;
use std::time::Duration;

/// Result of a successful build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    /// Published archive
    pub target: PathBuf,
    /// Archive size in bytes
    pub size: u64,
    /// Number of entries in the archive
    pub entries: usize,
    /// Number of dependency packages bundled
    pub dependencies: usize,
    /// Entry point inside the archive
    pub entry_point: String,
    /// Mount targets created beside the archive (`--prepare-mounts`)
    pub prepared_mounts: Vec<PathBuf>,
    pub duration: Duration,
}
