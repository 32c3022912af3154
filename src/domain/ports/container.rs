//! Staged container port
//!
//! The archive is assembled in a write-only container that is fully buffered
//! until `commit`. Entries are addressed by their path inside the archive.
//! Implementations live in the infrastructure layer.

use std::fs::File;
use std::path::Path;

use crate::error::PharpackResult;

/// A write-only archive that becomes a complete file on `commit`
pub trait StagedContainer {
    /// Stage a file from disk under `local`; its content is read at commit
    fn add_file(&mut self, local: &str, source: &Path) -> PharpackResult<()>;

    /// Stage in-memory content under `local`
    fn add_from_string(&mut self, local: &str, contents: Vec<u8>) -> PharpackResult<()>;

    /// Replace the startup stub
    fn set_stub(&mut self, stub: String);

    /// The platform default stub, running `entry_point` from inside the archive
    fn default_stub(&self, entry_point: &str) -> String;

    /// Number of staged entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the complete archive and return its size in bytes.
    ///
    /// Consumes the container: nothing can be added after a commit.
    fn commit(self) -> PharpackResult<u64>;
}

/// Opens staged containers over a freshly created staging file
pub trait ContainerFactory {
    type Container: StagedContainer;

    /// Whether the environment allows writing archives at all
    fn is_writable(&self) -> bool;

    /// Start a container that writes into `staging` on commit
    fn open(&self, staging: File) -> Self::Container;
}
