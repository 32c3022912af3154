//! Mount Link Value Object
//!
//! A path, relative to the directory holding the archive, that must stay
//! writable at runtime. The bootstrap preamble mounts each link into the
//! archive's virtual filesystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Mount links used when nothing is configured
pub const DEFAULT_MOUNT_LINKS: &[&str] = &[".env", "runtime/hyperf.pid"];

/// Rejected mount link literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mount link '{link}': {reason}")]
pub struct InvalidMountLink {
    pub link: String,
    pub reason: &'static str,
}

/// A writable path mounted into the archive at startup
///
/// A literal ending in `/` denotes a directory, anything else a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MountLink(String);

impl MountLink {
    /// Validate and wrap a mount link literal
    pub fn new(link: impl Into<String>) -> Result<Self, InvalidMountLink> {
        let link = link.into();
        let invalid = |reason| InvalidMountLink {
            link: link.clone(),
            reason,
        };

        if link.trim().is_empty() {
            return Err(invalid("must not be empty"));
        }
        if link.contains('\0') {
            return Err(invalid("must not contain NUL bytes"));
        }

        let path = Path::new(&link);
        if path.is_absolute() || link.starts_with('/') {
            return Err(invalid("must be relative to the archive directory"));
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(invalid("must not leave the archive directory"));
        }

        Ok(Self(link))
    }

    /// Built-in mount links: the environment file and the pid file
    pub fn defaults() -> Vec<Self> {
        DEFAULT_MOUNT_LINKS
            .iter()
            .map(|l| Self((*l).to_string()))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the link denotes a directory
    pub fn is_dir(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Real path of the link beside an archive living in `base`
    pub fn resolve(&self, base: &Path) -> PathBuf {
        base.join(self.0.trim_end_matches('/'))
    }

    /// Create the link target beside the archive if it is missing.
    ///
    /// Mirrors what the bootstrap preamble does on first run: directories are
    /// created recursively, files are created empty along with their parent.
    /// Existing files are left untouched.
    pub fn materialize(&self, base: &Path) -> io::Result<PathBuf> {
        let target = self.resolve(base);
        if target.exists() {
            return Ok(target);
        }

        if self.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, b"")?;
        }
        Ok(target)
    }
}

impl TryFrom<String> for MountLink {
    type Error = InvalidMountLink;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MountLink> for String {
    fn from(link: MountLink) -> Self {
        link.0
    }
}

impl fmt::Display for MountLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
