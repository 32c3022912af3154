//! Build Options
//!
//! Assembled once before the build and never mutated by it.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::MountLink;

/// Entry point used when neither the CLI nor the manifest names one
pub const DEFAULT_BIN: &str = "bin/hyperf.php";

/// Options for the build use case
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project manifest (`composer.json`); its directory is the project root
    pub manifest_path: PathBuf,
    /// Output archive override; relative paths resolve against the project root
    pub target: Option<PathBuf>,
    /// Version appended to the derived archive name
    pub version: Option<String>,
    /// Entry point override, relative to the project root
    pub main: Option<String>,
    /// Entry point when the manifest declares no `bin`
    pub default_bin: String,
    /// Paths mounted writable beside the archive at runtime
    pub mount_links: Vec<MountLink>,
    /// Create the mount targets next to the published archive
    pub prepare_mounts: bool,
}

impl BuildOptions {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            target: None,
            version: None,
            main: None,
            default_bin: DEFAULT_BIN.to_string(),
            mount_links: MountLink::defaults(),
            prepare_mounts: false,
        }
    }

    /// Directory holding the manifest
    pub fn project_root(&self) -> &Path {
        self.manifest_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    pub fn with_default_bin(mut self, bin: impl Into<String>) -> Self {
        self.default_bin = bin.into();
        self
    }

    pub fn with_mount_links(mut self, links: Vec<MountLink>) -> Self {
        self.mount_links = links;
        self
    }

    pub fn with_prepare_mounts(mut self, prepare: bool) -> Self {
        self.prepare_mounts = prepare;
        self
    }
}
