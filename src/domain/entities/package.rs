//! Package entity - one Composer package taking part in a build
//!
//! The main project and every installed dependency are described by the same
//! type. A descriptor is built once from a decoded manifest plus the directory
//! the package lives in, and never changes afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::bundle::{Bundle, FileTree};

/// Vendor directory used when the manifest does not override it
pub const DEFAULT_VENDOR_DIR: &str = "vendor/";

/// Decoded `composer.json`, or one record of `vendor/composer/installed.json`.
///
/// Only the fields the builder needs are kept; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComposerManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub bin: BinPaths,

    #[serde(default)]
    pub config: ManifestConfig,

    #[serde(default, rename = "target-dir")]
    pub target_dir: Option<String>,

    #[serde(default, rename = "type")]
    pub package_type: Option<String>,
}

impl ComposerManifest {
    /// Manifest with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Metapackages install no files and have no directory under vendor
    pub fn is_metapackage(&self) -> bool {
        self.package_type.as_deref() == Some("metapackage")
    }
}

/// `bin` accepts a single path or a list of paths
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BinPaths {
    One(String),
    Many(Vec<String>),
}

impl Default for BinPaths {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl BinPaths {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(path) => vec![path],
            Self::Many(paths) => paths,
        }
    }
}

/// The `config` section of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ManifestConfig {
    #[serde(default, rename = "vendor-dir")]
    pub vendor_dir: Option<String>,
}

/// Decoded `vendor/composer/installed.json`.
///
/// Composer 1 writes a bare list of package records; Composer 2 wraps the list
/// in an object under `packages`. When `packages` is present it wins and any
/// other top-level keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InstalledManifest {
    Wrapped { packages: Vec<ComposerManifest> },
    Flat(Vec<ComposerManifest>),
}

impl InstalledManifest {
    pub fn packages(&self) -> &[ComposerManifest] {
        match self {
            Self::Wrapped { packages } => packages,
            Self::Flat(packages) => packages,
        }
    }
}

/// A package (main project or dependency) and the path facts derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    name: Option<String>,
    directory: PathBuf,
    vendor_path: String,
    bins: Vec<String>,
}

impl PackageDescriptor {
    /// Create a descriptor from a decoded manifest and the package directory
    pub fn new(manifest: ComposerManifest, directory: impl Into<PathBuf>) -> Self {
        let vendor_path = manifest
            .config
            .vendor_dir
            .as_deref()
            .map(str::trim)
            .map(|dir| dir.trim_end_matches('/'))
            .filter(|dir| !dir.is_empty())
            .map(|dir| format!("{}/", dir))
            .unwrap_or_else(|| DEFAULT_VENDOR_DIR.to_string());

        Self {
            name: manifest.name.filter(|n| !n.is_empty()),
            directory: directory.into(),
            vendor_path,
            bins: manifest.bin.into_vec(),
        }
    }

    /// Composer identifier (`group/name`), if the manifest declares one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name without its vendor prefix, or the directory name when unnamed
    pub fn short_name(&self) -> String {
        if let Some(name) = &self.name {
            if let Some((_, short)) = name.rsplit_once('/') {
                if !short.is_empty() {
                    return short.to_string();
                }
            } else {
                return name.clone();
            }
        }

        self.directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "package".to_string())
    }

    /// Name for progress output: the Composer name, falling back to the short name
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.short_name())
    }

    /// Package root directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Vendor directory relative to the package root, always ending in `/`
    pub fn vendor_path(&self) -> &str {
        &self.vendor_path
    }

    /// Absolute vendor directory
    pub fn vendor_absolute_path(&self) -> PathBuf {
        self.directory.join(self.vendor_path.trim_end_matches('/'))
    }

    /// Declared binaries, relative to the package root
    pub fn bins(&self) -> &[String] {
        &self.bins
    }

    /// Files of this package using the dependency rule.
    ///
    /// Everything under the package directory except hidden entries, VCS
    /// metadata, the package's own vendor tree and a `composer.phar` sitting
    /// directly in the package root. A `composer.phar` deeper in the tree is
    /// kept.
    pub fn bundle(&self) -> Bundle {
        let tree = FileTree::new(&self.directory)
            .exclude_dir(self.vendor_path.trim_end_matches('/'))
            .exclude_file("composer.phar");
        self.bundle_with(tree)
    }

    /// Files of this package selected by a caller-supplied tree
    pub fn bundle_with(&self, tree: FileTree) -> Bundle {
        let mut bundle = Bundle::new();
        bundle.add_tree(tree);
        bundle
    }
}
