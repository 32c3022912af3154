//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::DEFAULT_BIN;
use crate::domain::value_objects::{ConfigWarning, MountLink, SignatureAlgorithm};
use crate::error::PharpackResult;

use super::loader;

/// Build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Entry point when `composer.json` declares no `bin`
    #[serde(default = "default_bin")]
    pub default_bin: String,

    /// Paths mounted writable beside the archive at runtime
    #[serde(default = "MountLink::defaults")]
    pub mount_links: Vec<MountLink>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_bin: default_bin(),
            mount_links: MountLink::defaults(),
        }
    }
}

fn default_bin() -> String {
    DEFAULT_BIN.to_string()
}

/// Archive configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArchiveConfig {
    /// Refuse to write archives at all
    #[serde(default)]
    pub readonly: bool,

    #[serde(default)]
    pub signature: SignatureAlgorithm,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PharpackResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> PharpackResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults, then apply
    /// `PHARPACK_*` environment overrides
    pub fn load_or_default(project_root: &Path) -> PharpackResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (PHARPACK_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
