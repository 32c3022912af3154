//! Configuration module for pharpack
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (PHARPACK_*)
//! 3. Project config (pharpack.toml)
//! 4. User config (~/.config/pharpack/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{load_layered, with_env_overrides_from, PROJECT_CONFIG_FILE, USER_CONFIG_FILE};
pub use types::{ArchiveConfig, BuildConfig, Config};
