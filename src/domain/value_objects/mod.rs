//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod mount_link;
mod signature;

pub use config_warning::ConfigWarning;
pub use mount_link::{InvalidMountLink, MountLink, DEFAULT_MOUNT_LINKS};
pub use signature::SignatureAlgorithm;
