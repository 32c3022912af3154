//! pharpack - packs a Composer project into a single Phar archive
//!
//! pharpack bundles a Hyperf application, its installed vendor tree and the
//! Composer autoload glue into one self-contained, signed `.phar`. Along the
//! way it patches a few PHP sources so the application runs from inside the
//! archive, and wraps the entry point with a preamble that mounts writable
//! paths (`.env`, the pid file) beside the archive.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{BuildOptions, BuildResult, BuildUseCase, InspectResult, InspectUseCase};
pub use config::Config;
pub use domain::value_objects::{MountLink, SignatureAlgorithm};
pub use error::{PharpackError, PharpackResult};
pub use infrastructure::{ComposerRepository, PharFactory, PharReader};
