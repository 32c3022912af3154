//! Build Module
//!
//! Assembles a Composer project and its vendor tree into one Phar archive.
//!
//! ## Structure
//!
//! - `options` - Build configuration (`BuildOptions`)
//! - `result` - Result type (`BuildResult`)
//! - `session` - Archive session over a staged container (`ArchiveSession`)
//! - `dependencies` - Dependency discovery from `installed.json`
//! - `use_case` - The build pipeline (`BuildUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use pharpack::application::build::{BuildOptions, BuildUseCase};
//!
//! let use_case = BuildUseCase::new(ComposerRepository::new(), PharFactory::default());
//! let result = use_case.execute(&BuildOptions::new("composer.json"))?;
//! ```

mod dependencies;
mod options;
mod result;
mod session;
mod use_case;

pub use dependencies::discover_dependencies;
pub use options::{BuildOptions, DEFAULT_BIN};
pub use result::BuildResult;
pub use session::ArchiveSession;
pub use use_case::BuildUseCase;
