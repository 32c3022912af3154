//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Command-line definition
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering for results, warnings and errors
//!
//! ## Usage
//!
//! ```ignore
//! use pharpack::presentation::factory;
//!
//! let use_case = factory::create_build_use_case(&config);
//! let result = use_case.execute_with_events(&options, factory::create_event_sink(false, false));
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{manifest_path, Cli, Commands};
pub use factory::{create_build_use_case, create_event_sink, create_inspect_use_case};
pub use output::{print_error, OutputFormat};
