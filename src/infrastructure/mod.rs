//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `phar/` - Phar archive writer, reader and stub
//! - `repositories/` - Composer manifest repository
//! - `events/` - Build event sinks (console, JSON)

pub mod events;
pub mod phar;
pub mod repositories;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use phar::{PharFactory, PharReader, PharWriter};
pub use repositories::ComposerRepository;
