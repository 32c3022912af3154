//! Repository Implementations
//!
//! Concrete implementations of repository ports.

mod composer;

pub use composer::ComposerRepository;
