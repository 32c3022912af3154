//! Command entry points for the `pharpack` binary

mod build;
mod inspect;

pub use build::cmd_build;
pub use inspect::cmd_inspect;
