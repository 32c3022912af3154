//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `BuildUseCase` - Orchestrates the build flow (load, stage, rewrite, wrap, commit, publish)
//! - `InspectUseCase` - Reads a published archive back and summarizes it

pub mod build;
pub mod inspect;

pub use build::{
    discover_dependencies, ArchiveSession, BuildOptions, BuildResult, BuildUseCase, DEFAULT_BIN,
};
pub use inspect::{InspectEntry, InspectResult, InspectUseCase};
