//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod container;
pub mod package_repository;

pub use build_events::{BuildEvent, BuildEventSink, NoopEventSink};
pub use container::{ContainerFactory, StagedContainer};
pub use package_repository::{PackageRepository, INSTALLED_MANIFEST};
