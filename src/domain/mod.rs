//! Domain Layer
//!
//! The packaging rules of pharpack, independent of the archive format and of
//! how manifests are stored.
//!
//! ## Structure
//!
//! - `entities/` - Packages and the bundles of files they contribute
//! - `value_objects/` - Immutable value types (MountLink, SignatureAlgorithm)
//! - `services/` - Source rewrites and the bootstrap preamble
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
