//! Common test utilities for pharpack CLI and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated test environment with temp directories
//! - Fixtures: A minimal installed Hyperf project

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
