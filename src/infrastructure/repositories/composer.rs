//! Composer JSON Repository
//!
//! Implements the PackageRepository port over `composer.json` and
//! `vendor/composer/installed.json`.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::domain::entities::{ComposerManifest, InstalledManifest};
use crate::domain::ports::{PackageRepository, INSTALLED_MANIFEST};
use crate::error::{PharpackError, PharpackResult};

/// Reads Composer manifests from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposerRepository;

impl ComposerRepository {
    pub fn new() -> Self {
        Self
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> PharpackResult<T> {
    let content = fs::read_to_string(path).map_err(|e| PharpackError::invalid_input(path, e))?;
    serde_json::from_str(&content).map_err(|e| PharpackError::invalid_input(path, e))
}

impl PackageRepository for ComposerRepository {
    fn load_manifest(&self, path: &Path) -> PharpackResult<ComposerManifest> {
        load_json(path)
    }

    fn load_installed(&self, vendor_dir: &Path) -> PharpackResult<Option<InstalledManifest>> {
        let path = vendor_dir.join(INSTALLED_MANIFEST);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => load_json(&path).map(Some),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PharpackError::invalid_input(&path, e)),
        }
    }
}
