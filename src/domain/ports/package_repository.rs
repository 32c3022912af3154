//! PackageRepository port - reading Composer manifests
//!
//! The build only reads what the dependency manager wrote; it never resolves
//! versions itself.

use std::path::Path;

use crate::domain::entities::{ComposerManifest, InstalledManifest};
use crate::error::PharpackResult;

/// Installed-dependency manifest, relative to the vendor directory
pub const INSTALLED_MANIFEST: &str = "composer/installed.json";

/// Source of decoded Composer manifests
pub trait PackageRepository {
    /// Decode the project manifest (`composer.json`).
    ///
    /// A missing, unreadable or undecodable file is `InvalidInput`.
    fn load_manifest(&self, path: &Path) -> PharpackResult<ComposerManifest>;

    /// Decode `<vendor_dir>/composer/installed.json`.
    ///
    /// Returns `Ok(None)` when the file does not exist (no dependencies).
    fn load_installed(&self, vendor_dir: &Path) -> PharpackResult<Option<InstalledManifest>>;
}
