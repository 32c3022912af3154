//! Domain Entities
//!
//! - `PackageDescriptor` - One Composer package (main project or dependency)
//! - `Bundle` / `FileTree` - Files of a package selected for the archive

mod bundle;
mod package;

pub use bundle::{Bundle, BundleMember, FileTree, FileTreeIter};
pub use package::{
    BinPaths, ComposerManifest, InstalledManifest, ManifestConfig, PackageDescriptor,
    DEFAULT_VENDOR_DIR,
};
