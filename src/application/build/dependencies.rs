//! Dependency discovery
//!
//! Dependencies come from what Composer recorded in `installed.json`; nothing
//! is resolved here.

use crate::domain::entities::PackageDescriptor;
use crate::domain::ports::{PackageRepository, INSTALLED_MANIFEST};
use crate::error::{PharpackError, PharpackResult};

/// Installed dependency packages of `main`, in manifest order.
///
/// Each record lives in `<vendor>/<name>/[<target-dir>/]`. Metapackages are
/// skipped since they install no files. A record whose directory is missing
/// means the vendor tree is incomplete.
pub fn discover_dependencies<R: PackageRepository>(
    repo: &R,
    main: &PackageDescriptor,
) -> PharpackResult<Vec<PackageDescriptor>> {
    let vendor = main.vendor_absolute_path();
    let Some(installed) = repo.load_installed(&vendor)? else {
        return Ok(Vec::new());
    };

    let mut packages = Vec::with_capacity(installed.packages().len());
    for record in installed.packages() {
        if record.is_metapackage() {
            continue;
        }

        let Some(name) = record.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            return Err(PharpackError::invalid_input(
                vendor.join(INSTALLED_MANIFEST),
                "package record without a name",
            ));
        };

        let mut directory = vendor.join(name);
        if let Some(target_dir) = record
            .target_dir
            .as_deref()
            .map(|d| d.trim_matches('/'))
            .filter(|d| !d.is_empty())
        {
            directory = directory.join(target_dir);
        }

        if !directory.is_dir() {
            return Err(PharpackError::NotInstalled { path: directory });
        }
        packages.push(PackageDescriptor::new(record.clone(), directory));
    }
    Ok(packages)
}
