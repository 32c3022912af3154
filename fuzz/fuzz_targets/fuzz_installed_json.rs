#![no_main]

use libfuzzer_sys::fuzz_target;
use pharpack::domain::entities::{InstalledManifest, PackageDescriptor};

fuzz_target!(|data: &[u8]| {
    if let Ok(installed) = serde_json::from_slice::<InstalledManifest>(data) {
        for manifest in installed.packages() {
            let package = PackageDescriptor::new(manifest.clone(), "/srv/app/vendor/pkg");
            let _ = package.short_name();
            let _ = package.vendor_path();
        }
    }
});
