//! Property tests for package naming and vendor paths.

use proptest::prelude::*;

use pharpack::domain::entities::{ComposerManifest, ManifestConfig, PackageDescriptor};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9][a-z0-9_.-]{0,10}").unwrap()
}

fn descriptor(name: Option<String>, vendor_dir: Option<String>, dir: &str) -> PackageDescriptor {
    let manifest = ComposerManifest {
        name,
        config: ManifestConfig { vendor_dir },
        ..ComposerManifest::default()
    };
    PackageDescriptor::new(manifest, format!("/srv/{}", dir))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The short name of a `group/name` package is its last segment.
    #[test]
    fn property_short_name_is_last_segment(group in segment(), name in segment(), dir in segment()) {
        let package = descriptor(Some(format!("{}/{}", group, name)), None, &dir);
        prop_assert_eq!(package.short_name(), name);
    }

    /// PROPERTY: The short name is never empty and never contains a slash.
    #[test]
    fn property_short_name_is_a_file_name(
        name in proptest::option::of("[a-z/]{0,12}"),
        dir in segment(),
    ) {
        let package = descriptor(name, None, &dir);
        let short = package.short_name();
        prop_assert!(!short.is_empty());
        prop_assert!(!short.contains('/'));
    }

    /// PROPERTY: Vendor paths always end in exactly one slash.
    #[test]
    fn property_vendor_path_is_normalized(
        vendor_dir in proptest::option::of("[ ]{0,2}[a-z/]{0,10}[ ]{0,2}"),
        dir in segment(),
    ) {
        let package = descriptor(None, vendor_dir.clone(), &dir);
        let vendor = package.vendor_path();

        prop_assert!(vendor.ends_with('/'));
        prop_assert!(!vendor.ends_with("//"));

        let trimmed = vendor_dir
            .as_deref()
            .map(|d| d.trim().trim_end_matches('/'))
            .unwrap_or("");
        if trimmed.is_empty() {
            prop_assert_eq!(vendor, "vendor/");
        } else {
            prop_assert_eq!(vendor, format!("{}/", trimmed));
        }
    }
}
