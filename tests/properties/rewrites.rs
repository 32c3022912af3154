//! Property tests for source rewrites and the entry-point preamble.

use proptest::prelude::*;

use pharpack::domain::services::{
    render_preamble, rewrite_source, wrap_entry_point, ConfigFactoryPathname, EnableScanCacheable,
};
use pharpack::MountLink;

fn config_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("false".to_string()),
        Just("true".to_string()),
        Just("env('SCAN_CACHEABLE', false)".to_string()),
        Just("[1, 2]".to_string()),
        Just("null".to_string()),
        proptest::string::string_regex("[0-9]{1,4}").unwrap(),
    ]
}

fn config_entry() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![
            Just("scan_cacheable".to_string()),
            Just("app_name".to_string()),
            Just("app_env".to_string()),
        ],
        config_value(),
    )
}

fn config_file(entries: &[(String, String)]) -> String {
    let body: String = entries
        .iter()
        .map(|(key, value)| format!("    '{}' => {},\n", key, value))
        .collect();
    format!("<?php\n\ndeclare(strict_types=1);\n\nreturn [\n{}];\n", body)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Forcing scan_cacheable is idempotent.
    #[test]
    fn property_scan_cacheable_rewrite_is_idempotent(
        entries in proptest::collection::vec(config_entry(), 0..=6),
    ) {
        let source = config_file(&entries);
        let once = rewrite_source(&source, &EnableScanCacheable).unwrap();
        let twice = rewrite_source(&once.source, &EnableScanCacheable).unwrap();

        prop_assert_eq!(&twice.source, &once.source);
        prop_assert!(!twice.changed);

        let needs_change = entries
            .iter()
            .any(|(key, value)| key == "scan_cacheable" && value != "true");
        prop_assert_eq!(once.changed, needs_change);
        prop_assert_eq!(once.source == source, !needs_change);
    }

    /// PROPERTY: Rewrites only touch the scan_cacheable entries.
    #[test]
    fn property_scan_cacheable_rewrite_keeps_other_entries(
        entries in proptest::collection::vec(config_entry(), 0..=6),
    ) {
        let source = config_file(&entries);
        let rewritten = rewrite_source(&source, &EnableScanCacheable).unwrap().source;

        let expected: Vec<(String, String)> = entries
            .iter()
            .map(|(key, value)| {
                if key == "scan_cacheable" {
                    (key.clone(), "true".to_string())
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect();
        prop_assert_eq!(rewritten, config_file(&expected));
    }

    /// PROPERTY: The pathname rewrite is idempotent and leaves no getRealPath call in readPaths.
    #[test]
    fn property_config_factory_rewrite_is_idempotent(
        calls in proptest::collection::vec(prop_oneof![Just("getRealPath"), Just("getPathname"), Just("getFilename")], 1..=4),
    ) {
        let body: String = calls
            .iter()
            .map(|call| format!("            $configs[] = require $file->{}();\n", call))
            .collect();
        let source = format!(
            "<?php\nclass ConfigFactory\n{{\n    private function readPaths(array $paths)\n    {{\n        foreach ($paths as $file) {{\n{}        }}\n    }}\n}}\n",
            body
        );

        let once = rewrite_source(&source, &ConfigFactoryPathname).unwrap();
        let twice = rewrite_source(&once.source, &ConfigFactoryPathname).unwrap();

        prop_assert!(!once.source.contains("getRealPath"));
        prop_assert_eq!(once.changed, calls.contains(&"getRealPath"));
        prop_assert_eq!(&twice.source, &once.source);
        prop_assert!(!twice.changed);
    }

    /// PROPERTY: Wrapping keeps every line of the entry point after its shebang.
    #[test]
    fn property_wrapped_entry_point_contains_source(
        statements in proptest::collection::vec("run_[a-z]{1,8}\\(\\);", 0..=6),
        shebang in any::<bool>(),
    ) {
        let code = statements.join("\n");
        let body = format!("<?php\n{}\n", code);
        let source = if shebang {
            format!("#!/usr/bin/env php\n{}", body)
        } else {
            body.clone()
        };

        let links = MountLink::defaults();
        let wrapped = wrap_entry_point(&source, &links).unwrap();

        prop_assert_eq!(
            wrapped,
            format!("<?php\n{}\n{}\n", render_preamble(&links), code)
        );
    }
}
