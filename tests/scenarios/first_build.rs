//! Scenario: a developer packs a freshly installed Hyperf project.

use crate::common::*;
use pharpack::{PharReader, SignatureAlgorithm};

fn entry_text(archive: &pharpack::infrastructure::phar::PharArchive, name: &str) -> String {
    let entry = archive
        .entry(name)
        .unwrap_or_else(|| panic!("missing entry {name}"));
    String::from_utf8(entry.contents.clone()).unwrap()
}

#[test]
fn scenario_first_build_round_trip() {
    let env = TestEnv::hyperf();

    let result = env.run(&["build"]);
    assert!(result.success, "build failed:\n{}", result.combined_output());

    let archive = PharReader::open(&env.project_path("shop.phar")).unwrap();
    assert_eq!(archive.signature, SignatureAlgorithm::Sha256);
    assert_eq!(archive.api_version, [0x11, 0x10]);
    assert!(archive.stub.starts_with("#!/usr/bin/env php\n"));
    assert!(archive.stub.ends_with("__HALT_COMPILER(); ?>\r\n"));
    assert_eq!(archive.stub_entry_point().as_deref(), Some("bin/hyperf.php"));

    // Untouched files are stored byte for byte.
    for (path, content) in HYPERF_PROJECT {
        if matches!(
            *path,
            "config/config.php" | "vendor/hyperf/config/src/ConfigFactory.php" | "bin/hyperf.php"
        ) {
            continue;
        }
        if let Some(entry) = archive.entry(path) {
            assert_eq!(entry.contents, content.as_bytes(), "content of {path}");
        }
    }
}

#[test]
fn scenario_sources_are_patched_for_the_archive() {
    let env = TestEnv::hyperf();
    assert!(env.run(&["build"]).success);

    let archive = PharReader::open(&env.project_path("shop.phar")).unwrap();

    let config = entry_text(&archive, "config/config.php");
    assert_eq!(
        config,
        CONFIG_PHP.replace(
            "'scan_cacheable' => env('SCAN_CACHEABLE', false)",
            "'scan_cacheable' => true"
        )
    );

    let factory = entry_text(&archive, "vendor/hyperf/config/src/ConfigFactory.php");
    assert_eq!(
        factory,
        CONFIG_FACTORY_PHP.replace("require $file->getRealPath()", "require $file->getPathname()")
    );

    let entry = entry_text(&archive, "bin/hyperf.php");
    assert!(entry.starts_with("<?php\n\ndeclare(strict_types=1);\n(static function (array $links): void {\n"));
    assert!(entry.contains("})(['.env', 'runtime/hyperf.pid']);\n"));
    assert!(entry.ends_with(&ENTRY_POINT[ENTRY_POINT.find("\n\nini_set").unwrap()..]));
    assert!(!entry.contains("#!/usr/bin/env php"));

    // The project itself is left alone.
    let on_disk = std::fs::read_to_string(env.project_path("config/config.php")).unwrap();
    assert_eq!(on_disk, CONFIG_PHP);
}

#[cfg(unix)]
#[test]
fn scenario_archive_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::hyperf();
    assert!(env.run(&["build"]).success);

    let mode = std::fs::metadata(env.project_path("shop.phar"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn scenario_project_without_dependencies() {
    let env = TestEnv::new();
    env.write_project_file("composer.json", "{\"name\": \"acme/tiny\"}\n");
    env.write_project_file("bin/hyperf.php", "<?php\necho 'tiny';\n");
    env.write_project_file("vendor/autoload.php", "<?php\n");

    let result = env.run(&["build"]);
    assert!(result.success, "build failed:\n{}", result.combined_output());

    let archive = PharReader::open(&env.project_path("tiny.phar")).unwrap();
    assert_eq!(
        archive.names(),
        vec!["composer.json", "vendor/autoload.php", "bin/hyperf.php"]
    );
}
