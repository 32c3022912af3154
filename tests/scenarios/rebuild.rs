//! Scenario: rebuilding over an existing archive, and builds that fail midway.

use std::fs;

use crate::common::*;
use pharpack::PharReader;

fn staging_leftovers(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("shop.phar.") && name.ends_with(".phar"))
        .collect()
}

#[test]
fn scenario_rebuild_replaces_archive() {
    let env = TestEnv::hyperf();
    assert!(env.run(&["build"]).success);
    let first = PharReader::open(&env.project_path("shop.phar")).unwrap();

    env.write_project_file("app/Service/Mailer.php", "<?php\n\nclass Mailer {}\n");
    let result = env.run(&["build"]);

    assert!(result.success, "rebuild failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("Overwriting existing file"));

    let second = PharReader::open(&env.project_path("shop.phar")).unwrap();
    assert_eq!(second.entries.len(), first.entries.len() + 1);
    assert!(second.entry("app/Service/Mailer.php").is_some());
    assert!(second.entry("shop.phar").is_none());
    assert!(staging_leftovers(&env.root()).is_empty());
}

#[test]
fn scenario_unparsable_config_keeps_previous_archive() {
    let env = TestEnv::hyperf();
    assert!(env.run(&["build"]).success);
    let before = fs::read(env.project_path("shop.phar")).unwrap();

    env.write_project_file("config/config.php", "<?php\nreturn [\n    'scan_cacheable' => 'open;\n");
    let result = env.run(&["build"]);

    assert!(!result.success);
    assert!(result.stderr.contains("unable to parse PHP source"), "stderr: {}", result.stderr);
    assert_eq!(fs::read(env.project_path("shop.phar")).unwrap(), before);
    assert!(staging_leftovers(&env.root()).is_empty());
}

#[test]
fn scenario_failed_rename_keeps_staging_file() {
    let env = TestEnv::hyperf();
    // A non-empty directory where the archive should go.
    env.write_project_file("out/shop.phar/README", "do not replace");

    let result = env.run(&["build", "--name", "out"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("unable to rename temporary phar archive"),
        "stderr: {}",
        result.stderr
    );
    assert_eq!(
        fs::read_to_string(env.project_path("out/shop.phar/README")).unwrap(),
        "do not replace"
    );

    let leftovers = staging_leftovers(&env.project_path("out"));
    assert_eq!(leftovers.len(), 1, "expected one kept staging file");
    let staged = env.project_path("out").join(&leftovers[0]);
    assert!(PharReader::open(&staged).is_ok());
}

#[test]
fn scenario_missing_dependency_directory() {
    let env = TestEnv::hyperf();
    fs::remove_dir_all(env.project_path("vendor/psr/log")).unwrap();

    let result = env.run(&["build"]);

    assert!(!result.success);
    assert!(result.stderr.contains("psr/log"));
    assert!(result.stderr.contains("not properly installed"));
    assert!(!env.project_path("shop.phar").exists());
}
