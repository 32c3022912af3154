//! Scenario: shipping the archive with writable mount points beside it.

use crate::common::*;
use pharpack::PharReader;

#[test]
fn scenario_prepare_mounts_next_to_archive() {
    let env = TestEnv::hyperf();
    let dist = tempfile::tempdir().unwrap();
    let dist_path = dist.path().to_str().unwrap().to_string();

    let result = env.run(&["build", "--name", &dist_path, "--prepare-mounts"]);

    assert!(result.success, "build failed:\n{}", result.combined_output());
    assert!(dist.path().join("shop.phar").is_file());
    assert!(dist.path().join(".env").is_file());
    assert!(dist.path().join("runtime/hyperf.pid").is_file());
    assert!(result.stdout.contains("Prepared mount target"));
}

#[test]
fn scenario_prepare_mounts_keeps_existing_files() {
    let env = TestEnv::hyperf();
    // The project's own .env sits where the archive lands.
    let result = env.run(&["build", "--prepare-mounts"]);

    assert!(result.success, "build failed:\n{}", result.combined_output());
    assert_eq!(
        std::fs::read_to_string(env.project_path(".env")).unwrap(),
        "APP_NAME=shop\n"
    );
    assert_eq!(
        std::fs::read_to_string(env.project_path("runtime/hyperf.pid")).unwrap(),
        "1234"
    );
}

#[test]
fn scenario_mount_links_from_env() {
    let env = TestEnv::hyperf();

    let result = env.run_with_env(
        &["build", "--json"],
        &[("PHARPACK_MOUNT_LINKS", ".env,storage/logs/")],
    );
    assert!(result.success, "build failed:\n{}", result.combined_output());

    let archive = PharReader::open(&env.project_path("shop.phar")).unwrap();
    let entry = String::from_utf8_lossy(&archive.entry("bin/hyperf.php").unwrap().contents)
        .into_owned();
    assert!(entry.contains("})(['.env', 'storage/logs/']);"));
    assert!(!env.project_path("storage").exists());
}
