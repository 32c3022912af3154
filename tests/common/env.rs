//! Test environment builder for isolated pharpack testing.
//!
//! Provides `TestEnv` - an isolated test environment with temp directories
//! for both project and home, plus helpers to run the pharpack CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::fixtures::HYPERF_PROJECT;

/// Result of running a pharpack CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn json_events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("invalid JSON line {l:?}: {e}"))
            })
            .collect()
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory for HOME (user config lives below it)
    pub home_dir: TempDir,
}

impl TestEnv {
    /// Empty project directory
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("Failed to create project temp dir"),
            home_dir: TempDir::new().expect("Failed to create home temp dir"),
        }
    }

    /// Project directory holding the installed Hyperf fixture
    pub fn hyperf() -> Self {
        let env = Self::new();
        for (path, content) in HYPERF_PROJECT {
            env.write_project_file(path, content);
        }
        env
    }

    /// Canonical project root (archives report canonical paths)
    pub fn root(&self) -> PathBuf {
        std::fs::canonicalize(self.project_root.path()).expect("Failed to canonicalize root")
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Run pharpack in this environment from project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run pharpack from project root with extra env vars.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.run_from_with_env(self.project_root.path(), args, env_vars)
    }

    /// Run pharpack from a specific directory with extra env vars.
    pub fn run_from_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let home = self.home_dir.path();
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pharpack"));
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", home)
            .env("USERPROFILE", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env_remove("PHARPACK_READONLY")
            .env_remove("PHARPACK_SIGNATURE")
            .env_remove("PHARPACK_MOUNT_LINKS");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute pharpack");
        output_to_result(output)
    }

    /// Write a file to the project directory
    pub fn write_project_file(&self, relative_path: &str, content: &str) {
        let full_path = self.project_root.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
    }

    /// Write the user config file (`$XDG_CONFIG_HOME/pharpack/config.toml`)
    pub fn write_user_config(&self, content: &str) {
        let path = self.home_dir.path().join(".config/pharpack/config.toml");
        std::fs::create_dir_all(path.parent().unwrap()).expect("Failed to create config dir");
        std::fs::write(path, content).expect("Failed to write user config");
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
