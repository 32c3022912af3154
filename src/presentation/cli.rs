//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Global flags (`--json`, `--verbose`) are inherited by all subcommands.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Manifest file looked up when `--path` names a directory
pub const MANIFEST_FILE: &str = "composer.json";

/// pharpack - packs a Composer project into a self-contained Phar archive
#[derive(Parser, Debug)]
#[command(name = "pharpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v lists every archived file)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a Phar archive from a Composer project
    Build {
        /// Target archive (file, or directory receiving the derived name)
        #[arg(long, value_name = "NAME")]
        name: Option<PathBuf>,

        /// Entry point relative to the project root (default: first declared bin)
        #[arg(short, long, value_name = "BIN")]
        bin: Option<String>,

        /// Project directory or path to its composer.json
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Version appended to the derived archive name
        #[arg(long = "phar-version", value_name = "VERSION")]
        phar_version: Option<String>,

        /// Create the mount targets next to the published archive
        #[arg(long)]
        prepare_mounts: bool,
    },

    /// List the contents of a built archive and verify its signature
    Inspect {
        /// Archive to read
        archive: PathBuf,
    },
}

/// Manifest named by `--path`: a directory means its `composer.json`
pub fn manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILE)
    } else {
        path.to_path_buf()
    }
}
