//! pharpack CLI - packs a Composer project into a self-contained Phar archive
//!
//! Usage: pharpack <COMMAND>
//!
//! Commands:
//!   build    Build a Phar archive from a Composer project
//!   inspect  List the contents of a built archive

use anyhow::Result;
use clap::Parser;
use pharpack::presentation::{print_error, Cli, Commands};

mod commands;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli) {
        print_error(&err, json);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            name,
            bin,
            path,
            phar_version,
            prepare_mounts,
        } => commands::cmd_build(
            name,
            bin,
            &path,
            phar_version,
            prepare_mounts,
            cli.json,
            cli.verbose,
        ),
        Commands::Inspect { archive } => commands::cmd_inspect(&archive, cli.json),
    }
}
