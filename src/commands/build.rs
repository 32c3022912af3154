//! `pharpack build`

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pharpack::application::BuildOptions;
use pharpack::config::Config;
use pharpack::presentation::output::{render_warnings, OutputFormat};
use pharpack::presentation::{create_build_use_case, create_event_sink, manifest_path};

/// Build command entry point
pub fn cmd_build(
    name: Option<PathBuf>,
    bin: Option<String>,
    path: &Path,
    phar_version: Option<String>,
    prepare_mounts: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let mut options = BuildOptions::new(manifest_path(path));

    let (config, warnings) = Config::load_or_default(options.project_root())?;
    let format = OutputFormat::from_json_flag(json);
    if json {
        render_warnings(&mut io::stdout().lock(), &warnings, format)?;
    } else {
        render_warnings(&mut io::stderr().lock(), &warnings, format)?;
    }

    options = options
        .with_default_bin(config.build.default_bin.clone())
        .with_mount_links(config.build.mount_links.clone())
        .with_prepare_mounts(prepare_mounts);
    if let Some(name) = name {
        options = options.with_target(name);
    }
    if let Some(bin) = bin {
        options = options.with_main(bin);
    }
    if let Some(version) = phar_version {
        options = options.with_version(version);
    }

    let use_case = create_build_use_case(&config);
    use_case.execute_with_events(&options, create_event_sink(json, verbose > 0))?;
    Ok(())
}
