//! `pharpack inspect`

use std::path::Path;

use anyhow::Result;
use pharpack::presentation::create_inspect_use_case;
use pharpack::presentation::output::{render_inspect, OutputFormat};

pub fn cmd_inspect(archive: &Path, json: bool) -> Result<()> {
    let result = create_inspect_use_case().execute(archive)?;
    render_inspect(
        &mut std::io::stdout().lock(),
        &result,
        OutputFormat::from_json_flag(json),
    )?;
    Ok(())
}
