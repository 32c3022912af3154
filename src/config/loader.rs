//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ConfigWarning, MountLink, SignatureAlgorithm};
use crate::error::{PharpackError, PharpackResult};

use super::types::Config;

/// Project config file, relative to the project root
pub const PROJECT_CONFIG_FILE: &str = "pharpack.toml";
/// User config file, relative to the platform config directory
pub const USER_CONFIG_FILE: &str = "pharpack/config.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> PharpackResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| PharpackError::invalid_input(path, e))?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| PharpackError::invalid_input(path, e))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.split('.').next_back().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                file: path.to_path_buf(),
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
pub fn load_or_default(project_root: &Path) -> PharpackResult<(Config, Vec<ConfigWarning>)> {
    load_layered(project_root, dirs::config_dir().as_deref())
}

/// First existing of `<project_root>/pharpack.toml` and
/// `<user_config_dir>/pharpack/config.toml` wins as a whole; without either
/// the defaults apply. Environment overrides go on top.
pub fn load_layered(
    project_root: &Path,
    user_config_dir: Option<&Path>,
) -> PharpackResult<(Config, Vec<ConfigWarning>)> {
    let candidates: Vec<PathBuf> = std::iter::once(project_root.join(PROJECT_CONFIG_FILE))
        .chain(user_config_dir.map(|dir| dir.join(USER_CONFIG_FILE)))
        .collect();

    for path in candidates {
        if path.is_file() {
            let (config, warnings) = load_with_warnings(&path)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides (PHARPACK_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `get_env`; unparsable values are ignored
pub fn with_env_overrides_from<F>(mut config: Config, get_env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // PHARPACK_READONLY
    if let Some(val) = get_env("PHARPACK_READONLY") {
        match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => config.archive.readonly = true,
            "0" | "false" | "no" | "off" => config.archive.readonly = false,
            _ => {}
        }
    }

    // PHARPACK_SIGNATURE
    if let Some(signature) = get_env("PHARPACK_SIGNATURE")
        .and_then(|val| val.parse::<SignatureAlgorithm>().ok())
    {
        config.archive.signature = signature;
    }

    // PHARPACK_MOUNT_LINKS (comma-separated)
    if let Some(links) = get_env("PHARPACK_MOUNT_LINKS") {
        let parsed: Vec<MountLink> = links
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| MountLink::new(s).ok())
            .collect();
        if !parsed.is_empty() {
            config.build.mount_links = parsed;
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "build",
        "default_bin",
        "mount_links",
        "archive",
        "readonly",
        "signature",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
