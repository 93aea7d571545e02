//! Config file discovery, loading, and environment variable overlay.

use crate::{ConfigError, LogRotation, ValopConfig};
use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local). Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    standard_locations()
        .into_iter()
        .chain(Some(PathBuf::from("valop.toml")))
        .filter(|p| p.exists())
        .collect()
}

/// Discover config files, with an explicit path replacing `./valop.toml`.
///
/// An explicit path that does not exist is an error: the caller asked for
/// that file, so silently running on defaults would hide a typo.
pub fn discover_config_files_with_override(
    explicit: Option<&Path>,
) -> Result<Vec<PathBuf>, ConfigError> {
    let Some(path) = explicit else {
        return Ok(discover_config_files());
    };
    if !path.is_file() {
        return Err(ConfigError::FileRead {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such config file"),
        });
    }

    let mut files: Vec<PathBuf> = standard_locations().into_iter().filter(|p| p.exists()).collect();
    files.push(path.to_path_buf());
    Ok(files)
}

/// System then user config paths, whether or not they exist.
fn standard_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/valop/config.toml")];
    // XDG_CONFIG_HOME or ~/.config
    if let Some(dirs) = directories::BaseDirs::new() {
        paths.push(dirs.config_dir().join("valop").join("config.toml"));
    }
    paths
}

/// Overlay the keys present in a TOML document onto `config`.
///
/// Keys absent from the document keep their current value, so applying
/// files in load order gives "later wins" per key.
pub fn apply_toml(config: &mut ValopConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let wrong_type = |key: &str, expected: &str| ConfigError::Parse {
        path: path.to_path_buf(),
        message: format!("{} must be {}", key, expected),
    };

    if let Some(client) = table.get("client").and_then(|v| v.as_table()) {
        if let Some(v) = client.get("base_url") {
            let v = v.as_str().ok_or_else(|| wrong_type("client.base_url", "a string"))?;
            config.client.base_url = v.to_string();
        }
        if let Some(v) = client.get("timeout_ms") {
            let v = v
                .as_integer()
                .ok_or_else(|| wrong_type("client.timeout_ms", "an integer"))?;
            config.client.timeout_ms = Some(parse_timeout("client.timeout_ms", &v.to_string())?);
        }
    }

    if let Some(logging) = table.get("logging").and_then(|v| v.as_table()) {
        if let Some(v) = logging.get("level") {
            let v = v.as_str().ok_or_else(|| wrong_type("logging.level", "a string"))?;
            config.logging.level = v.to_string();
        }
        if let Some(v) = logging.get("console") {
            config.logging.console = v.as_bool().ok_or_else(|| wrong_type("logging.console", "a boolean"))?;
        }
        if let Some(v) = logging.get("file") {
            config.logging.file = v.as_bool().ok_or_else(|| wrong_type("logging.file", "a boolean"))?;
        }
        if let Some(v) = logging.get("ansi") {
            config.logging.ansi = v.as_bool().ok_or_else(|| wrong_type("logging.ansi", "a boolean"))?;
        }
        if let Some(v) = logging.get("directory") {
            let v = v.as_str().ok_or_else(|| wrong_type("logging.directory", "a string"))?;
            config.logging.directory = expand_path(v);
        }
        if let Some(v) = logging.get("file_name") {
            let v = v.as_str().ok_or_else(|| wrong_type("logging.file_name", "a string"))?;
            config.logging.file_name = v.to_string();
        }
        if let Some(v) = logging.get("rotation") {
            let v = v.as_str().ok_or_else(|| wrong_type("logging.rotation", "a string"))?;
            config.logging.rotation = parse_rotation("logging.rotation", v)?;
        }
        if let Some(v) = logging.get("max_files") {
            let v = v
                .as_integer()
                .filter(|n| *n >= 0)
                .ok_or_else(|| wrong_type("logging.max_files", "a non-negative integer"))?;
            config.logging.max_files = v as usize;
        }
    }

    Ok(())
}

/// Milliseconds, strictly positive. Leave the key unset to disable the timeout.
fn parse_timeout(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key: key.to_string(),
            message: "must be greater than zero; omit it for no timeout".to_string(),
        }),
        Ok(ms) => Ok(ms),
        Err(_) => Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("'{}' is not a number of milliseconds", value),
        }),
    }
}

fn parse_rotation(key: &str, value: &str) -> Result<LogRotation, ConfigError> {
    value.parse::<LogRotation>().map_err(|message| ConfigError::Invalid {
        key: key.to_string(),
        message,
    })
}

/// Apply environment variable overrides to config.
///
/// `lookup` resolves a variable name; production passes `std::env::var`.
pub fn apply_env_overrides<F>(
    config: &mut ValopConfig,
    sources: &mut ConfigSources,
    lookup: F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("VALOP_BASE_URL") {
        config.client.base_url = v;
        sources.env_overrides.push("VALOP_BASE_URL".to_string());
    }
    if let Some(v) = lookup("VALOP_TIMEOUT_MS") {
        config.client.timeout_ms = Some(parse_timeout("VALOP_TIMEOUT_MS", &v)?);
        sources.env_overrides.push("VALOP_TIMEOUT_MS".to_string());
    }

    if let Some(v) = lookup("VALOP_LOG_LEVEL") {
        config.logging.level = v;
        sources.env_overrides.push("VALOP_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over VALOP_LOG_LEVEL
    if let Some(v) = lookup("RUST_LOG") {
        config.logging.level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
    if let Some(v) = lookup("VALOP_LOG_DIR") {
        config.logging.directory = expand_path_with(&v, &lookup);
        sources.env_overrides.push("VALOP_LOG_DIR".to_string());
    }
    if let Some(v) = lookup("VALOP_LOG_FILE") {
        config.logging.file_name = v;
        sources.env_overrides.push("VALOP_LOG_FILE".to_string());
    }
    if let Some(v) = lookup("VALOP_LOG_ROTATION") {
        config.logging.rotation = parse_rotation("VALOP_LOG_ROTATION", &v)?;
        sources.env_overrides.push("VALOP_LOG_ROTATION".to_string());
    }
    if let Some(v) = lookup("VALOP_LOG_MAX_FILES") {
        config.logging.max_files = v.parse::<usize>().map_err(|_| ConfigError::Invalid {
            key: "VALOP_LOG_MAX_FILES".to_string(),
            message: format!("'{}' is not a file count", v),
        })?;
        sources.env_overrides.push("VALOP_LOG_MAX_FILES".to_string());
    }

    Ok(())
}

/// Expand a leading `~/` or `$VAR` in a path.
pub fn expand_path(path: &str) -> PathBuf {
    expand_path_with(path, |name| env::var(name).ok())
}

/// [`expand_path`] with variables resolved through `lookup`.
///
/// An unset variable leaves the path as written.
pub fn expand_path_with<F>(path: &str, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(rest) = path.strip_prefix("~/") {
        return match directories::BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(rest),
            None => PathBuf::from(path),
        };
    }

    let Some(var_and_rest) = path.strip_prefix('$') else {
        return PathBuf::from(path);
    };
    let (name, rest) = match var_and_rest.split_once('/') {
        Some((name, rest)) => (name, Some(rest)),
        None => (var_and_rest, None),
    };
    match (lookup(name), rest) {
        (Some(value), Some(rest)) => PathBuf::from(value).join(rest),
        (Some(value), None) => PathBuf::from(value),
        (None, _) => PathBuf::from(path),
    }
}
