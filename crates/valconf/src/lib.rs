//! Layered configuration loading for valop.
//!
//! # Usage
//!
//! ```rust,no_run
//! use valconf::ValopConfig;
//!
//! let config = ValopConfig::load().expect("Failed to load config");
//! println!("Base URL: {}", config.client.base_url);
//! println!("Log dir: {}", config.logging.directory.display());
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/valop/config.toml` (system)
//! 2. `~/.config/valop/config.toml` (user)
//! 3. `./valop.toml` (local override, replaced by an explicit path)
//! 4. Environment variables (`VALOP_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [client]
//! base_url = "https://backend.internal:8443"
//! timeout_ms = 30000
//!
//! [logging]
//! level = "info,valop=debug"
//! directory = "/var/log/valop"
//! file_name = "application.log"
//! rotation = "daily"
//! max_files = 5
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files_with_override, ConfigSources};
pub use sections::{ClientConfig, LogRotation, LoggingConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete valop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValopConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ValopConfig {
    /// Load configuration from all standard sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration, letting `config_path` replace the local
    /// `./valop.toml` override. System and user configs still load first.
    /// A `config_path` that does not exist is a [`ConfigError::FileRead`].
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and report where values came from.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = ValopConfig::default();

        for path in loader::discover_config_files_with_override(config_path)? {
            let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            loader::apply_toml(&mut config, &contents, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources, |key| std::env::var(key).ok())?;

        Ok((config, sources))
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> String {
        // Built by hand so the optional timeout renders as a comment
        let mut output = String::new();

        output.push_str("# valop configuration\n\n");

        output.push_str("[client]\n");
        output.push_str(&format!("base_url = {}\n", quoted(&self.client.base_url)));
        match self.client.timeout_ms {
            Some(ms) => output.push_str(&format!("timeout_ms = {}\n", ms)),
            None => output.push_str("# timeout_ms = 30000\n"),
        }

        output.push_str("\n[logging]\n");
        output.push_str(&format!("level = {}\n", quoted(&self.logging.level)));
        output.push_str(&format!("console = {}\n", self.logging.console));
        output.push_str(&format!("file = {}\n", self.logging.file));
        output.push_str(&format!(
            "directory = {}\n",
            quoted(&self.logging.directory.display().to_string())
        ));
        output.push_str(&format!("file_name = {}\n", quoted(&self.logging.file_name)));
        output.push_str(&format!("rotation = {}\n", quoted(self.logging.rotation.as_str())));
        output.push_str(&format!("max_files = {}\n", self.logging.max_files));
        output.push_str(&format!("ansi = {}\n", self.logging.ansi));

        output
    }
}

/// TOML string literal for `s`, escaped as needed.
fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}
