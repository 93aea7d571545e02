//! Configuration sections: the remote endpoint and the log sinks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Remote endpoint the dispatcher talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every operation path is joined onto.
    /// Default: http://127.0.0.1:5000
    #[serde(default = "ClientConfig::default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds. Unset means the HTTP client
    /// waits indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    fn default_base_url() -> String {
        "http://127.0.0.1:5000".to_string()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_ms: None,
        }
    }
}

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogRotation::Minutely => "minutely",
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        }
    }
}

impl fmt::Display for LogRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutely" => Ok(LogRotation::Minutely),
            "hourly" => Ok(LogRotation::Hourly),
            "daily" => Ok(LogRotation::Daily),
            "never" => Ok(LogRotation::Never),
            other => Err(format!(
                "unknown rotation '{}' (expected minutely, hourly, daily or never)",
                other
            )),
        }
    }
}

/// Console and rolling-file log sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` string such as `info,valop=debug`).
    /// Default: info
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Write human-readable logs to stderr.
    #[serde(default = "LoggingConfig::default_true")]
    pub console: bool,

    /// Write logs to a rolling file under `directory`.
    #[serde(default = "LoggingConfig::default_true")]
    pub file: bool,

    /// Directory for log files.
    /// Default: logs
    #[serde(default = "LoggingConfig::default_directory")]
    pub directory: PathBuf,

    /// Log file name; rolled files get a date suffix.
    /// Default: application.log
    #[serde(default = "LoggingConfig::default_file_name")]
    pub file_name: String,

    /// Default: daily
    #[serde(default = "LoggingConfig::default_rotation")]
    pub rotation: LogRotation,

    /// Number of rolled files kept before the oldest is removed.
    /// Default: 5
    #[serde(default = "LoggingConfig::default_max_files")]
    pub max_files: usize,

    /// Colorize console output.
    #[serde(default = "LoggingConfig::default_true")]
    pub ansi: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    fn default_true() -> bool {
        true
    }

    fn default_directory() -> PathBuf {
        PathBuf::from("logs")
    }

    fn default_file_name() -> String {
        "application.log".to_string()
    }

    fn default_rotation() -> LogRotation {
        LogRotation::Daily
    }

    fn default_max_files() -> usize {
        5
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            console: true,
            file: true,
            directory: Self::default_directory(),
            file_name: Self::default_file_name(),
            rotation: Self::default_rotation(),
            max_files: Self::default_max_files(),
            ansi: true,
        }
    }
}
