//! Console and rolling-file log sinks.
//!
//! Both sinks share one `EnvFilter`. Lines carry timestamp, thread name,
//! level, and target ahead of the message. The file sink is written from a
//! background thread; keep the returned [`LogGuard`] alive until exit or
//! buffered lines are lost.

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};
use valconf::{LogRotation, LoggingConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        source: ParseError,
    },

    #[error("Failed to create log directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open rolling log file: {0}")]
    Appender(#[from] InitError),

    #[error("Failed to install global subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Flushes the file sink on drop.
#[must_use = "dropping the guard stops the file writer"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<LogGuard, LoggingError> {
    let filter = build_filter(&config.level)?;

    let console = config.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_thread_names(true)
            .with_target(true)
    });

    let (file, guard) = if config.file {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(config)?);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_thread_names(true)
            .with_target(true);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    tracing::debug!(
        level = %config.level,
        file = config.file,
        directory = %config.directory.display(),
        "logging initialized"
    );

    Ok(LogGuard { _file: guard })
}

/// Parse a level or full filter directive.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        directive: level.to_string(),
        source,
    })
}

/// Rolling appender for `config.directory`, creating the directory first.
///
/// `application.log` rolls to `application.<date>.log`; at most
/// `max_files` files are kept (0 keeps everything).
pub fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender, LoggingError> {
    std::fs::create_dir_all(&config.directory).map_err(|source| LoggingError::Directory {
        path: config.directory.clone(),
        source,
    })?;

    let (prefix, suffix) = split_file_name(&config.file_name);

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation(config.rotation))
        .filename_prefix(prefix);
    if let Some(suffix) = suffix {
        builder = builder.filename_suffix(suffix);
    }
    if config.max_files > 0 {
        builder = builder.max_log_files(config.max_files);
    }

    Ok(builder.build(&config.directory)?)
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}

fn split_file_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((prefix, suffix)) if !prefix.is_empty() && !suffix.is_empty() => (prefix, Some(suffix)),
        _ => (file_name, None),
    }
}
