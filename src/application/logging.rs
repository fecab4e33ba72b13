use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use snafu::prelude::*;
use supports_color::Stream;
use tracing::Subscriber;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::application::data::LogLevel;
use crate::ext::BestEffortPathExt;

/// Opens the log file for appending, creating it when missing.
pub fn open_log_file(path: &Path) -> Result<File, LoggingSetupError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(LogFileSnafu {
            path: path.best_effort_path_display(),
        })
}

/// Installs the global subscriber: every event goes to stdout and is appended
/// to the log file. The log file is opened even when logging is silenced, so an
/// unusable destination is still reported before any pass runs.
pub fn init_logging(log_file: &Path, level: LogLevel) -> Result<(), LoggingSetupError> {
    let file = open_log_file(log_file)?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_ansi(supports_color::on(Stream::Stdout).is_some());

    tracing_subscriber::registry()
        .with(level.to_level_filter())
        .with(stdout_layer)
        .with(file_layer(file))
        .try_init()
        .context(SubscriberSnafu)
}

/// Plain-text layer writing timestamped lines into the log file
pub fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
}

#[derive(Debug, Snafu)]
pub enum LoggingSetupError {
    #[snafu(display("Cannot open log file {path} for appending"))]
    LogFileError { path: String, source: std::io::Error },
    #[snafu(display("A global log subscriber is already installed"))]
    SubscriberError { source: TryInitError },
}
