use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::application::data::LogLevel;

/// One-way periodic mirror of a source directory into a replica directory.
///
/// Synchronization stops once a file named `stop_sync.txt` is placed directly
/// inside the source directory.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Directory whose contents are mirrored
    pub source: PathBuf,

    /// Directory made identical to the source; created when missing
    pub replica: PathBuf,

    /// Seconds to wait between passes (positive, may be fractional)
    #[clap(value_parser = parse_interval)]
    pub interval: Duration,

    /// File that every log event is appended to
    pub log_file: PathBuf,

    #[clap(long, short, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

fn parse_interval(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("interval must be a positive number, got {raw}"));
    }
    Duration::try_from_secs_f64(seconds).map_err(|err| format!("invalid interval {raw}: {err}"))
}
