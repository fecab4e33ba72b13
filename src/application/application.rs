use std::sync::Arc;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{ConfigValidationError, LoggingSetupError, SyncConfig, init_logging};
use crate::cli::Cli;
use crate::controller::{Controller, RunReport, Sleep, StopMarker};
use crate::filesystem::LocalFilesystem;
use crate::reconciler::Reconciler;

pub struct Application;

impl Application {
    /// Sets up logging, validates the configuration and runs the controller
    /// until the stop marker appears.
    pub async fn run(cli_args: Cli) -> Result<RunReport, ApplicationError> {
        init_logging(&cli_args.log_file, cli_args.log_level).context(LoggingSnafu)?;
        debug!("Parsed CLI arguments: {cli_args:?}");

        let config = Arc::new(SyncConfig::try_from(cli_args).context(ConfigSnafu)?);
        let stop_marker = StopMarker::in_source(&config.source);
        info!(
            source = %config.source.display(),
            replica = %config.replica.display(),
            interval_secs = config.interval.as_secs_f64(),
            log_file = %config.log_file.display(),
            stop_marker = %stop_marker.path().display(),
            "Starting synchronization"
        );

        let controller = Controller::new(
            config,
            Reconciler::new(LocalFilesystem),
            stop_marker,
            Sleep,
        );
        Ok(controller.run().await)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while setting up logging"))]
    LoggingError { source: LoggingSetupError },
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigValidationError },
}
