use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use snafu::prelude::*;

use crate::cli::Cli;
use crate::ext::BestEffortPathExt;

/// Immutable settings of one synchronization run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub interval: Duration,
    pub log_file: PathBuf,
}

impl SyncConfig {
    /// Validates the roots and the interval.
    ///
    /// Both roots are made absolute. A missing replica root is created; an
    /// existing replica must be a directory. The trees may not contain each other.
    pub fn validated(
        source: PathBuf,
        replica: PathBuf,
        interval: Duration,
        log_file: PathBuf,
    ) -> Result<Self, ConfigValidationError> {
        ensure!(!interval.is_zero(), NonPositiveIntervalSnafu);

        let source = source.best_effort_absolute();
        ensure!(
            source.is_dir(),
            SourceNotDirectorySnafu {
                path: source.display().to_string(),
            }
        );

        let replica = replica.best_effort_absolute();
        ensure!(
            !source.starts_with(&replica) && !replica.starts_with(&source),
            OverlappingTreesSnafu {
                source_root: source.display().to_string(),
                replica_root: replica.display().to_string(),
            }
        );

        match fs::metadata(&replica) {
            Ok(metadata) => ensure!(
                metadata.is_dir(),
                ReplicaNotDirectorySnafu {
                    path: replica.display().to_string(),
                }
            ),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&replica).context(ReplicaCreationSnafu {
                    path: replica.display().to_string(),
                })?;
            }
            Err(err) => {
                return Err(err).context(ReplicaCreationSnafu {
                    path: replica.display().to_string(),
                });
            }
        }

        Ok(Self {
            source,
            replica: replica.best_effort_absolute(),
            interval,
            log_file: log_file.best_effort_absolute(),
        })
    }
}

impl TryFrom<Cli> for SyncConfig {
    type Error = ConfigValidationError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        Self::validated(cli.source, cli.replica, cli.interval, cli.log_file)
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigValidationError {
    #[snafu(display("Synchronization interval must be a positive number of seconds"))]
    NonPositiveIntervalError,
    #[snafu(display("Source {path} does not exist or is not a directory"))]
    SourceNotDirectoryError { path: String },
    #[snafu(display("Replica {path} exists but is not a directory"))]
    ReplicaNotDirectoryError { path: String },
    #[snafu(display("Replica directory {path} cannot be created"))]
    ReplicaCreationError { path: String, source: io::Error },
    #[snafu(display("Source {source_root} and replica {replica_root} must not contain each other"))]
    OverlappingTreesError {
        source_root: String,
        replica_root: String,
    },
}
