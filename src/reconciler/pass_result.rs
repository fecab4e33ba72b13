use std::path::PathBuf;
use std::time::Duration;

use derive_more::Display;
use snafu::Snafu;
use tracing::error;

/// A single filesystem operation performed during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SyncOperation {
    #[display("list directory")]
    List,
    #[display("create directory")]
    CreateDirectory,
    #[display("copy file")]
    CopyFile,
    #[display("overwrite file")]
    OverwriteFile,
    #[display("remove file")]
    RemoveFile,
    #[display("remove directory")]
    RemoveDirectory,
}

/// Failure of one operation on one entry. The rest of the pass is unaffected.
#[derive(Debug, Snafu)]
#[snafu(display("Failed to {operation} {}", path.display()))]
pub struct EntryError {
    pub path: PathBuf,
    pub operation: SyncOperation,
    pub source: std::io::Error,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Default)]
pub struct PassResult {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failures: Vec<EntryError>,
    pub elapsed: Duration,
}

impl PassResult {
    /// Number of entries created, updated or deleted
    pub fn changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records a failed operation and emits its single error event.
    pub(crate) fn record_failure(&mut self, failure: EntryError) {
        error!(
            operation = %failure.operation,
            path = %failure.path.display(),
            "{}: {}",
            failure,
            failure.source
        );
        self.failures.push(failure);
    }
}
