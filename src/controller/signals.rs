use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reconciler::STOP_MARKER_NAME;

/// Condition polled by the controller before every pass
pub trait StopSignal {
    fn is_raised(&self) -> bool;
}

/// Wait between two passes
pub trait Pause {
    async fn pause(&self, duration: Duration);
}

/// Stop signal raised by the presence of the marker file in the source root.
/// The marker's content is irrelevant.
#[derive(Debug, Clone)]
pub struct StopMarker {
    path: PathBuf,
}

impl StopMarker {
    pub fn in_source(source_root: &Path) -> Self {
        Self {
            path: source_root.join(STOP_MARKER_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StopSignal for StopMarker {
    fn is_raised(&self) -> bool {
        self.path.symlink_metadata().is_ok()
    }
}

/// Plain, uninterruptible sleep on the runtime timer
#[derive(Debug, Clone, Copy, Default)]
pub struct Sleep;

impl Pause for Sleep {
    async fn pause(&self, duration: Duration) {
        compio::time::sleep(duration).await;
    }
}
