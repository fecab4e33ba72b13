mod pass_result;
mod reconciler;

pub use pass_result::{EntryError, PassResult, SyncOperation};
pub use reconciler::{Reconciler, STOP_MARKER_NAME};
