//! Filesystem primitives used by the reconciler.
//!
//! A directory is read into a [`DirectoryListing`], a sorted snapshot of its
//! direct children. Files carry a [`FileFingerprint`] (size and modification
//! time) which is the only thing used to decide whether a replica copy is stale.
//! All reads and writes go through the [`Filesystem`] trait so a pass can be run
//! against a wrapped or failing implementation.

mod fingerprint;
mod local;
mod tree;

pub use fingerprint::FileFingerprint;
pub use local::{Filesystem, LocalFilesystem};
pub use tree::{DirectoryListing, FilesystemNode};
