use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::filesystem::{DirectoryListing, Filesystem, FilesystemNode};
use crate::reconciler::{EntryError, PassResult, SyncOperation};

/// Reserved name of the stop marker inside the source root. It is never
/// mirrored and never removed from the replica root.
pub const STOP_MARKER_NAME: &str = "stop_sync.txt";

/// A pair of directories still to be reconciled
#[derive(Debug)]
struct PendingDirectory {
    source: PathBuf,
    replica: PathBuf,
    /// The replica directory was created during this pass, so it is known to be empty
    replica_is_new: bool,
    top_level: bool,
}

/// Makes a replica tree mirror a source tree in a single pass.
///
/// The walk uses an explicit work list instead of recursion. At each level the
/// source and replica listings are compared by name; kind mismatches are
/// resolved before any descent. Per-entry failures are recorded in the
/// [`PassResult`] and never stop the walk.
#[derive(Debug, Clone)]
pub struct Reconciler<F> {
    filesystem: F,
}

impl<F: Filesystem> Reconciler<F> {
    pub fn new(filesystem: F) -> Self {
        Self { filesystem }
    }

    pub async fn reconcile(&self, source_root: &Path, replica_root: &Path) -> PassResult {
        let started = Instant::now();
        let mut result = PassResult::default();

        let root_exists = match self.ensure_replica_root(replica_root).await {
            Ok(exists) => exists,
            Err(failure) => {
                result.record_failure(failure);
                result.elapsed = started.elapsed();
                return result;
            }
        };

        let mut pending = vec![PendingDirectory {
            source: source_root.to_path_buf(),
            replica: replica_root.to_path_buf(),
            replica_is_new: !root_exists,
            top_level: true,
        }];

        while let Some(directory) = pending.pop() {
            self.reconcile_directory(directory, &mut pending, &mut result)
                .await;
        }

        result.elapsed = started.elapsed();
        result
    }

    /// Creates the replica root when it is missing. Returns whether it already existed.
    async fn ensure_replica_root(&self, replica_root: &Path) -> Result<bool, EntryError> {
        let listing = self
            .filesystem
            .list_replica(replica_root)
            .await
            .map_err(|source| EntryError {
                path: replica_root.to_path_buf(),
                operation: SyncOperation::List,
                source,
            })?;
        if listing.is_some() {
            return Ok(true);
        }

        info!(path = %replica_root.display(), "Replica root is missing, creating it");
        self.filesystem
            .create_dir(replica_root)
            .await
            .map_err(|source| EntryError {
                path: replica_root.to_path_buf(),
                operation: SyncOperation::CreateDirectory,
                source,
            })?;
        Ok(false)
    }

    async fn reconcile_directory(
        &self,
        directory: PendingDirectory,
        pending: &mut Vec<PendingDirectory>,
        result: &mut PassResult,
    ) {
        let source_listing = match self.filesystem.list_source(&directory.source).await {
            Ok(listing) => listing,
            Err(source) => {
                result.record_failure(EntryError {
                    path: directory.source,
                    operation: SyncOperation::List,
                    source,
                });
                return;
            }
        };

        let replica_listing = if directory.replica_is_new {
            DirectoryListing::default()
        } else {
            match self.filesystem.list_replica(&directory.replica).await {
                Ok(listing) => listing.unwrap_or_default(),
                Err(source) => {
                    result.record_failure(EntryError {
                        path: directory.replica,
                        operation: SyncOperation::List,
                        source,
                    });
                    return;
                }
            }
        };

        debug!(
            "Reconciling {}: {} source entries, {} replica entries",
            directory.source.display(),
            source_listing.len(),
            replica_listing.len()
        );

        for (name, source_node) in source_listing.iter() {
            if directory.top_level && is_stop_marker(name) {
                continue;
            }
            let source_path = directory.source.join(name);
            let replica_path = directory.replica.join(name);

            match (source_node, replica_listing.get(name)) {
                (FilesystemNode::Directory, Some(FilesystemNode::Directory)) => {
                    pending.push(PendingDirectory {
                        source: source_path,
                        replica: replica_path,
                        replica_is_new: false,
                        top_level: false,
                    });
                }
                (FilesystemNode::File(source_print), Some(FilesystemNode::File(replica_print))) => {
                    if replica_print.is_stale_against(source_print) {
                        debug!(
                            "{} is stale: size {} -> {}, modified {:?} -> {:?}",
                            replica_path.display(),
                            replica_print.size(),
                            source_print.size(),
                            replica_print.modified(),
                            source_print.modified()
                        );
                        self.overwrite_file(&source_path, &replica_path, result)
                            .await;
                    }
                }
                (_, Some(replica_node)) => {
                    debug!(
                        "Kind mismatch at {}: source is a {}, replica is a {}",
                        replica_path.display(),
                        source_node.kind(),
                        replica_node.kind()
                    );
                    let removed = self.remove_entry(&replica_path, replica_node, result).await;
                    if removed {
                        self.create_entry(source_node, source_path, replica_path, pending, result)
                            .await;
                    }
                }
                (_, None) => {
                    self.create_entry(source_node, source_path, replica_path, pending, result)
                        .await;
                }
            }
        }

        for (name, replica_node) in replica_listing.iter() {
            if directory.top_level && is_stop_marker(name) {
                continue;
            }
            if !source_listing.contains(name) {
                self.remove_entry(&directory.replica.join(name), replica_node, result)
                    .await;
            }
        }
    }

    /// Creates a replica entry that does not exist yet. New directories are
    /// queued for descent with an empty replica side.
    async fn create_entry(
        &self,
        source_node: &FilesystemNode,
        source_path: PathBuf,
        replica_path: PathBuf,
        pending: &mut Vec<PendingDirectory>,
        result: &mut PassResult,
    ) {
        match source_node {
            FilesystemNode::Directory => {
                match self.filesystem.create_dir(&replica_path).await {
                    Ok(()) => {
                        info!(
                            action = "create",
                            kind = "directory",
                            path = %replica_path.display(),
                            "Created directory"
                        );
                        result.created += 1;
                        pending.push(PendingDirectory {
                            source: source_path,
                            replica: replica_path,
                            replica_is_new: true,
                            top_level: false,
                        });
                    }
                    Err(source) => result.record_failure(EntryError {
                        path: replica_path,
                        operation: SyncOperation::CreateDirectory,
                        source,
                    }),
                }
            }
            FilesystemNode::File(_) => {
                match self.filesystem.copy_file(&source_path, &replica_path).await {
                    Ok(()) => {
                        info!(
                            action = "create",
                            kind = "file",
                            path = %replica_path.display(),
                            "Copied file"
                        );
                        result.created += 1;
                    }
                    Err(source) => result.record_failure(EntryError {
                        path: replica_path,
                        operation: SyncOperation::CopyFile,
                        source,
                    }),
                }
            }
        }
    }

    async fn overwrite_file(
        &self,
        source_path: &Path,
        replica_path: &Path,
        result: &mut PassResult,
    ) {
        match self.filesystem.copy_file(source_path, replica_path).await {
            Ok(()) => {
                info!(
                    action = "update",
                    kind = "file",
                    path = %replica_path.display(),
                    "Updated file"
                );
                result.updated += 1;
            }
            Err(source) => result.record_failure(EntryError {
                path: replica_path.to_path_buf(),
                operation: SyncOperation::OverwriteFile,
                source,
            }),
        }
    }

    /// Removes a replica entry, recursively for directories. Returns whether it succeeded.
    async fn remove_entry(
        &self,
        replica_path: &Path,
        replica_node: &FilesystemNode,
        result: &mut PassResult,
    ) -> bool {
        let (outcome, operation) = match replica_node {
            FilesystemNode::Directory => (
                self.filesystem.remove_dir_all(replica_path).await,
                SyncOperation::RemoveDirectory,
            ),
            FilesystemNode::File(_) => (
                self.filesystem.remove_file(replica_path).await,
                SyncOperation::RemoveFile,
            ),
        };

        match outcome {
            Ok(()) => {
                info!(
                    action = "delete",
                    kind = %replica_node.kind(),
                    path = %replica_path.display(),
                    "Removed from replica"
                );
                result.deleted += 1;
                true
            }
            Err(source) => {
                result.record_failure(EntryError {
                    path: replica_path.to_path_buf(),
                    operation,
                    source,
                });
                false
            }
        }
    }
}

fn is_stop_marker(name: &OsStr) -> bool {
    name == STOP_MARKER_NAME
}
