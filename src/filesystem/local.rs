use std::fs as std_fs;
use std::io;
use std::path::Path;

use compio::fs;
use tracing::debug;

use crate::filesystem::{DirectoryListing, FilesystemNode};

const STAGING_PREFIX: &str = ".mirrorsync-";
const STAGING_SUFFIX: &str = ".partial";

/// The filesystem operations a reconciliation pass needs.
///
/// Every call targets a single entry and reports its own failure, so a caller
/// can record the error against that entry and move on.
pub trait Filesystem {
    /// Lists a source directory. Symbolic links are followed when classifying
    /// entries; a dangling link is reported as a file.
    async fn list_source(&self, dir: &Path) -> io::Result<DirectoryListing>;

    /// Lists a replica directory without following symbolic links.
    /// Returns `None` when the directory does not exist.
    async fn list_replica(&self, dir: &Path) -> io::Result<Option<DirectoryListing>>;

    async fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Copies `from` over `to`, preserving the modification time and the
    /// permission bits of `from`.
    async fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`Filesystem`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    async fn list_source(&self, dir: &Path) -> io::Result<DirectoryListing> {
        read_listing(dir, true)
    }

    async fn list_replica(&self, dir: &Path) -> io::Result<Option<DirectoryListing>> {
        match read_listing(dir, false) {
            Ok(listing) => Ok(Some(listing)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path).await
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let metadata = std_fs::metadata(from)?;
        let bytes = fs::read(from).await?;

        // Write next to the destination and rename over it, so a failed copy never
        // leaves a truncated replica file behind and read-only targets can be replaced.
        // The staging file gets a fresh exclusive name and is removed when dropped.
        let parent = to.parent().unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(parent)?;
        debug!(
            "Staging copy of {} at {}",
            from.display(),
            staging.path().display()
        );

        fs::write(staging.path(), bytes).await.0?;
        if let Ok(modified) = metadata.modified() {
            staging.as_file().set_modified(modified)?;
        }
        std_fs::set_permissions(staging.path(), metadata.permissions())?;

        staging.persist(to).map_err(|err| err.error)?;
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std_fs::remove_dir_all(path)
    }
}

fn read_listing(dir: &Path, follow_links: bool) -> io::Result<DirectoryListing> {
    let mut listing = DirectoryListing::default();

    for entry in std_fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let metadata = if follow_links {
            std_fs::metadata(&path).or_else(|_| entry.metadata())
        } else {
            entry.metadata()
        };

        match metadata {
            Ok(metadata) => {
                listing.insert(entry.file_name(), FilesystemNode::from_metadata(&metadata))
            }
            // Removed between reading the directory and inspecting the entry
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Entry {} vanished while listing", path.display());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(listing)
}
