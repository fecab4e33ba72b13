//! Fixtures shared by the unit tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::filesystem::{DirectoryListing, Filesystem, LocalFilesystem};

/// Content of a tree, keyed by path relative to its root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    File(Vec<u8>),
    Directory,
}

pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Snapshot> {
    let mut entries = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).expect("Failed to read directory") {
            let path = entry.expect("Failed to read entry").path();
            let relative = path
                .strip_prefix(root)
                .expect("Entry outside of root")
                .to_path_buf();
            if path.is_dir() {
                entries.insert(relative, Snapshot::Directory);
                pending.push(path);
            } else {
                entries.insert(
                    relative,
                    Snapshot::File(fs::read(&path).expect("Failed to read file")),
                );
            }
        }
    }

    entries
}

pub fn write_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, contents).expect("Failed to write file");
}

pub fn modified_time(path: impl AsRef<Path>) -> SystemTime {
    path.as_ref()
        .metadata()
        .and_then(|metadata| metadata.modified())
        .expect("Failed to read modification time")
}

pub fn set_modified_time(path: impl AsRef<Path>, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(time))
        .expect("Failed to set modification time");
}

/// Local filesystem that rejects every operation touching one path
#[derive(Debug, Clone)]
pub struct FailingFilesystem {
    fails_at: PathBuf,
}

impl FailingFilesystem {
    pub fn failing_at(path: impl Into<PathBuf>) -> Self {
        Self {
            fails_at: path.into(),
        }
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if path == self.fails_at {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected failure",
            ))
        } else {
            Ok(())
        }
    }
}

impl Filesystem for FailingFilesystem {
    async fn list_source(&self, dir: &Path) -> io::Result<DirectoryListing> {
        self.check(dir)?;
        LocalFilesystem.list_source(dir).await
    }

    async fn list_replica(&self, dir: &Path) -> io::Result<Option<DirectoryListing>> {
        self.check(dir)?;
        LocalFilesystem.list_replica(dir).await
    }

    async fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        LocalFilesystem.create_dir(path).await
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.check(to)?;
        LocalFilesystem.copy_file(from, to).await
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        LocalFilesystem.remove_file(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        LocalFilesystem.remove_dir_all(path).await
    }
}
