use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs::Metadata;

use derive_more::Display;

use crate::filesystem::FileFingerprint;

/// Kind of a filesystem node, without any of its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
}

/// Represents the type of a filesystem node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilesystemNode {
    File(FileFingerprint),
    Directory,
}

impl FilesystemNode {
    /// Classifies an entry. Anything that is not a directory (regular files,
    /// unfollowed symbolic links, special files) is treated as a file.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            FilesystemNode::Directory
        } else {
            FilesystemNode::File(FileFingerprint::from_metadata(metadata))
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FilesystemNode::File(_) => NodeKind::File,
            FilesystemNode::Directory => NodeKind::Directory,
        }
    }
}

/// The direct children of a single directory, keyed by name.
///
/// Names are kept sorted so that walking the same snapshot twice visits the
/// entries in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    children: BTreeMap<OsString, FilesystemNode>,
}

impl DirectoryListing {
    pub fn insert(&mut self, name: impl Into<OsString>, node: FilesystemNode) {
        self.children.insert(name.into(), node);
    }

    pub fn get(&self, name: &OsStr) -> Option<&FilesystemNode> {
        self.children.get(name)
    }

    pub fn contains(&self, name: &OsStr) -> bool {
        self.children.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &FilesystemNode)> {
        self.children
            .iter()
            .map(|(name, node)| (name.as_os_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn file(size: u64) -> FilesystemNode {
        FilesystemNode::File(FileFingerprint::new(
            size,
            Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1)),
        ))
    }

    #[test]
    fn test_listing_iterates_in_name_order() {
        let mut listing = DirectoryListing::default();
        listing.insert("zeta", file(1));
        listing.insert("alpha", FilesystemNode::Directory);
        listing.insert("mid", file(2));

        let names: Vec<_> = listing.iter().map(|(name, _)| name.to_owned()).collect();

        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(listing.len(), 3);
    }

    #[test]
    fn test_listing_lookup() {
        let mut listing = DirectoryListing::default();
        assert!(listing.is_empty());

        listing.insert("dir", FilesystemNode::Directory);

        assert!(listing.contains(OsStr::new("dir")));
        assert!(!listing.contains(OsStr::new("missing")));
        assert_eq!(
            listing.get(OsStr::new("dir")).map(FilesystemNode::kind),
            Some(NodeKind::Directory)
        );
    }

    #[test]
    fn test_node_from_metadata() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("file.txt");
        std::fs::write(&file_path, "four").expect("Failed to write file");

        let dir_node = FilesystemNode::from_metadata(
            &temp_dir.path().metadata().expect("Failed to stat directory"),
        );
        let file_node =
            FilesystemNode::from_metadata(&file_path.metadata().expect("Failed to stat file"));

        assert_eq!(dir_node, FilesystemNode::Directory);
        match file_node {
            FilesystemNode::File(fingerprint) => assert_eq!(fingerprint.size(), 4),
            FilesystemNode::Directory => panic!("Expected a file node"),
        }
    }

    #[test]
    fn test_node_kind_display() {
        assert_eq!(NodeKind::File.to_string(), "file");
        assert_eq!(NodeKind::Directory.to_string(), "directory");
    }
}
