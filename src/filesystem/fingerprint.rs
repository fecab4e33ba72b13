use std::fs::Metadata;
use std::time::SystemTime;

/// Cheap change proxy for a file: its size and last modification time.
///
/// Two files with equal fingerprints are considered identical without looking
/// at their contents. A rewrite that keeps both the size and the modification
/// time is therefore not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileFingerprint {
    size: u64,
    modified: Option<SystemTime>,
}

impl FileFingerprint {
    #[cfg(test)]
    pub fn new(size: u64, modified: Option<SystemTime>) -> Self {
        Self { size, modified }
    }

    /// Platforms without modification times fall back to comparing sizes only.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn is_stale_against(&self, source: &FileFingerprint) -> bool {
        self != source
    }
}
