//! Listing entries and single-path metadata.

use std::cmp::Ordering;
use std::time::SystemTime;

use super::classify::Classification;

/// Metadata about one file or directory, addressed by its root-relative path.
///
/// Directory sizes are reported as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    name: String,
    relative_path: String,
    is_dir: bool,
    size: u64,
    modified: Option<SystemTime>,
}

impl FileInfo {
    pub fn new(name: String, relative_path: String, metadata: &std::fs::Metadata) -> Self {
        let is_dir = metadata.is_dir();
        Self {
            name,
            relative_path,
            is_dir,
            size: if is_dir { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
        }
    }

    /// Last path component; empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root-relative path with `/` separators.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// File size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Last-modified time, if the platform reports one.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }
}

/// One child in a directory listing.
///
/// `DirEntry` is immutable: it is built once per listing call with its
/// classification already attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    info: FileInfo,
    classification: Classification,
}

impl DirEntry {
    /// Wraps metadata with its classification. Directories are always
    /// [`Classification::Other`].
    pub fn new(info: FileInfo, classification: Classification) -> Self {
        let classification = if info.is_dir {
            Classification::Other
        } else {
            classification
        };
        Self {
            info,
            classification,
        }
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn relative_path(&self) -> &str {
        self.info.relative_path()
    }

    pub fn is_dir(&self) -> bool {
        self.info.is_dir()
    }

    pub fn size(&self) -> u64 {
        self.info.size()
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.info.modified()
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn is_text(&self) -> bool {
        self.classification == Classification::Text
    }

    pub fn is_image(&self) -> bool {
        self.classification == Classification::Image
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }
}

/// Directories first, then case-insensitive name; raw name breaks ties so
/// the order is total.
pub fn listing_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}
