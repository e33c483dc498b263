use std::time::{SystemTime, UNIX_EPOCH};

use aether_core::{Breadcrumb, DirEntry, FileInfo, SearchHit};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct FileEntryDto {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub modified: Option<u64>,
    pub is_text: bool,
    pub is_image: bool,
}

impl From<&DirEntry> for FileEntryDto {
    fn from(entry: &DirEntry) -> Self {
        Self {
            name: entry.name().to_string(),
            path: entry.relative_path().to_string(),
            is_dir: entry.is_dir(),
            size: entry.size(),
            modified: unix_secs(entry.modified()),
            is_text: entry.is_text(),
            is_image: entry.is_image(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BreadcrumbDto {
    pub name: String,
    pub path: String,
}

impl From<Breadcrumb> for BreadcrumbDto {
    fn from(crumb: Breadcrumb) -> Self {
        Self {
            name: crumb.name,
            path: crumb.relative_path,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub current_path: String,
    pub parent_path: String,
    pub breadcrumbs: Vec<BreadcrumbDto>,
    pub entries: Vec<FileEntryDto>,
}

#[derive(Debug, Serialize)]
pub struct FileInfoDto {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<u64>,
    /// `directory`, `text`, `image`, or `other`.
    pub kind: &'static str,
}

impl FileInfoDto {
    pub fn new(info: &FileInfo, kind: &'static str) -> Self {
        Self {
            name: info.name().to_string(),
            path: info.relative_path().to_string(),
            is_dir: info.is_dir(),
            size: info.size(),
            modified: unix_secs(info.modified()),
            kind,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewResponse {
    Text {
        path: String,
        name: String,
        size: u64,
        content: String,
        truncated: bool,
        download_url: String,
    },
    Image {
        path: String,
        name: String,
        size: u64,
        url: String,
        width: Option<u32>,
        height: Option<u32>,
        format: Option<String>,
        download_url: String,
    },
    Download {
        path: String,
        name: String,
        size: u64,
        download_url: String,
    },
}

#[derive(Debug, Serialize)]
pub struct SearchHitDto {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

impl From<SearchHit> for SearchHitDto {
    fn from(hit: SearchHit) -> Self {
        Self {
            name: hit.name,
            path: hit.relative_path,
            is_dir: hit.is_dir,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHitDto>,
    /// More matches may exist than `results` holds.
    pub truncated: bool,
    /// The walk was cancelled by the request deadline.
    pub timed_out: bool,
}

impl SearchResponse {
    pub fn empty(query: String) -> Self {
        Self {
            query,
            results: Vec::new(),
            truncated: false,
            timed_out: false,
        }
    }
}

fn unix_secs(time: Option<SystemTime>) -> Option<u64> {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
}
