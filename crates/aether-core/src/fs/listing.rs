//! Directory listing and single-path metadata.

use std::fs;
use std::io::ErrorKind;

use crate::config::RootConfig;
use crate::error::{CoreError, CoreResult};
use crate::fs::classify::{classify, Classification};
use crate::fs::entry::{listing_order, DirEntry, FileInfo};
use crate::fs::path::{confine, relative_join, resolve_visible, target_is_visible};

/// Lists the immediate children of a root-relative directory.
///
/// Hidden names are skipped, as are children whose metadata cannot be read
/// and symlinks that lead outside the root or onto a hidden entry. Files are
/// classified; the result is sorted directories-first, then by
/// case-insensitive name.
///
/// # Errors
///
/// - [`CoreError::Traversal`] if the path leaves the root.
/// - [`CoreError::NotFound`] if it does not exist, is hidden, or is not a directory.
/// - [`CoreError::Io`] if the directory itself cannot be read.
pub fn list_directory(config: &RootConfig, relative: &str) -> CoreResult<Vec<DirEntry>> {
    let resolved = resolve_visible(config, relative)?;
    let dir = confine(config, &resolved)?;
    if !dir.is_dir() {
        return Err(CoreError::NotFound(resolved.input().to_string()));
    }

    let read_dir = fs::read_dir(&dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CoreError::NotFound(resolved.input().to_string()),
        _ => CoreError::Io(e),
    })?;

    let mut entries = Vec::new();

    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if config.is_hidden(&name) {
            continue;
        }

        let path = dir_entry.path();
        let is_symlink = dir_entry
            .file_type()
            .map(|ft| ft.is_symlink())
            .unwrap_or(false);
        if is_symlink && !target_is_visible(config, &path) {
            tracing::debug!("skipping symlink to hidden or outside target: {}", path.display());
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("skipping unreadable entry {}: {e}", path.display());
                continue;
            }
        };

        let relative_path = relative_join(resolved.relative(), &name);
        let classification = if metadata.is_dir() {
            Classification::Other
        } else {
            classify(config, &path)
        };
        entries.push(DirEntry::new(
            FileInfo::new(name, relative_path, &metadata),
            classification,
        ));
    }

    entries.sort_by(listing_order);
    Ok(entries)
}

/// Returns metadata for a single root-relative path (file or directory).
///
/// # Errors
///
/// - [`CoreError::Traversal`] if the path leaves the root.
/// - [`CoreError::NotFound`] if it does not exist or is hidden.
pub fn file_info(config: &RootConfig, relative: &str) -> CoreResult<FileInfo> {
    let resolved = resolve_visible(config, relative)?;
    let target = confine(config, &resolved)?;
    let metadata = fs::metadata(&target)?;
    Ok(FileInfo::new(
        resolved.name().to_string(),
        resolved.relative().to_string(),
        &metadata,
    ))
}
