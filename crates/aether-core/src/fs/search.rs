//! Recursive, case-insensitive name search over the whole root.

use std::fs;
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use unicode_normalization::UnicodeNormalization;

use crate::config::RootConfig;
use crate::error::{CoreError, CoreResult};
use crate::fs::path::{relative_join, target_is_visible};

/// A file or directory whose name contains the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    /// Root-relative, `/`-separated.
    pub relative_path: String,
    pub is_dir: bool,
}

/// Hits in traversal order, and whether the hit cap stopped the walk early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub truncated: bool,
}

/// Walks the root and returns every visible entry whose name contains `query`.
///
/// Matching is case-insensitive and Unicode-normalized (NFC), so decomposed
/// names found on macOS volumes match composed queries. A blank query returns
/// nothing without touching the filesystem.
///
/// Hidden names are neither reported nor descended into. Symlinked
/// directories are reported but never followed, and symlinks leading outside
/// the root or onto a hidden entry are ignored. Unreadable directories are
/// skipped.
///
/// # Errors
///
/// Only [`CoreError::Cancelled`], when `cancel` fires during the walk.
pub fn search(
    config: &RootConfig,
    query: &str,
    cancel: &CancellationToken,
) -> CoreResult<SearchOutcome> {
    let needle = fold(query.trim());
    if needle.is_empty() {
        return Ok(SearchOutcome::default());
    }

    let limit = config.max_search_results();
    let mut hits = Vec::new();
    let mut pending: Vec<(PathBuf, String)> = vec![(config.root_dir().to_path_buf(), String::new())];

    while let Some((dir, dir_rel)) = pending.pop() {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        let read_dir = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::debug!("search skipping {}: {e}", dir.display());
                continue;
            }
        };

        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(_) => continue,
            };

            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if config.is_hidden(&name) {
                continue;
            }

            let file_type = match dir_entry.file_type() {
                Ok(ft) => ft,
                Err(_) => continue,
            };
            let path = dir_entry.path();
            let is_dir = if file_type.is_symlink() {
                if !target_is_visible(config, &path) {
                    continue;
                }
                path.is_dir()
            } else {
                file_type.is_dir()
            };

            let relative_path = relative_join(&dir_rel, &name);

            if file_type.is_dir() {
                pending.push((path, relative_path.clone()));
            }

            if fold(&name).contains(&needle) {
                hits.push(SearchHit {
                    name,
                    relative_path,
                    is_dir,
                });
                if limit > 0 && hits.len() >= limit {
                    tracing::debug!(query, limit, "search hit cap reached");
                    return Ok(SearchOutcome {
                        hits,
                        truncated: true,
                    });
                }
            }
        }
    }

    tracing::debug!(query, hits = hits.len(), "search finished");
    Ok(SearchOutcome {
        hits,
        truncated: false,
    })
}

fn fold(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}
