//! The validated, immutable configuration every core operation receives.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::settings::Settings;
use crate::error::{CoreError, CoreResult};

/// Process-wide view of the served directory.
///
/// Built once at startup by [`RootConfig::from_settings`] and never mutated.
/// The root is stored in canonical form, so both lexical and post-symlink
/// containment checks compare against the same path.
#[derive(Debug, Clone)]
pub struct RootConfig {
    root_dir: PathBuf,
    max_preview_bytes: u64,
    max_search_results: usize,
    text_extensions: BTreeSet<String>,
    image_extensions: BTreeSet<String>,
    hidden_patterns: Vec<String>,
    hidden: GlobSet,
}

impl RootConfig {
    /// Validates `settings` and prepares the root directory.
    ///
    /// A missing root is created. Extensions are lowercased and stored
    /// without their leading dot.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ConfigParse`] for a zero preview size, an invalid hidden
    ///   glob, or a root that exists but is not a directory.
    /// - [`CoreError::Io`] if the root cannot be created or canonicalized.
    pub fn from_settings(settings: &Settings) -> CoreResult<Self> {
        if settings.preview.max_bytes == 0 {
            return Err(CoreError::ConfigParse(
                "preview.max_bytes must be positive".to_string(),
            ));
        }

        let root_dir = prepare_root(&settings.filesystem.root)?;

        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.filesystem.hidden {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| CoreError::ConfigParse(format!("hidden pattern {pattern:?}: {e}")))?;
            builder.add(glob);
        }
        let hidden = builder
            .build()
            .map_err(|e| CoreError::ConfigParse(e.to_string()))?;

        Ok(Self {
            root_dir,
            max_preview_bytes: settings.preview.max_bytes,
            max_search_results: settings.search.max_results,
            text_extensions: normalize_extensions(&settings.preview.text_extensions),
            image_extensions: normalize_extensions(&settings.preview.image_extensions),
            hidden_patterns: settings.filesystem.hidden.clone(),
            hidden,
        })
    }

    /// Canonical absolute path of the served directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn max_preview_bytes(&self) -> u64 {
        self.max_preview_bytes
    }

    /// Hit cap for global search; `0` means unlimited.
    pub fn max_search_results(&self) -> usize {
        self.max_search_results
    }

    pub fn hidden_patterns(&self) -> &[String] {
        &self.hidden_patterns
    }

    /// Returns `true` if a single entry name matches any hidden pattern.
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.is_match(name)
    }

    /// Returns `true` if any `/`-separated component of a root-relative path is hidden.
    pub fn is_hidden_path(&self, relative: &str) -> bool {
        relative
            .split('/')
            .filter(|c| !c.is_empty())
            .any(|c| self.is_hidden(c))
    }

    /// Case-insensitive membership in the text extension list.
    pub fn is_text_extension(&self, ext: &str) -> bool {
        self.text_extensions.contains(&ext.to_lowercase())
    }

    /// Case-insensitive membership in the image extension list.
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions.contains(&ext.to_lowercase())
    }
}

fn prepare_root(root: &Path) -> CoreResult<PathBuf> {
    let absolute = std::path::absolute(root)?;
    if !absolute.exists() {
        std::fs::create_dir_all(&absolute)?;
        tracing::info!("created root directory {}", absolute.display());
    } else if !absolute.is_dir() {
        return Err(CoreError::ConfigParse(format!(
            "root is not a directory: {}",
            absolute.display()
        )));
    }
    Ok(absolute.canonicalize()?)
}

fn normalize_extensions(exts: &[String]) -> BTreeSet<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
