//! Server settings loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. [`Settings`] is the raw, user-editable form; it is
//! validated into a [`super::RootConfig`] before any filesystem access happens.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub filesystem: FilesystemSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

impl Settings {
    /// Loads settings from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    /// - [`CoreError::Io`] for any other read failure.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.display().to_string()),
            _ => CoreError::Io(e),
        })?;
        Self::parse(&content)
    }

    /// Parses settings from TOML text.
    pub fn parse(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Which directory is served and which names inside it stay invisible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesystemSettings {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Glob patterns matched against single entry names (`*.pyc`, `.git`).
    #[serde(default = "default_hidden")]
    pub hidden: Vec<String>,
}

impl Default for FilesystemSettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            hidden: default_hidden(),
        }
    }
}

/// Text and image preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSettings {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_text_extensions")]
    pub text_extensions: Vec<String>,
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            text_extensions: default_text_extensions(),
            image_extensions: default_image_extensions(),
        }
    }
}

/// Global name search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Stop collecting after this many hits. `0` disables the cap.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("AetherServe_Files")
}

fn default_hidden() -> Vec<String> {
    [".git", ".gitignore", ".env", "__pycache__", "*.pyc", "venv", ".DS_Store"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_text_extensions() -> Vec<String> {
    [
        "txt", "log", "md", "json", "xml", "html", "css", "js", "py", "java", "php", "c", "cpp",
        "h", "sh", "conf", "ini", "yml", "yaml", "sql", "csv", "tsv", "bat", "ps1", "go", "rb",
        "pl", "swift", "kt", "ts", "jsx", "tsx", "vue", "scss", "less", "sgmodule", "rs", "toml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_results() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.filesystem.root, PathBuf::from("AetherServe_Files"));
        assert!(settings.filesystem.hidden.contains(&".git".to_string()));
        assert!(settings.filesystem.hidden.contains(&"*.pyc".to_string()));
        assert_eq!(settings.preview.max_bytes, 5 * 1024 * 1024);
        assert!(settings.preview.text_extensions.contains(&"md".to_string()));
        assert!(settings.preview.text_extensions.contains(&"sgmodule".to_string()));
        assert!(!settings.filesystem.hidden.contains(&"README.md".to_string()));
        assert!(settings.preview.image_extensions.contains(&"png".to_string()));
        assert_eq!(settings.search.max_results, 1000);
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("aether.toml");
        fs::write(
            &path,
            r#"
[filesystem]
root = "/srv/share"
hidden = ["secret_*"]

[preview]
max_bytes = 1024
text_extensions = [".TXT", "md"]
image_extensions = ["png"]

[search]
max_results = 0
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.filesystem.root, PathBuf::from("/srv/share"));
        assert_eq!(settings.filesystem.hidden, vec!["secret_*".to_string()]);
        assert_eq!(settings.preview.max_bytes, 1024);
        assert_eq!(settings.preview.text_extensions, vec![".TXT", "md"]);
        assert_eq!(settings.preview.image_extensions, vec!["png"]);
        assert_eq!(settings.search.max_results, 0);
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let settings = Settings::parse("[preview]\nmax_bytes = 10\n").unwrap();

        assert_eq!(settings.preview.max_bytes, 10);
        assert_eq!(settings.preview.text_extensions, default_text_extensions());
        assert_eq!(settings.filesystem.hidden, default_hidden());
        assert_eq!(settings.search.max_results, 1000);
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.preview.max_bytes, default_max_bytes());
        assert_eq!(settings.filesystem.root, default_root());
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Settings::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let result = Settings::parse("this is not valid [[[toml");
        assert!(matches!(result.unwrap_err(), CoreError::ConfigParse(_)));
    }
}
