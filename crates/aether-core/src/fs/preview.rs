//! Text previews, image metadata, and opening files for download.
//!
//! Text previews are capped at [`RootConfig::max_preview_bytes`] and cut on a
//! byte boundary. A multi-byte character split by the cut decodes as U+FFFD,
//! like any other invalid sequence.

use std::fs;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::config::RootConfig;
use crate::error::{CoreError, CoreResult};
use crate::fs::classify::{classify, content_type, Classification};
use crate::fs::entry::FileInfo;
use crate::fs::path::{confine, resolve_visible, ResolvedPath};

/// Bytes read between cancellation checks.
const READ_CHUNK: usize = 64 * 1024;

/// A possibly truncated text preview of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPreview {
    /// Decoded content, at most `max_preview_bytes` bytes of the file.
    pub content: String,
    /// `true` when the file is larger than the preview cap.
    pub truncated: bool,
    /// Size of the whole file in bytes.
    pub total_size: u64,
}

/// Dimensions read from an image header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
}

/// A confined, opened regular file ready to be streamed.
#[derive(Debug)]
pub struct OpenedFile {
    pub file: fs::File,
    pub info: FileInfo,
    pub content_type: String,
    pub classification: Classification,
}

/// Reads the start of a text file for preview.
///
/// Returns an empty, untruncated preview when the file does not classify as
/// [`Classification::Text`].
///
/// # Errors
///
/// - [`CoreError::Traversal`] if the path leaves the root.
/// - [`CoreError::NotFound`] if it is not an existing, visible regular file.
/// - [`CoreError::Cancelled`] if `cancel` fires mid-read.
/// - [`CoreError::Io`] on read failures.
pub fn read_preview(
    config: &RootConfig,
    relative: &str,
    cancel: &CancellationToken,
) -> CoreResult<TextPreview> {
    let (resolved, path, metadata) = regular_file(config, relative)?;
    let total_size = metadata.len();

    if classify(config, &path) != Classification::Text {
        return Ok(TextPreview {
            content: String::new(),
            truncated: false,
            total_size,
        });
    }

    let limit = config.max_preview_bytes();
    let bytes = read_capped(&path, limit, total_size, cancel)?;
    tracing::debug!(
        path = resolved.relative(),
        bytes = bytes.len(),
        total_size,
        "read text preview"
    );

    Ok(TextPreview {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        truncated: total_size > limit,
        total_size,
    })
}

/// Reads image dimensions from the file header without decoding pixels.
///
/// Returns `Ok(None)` for formats the decoder does not know (SVG, for one).
///
/// # Errors
///
/// Same path errors as [`read_preview`].
pub fn read_image_info(config: &RootConfig, relative: &str) -> CoreResult<Option<ImageInfo>> {
    let (_, path, _) = regular_file(config, relative)?;

    let reader = match image::ImageReader::open(&path)?.with_guessed_format() {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("image format guess failed for {}: {e}", path.display());
            return Ok(None);
        }
    };
    let Some(format) = reader.format() else {
        return Ok(None);
    };
    match reader.into_dimensions() {
        Ok((width, height)) => Ok(Some(ImageInfo {
            width,
            height,
            format: format!("{format:?}"),
        })),
        Err(e) => {
            tracing::debug!("image header unreadable for {}: {e}", path.display());
            Ok(None)
        }
    }
}

/// Opens a regular file for streaming, with its metadata and MIME type.
///
/// # Errors
///
/// Same path errors as [`read_preview`].
pub fn open_file(config: &RootConfig, relative: &str) -> CoreResult<OpenedFile> {
    let (resolved, path, metadata) = regular_file(config, relative)?;
    let file = fs::File::open(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CoreError::NotFound(resolved.input().to_string()),
        _ => CoreError::Io(e),
    })?;

    Ok(OpenedFile {
        file,
        info: FileInfo::new(
            resolved.name().to_string(),
            resolved.relative().to_string(),
            &metadata,
        ),
        content_type: content_type(&path),
        classification: classify(config, &path),
    })
}

/// Resolves, confines, and checks that the target is a regular file.
fn regular_file(
    config: &RootConfig,
    relative: &str,
) -> CoreResult<(ResolvedPath, PathBuf, fs::Metadata)> {
    let resolved = resolve_visible(config, relative)?;
    let path = confine(config, &resolved)?;
    let metadata = fs::metadata(&path)?;
    if !metadata.is_file() {
        return Err(CoreError::NotFound(resolved.input().to_string()));
    }
    Ok((resolved, path, metadata))
}

fn read_capped(
    path: &Path,
    limit: u64,
    size_hint: u64,
    cancel: &CancellationToken,
) -> CoreResult<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file).take(limit);
    let mut buf = Vec::with_capacity(limit.min(size_hint) as usize);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CoreError::Io(e)),
        };
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use tempfile::TempDir;

    fn setup(max_bytes: u64) -> (TempDir, RootConfig) {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.filesystem.root = tmp.path().to_path_buf();
        settings.preview.max_bytes = max_bytes;
        let config = RootConfig::from_settings(&settings).unwrap();
        (tmp, config)
    }

    #[test]
    fn small_file_is_read_whole() {
        let (_tmp, config) = setup(64);
        fs::write(config.root_dir().join("notes.md"), "line one\nline two\n").unwrap();

        let preview = read_preview(&config, "notes.md", &CancellationToken::new()).unwrap();

        assert_eq!(preview.content, "line one\nline two\n");
        assert!(!preview.truncated);
        assert_eq!(preview.total_size, 18);
    }

    #[test]
    fn file_at_exact_cap_is_not_truncated() {
        let (_tmp, config) = setup(10);
        fs::write(config.root_dir().join("ten.txt"), "0123456789").unwrap();

        let preview = read_preview(&config, "ten.txt", &CancellationToken::new()).unwrap();

        assert_eq!(preview.content, "0123456789");
        assert!(!preview.truncated);
    }

    #[test]
    fn large_file_is_truncated_to_cap() {
        let (_tmp, config) = setup(100);
        let body = "abcdefghij".repeat(50);
        fs::write(config.root_dir().join("big.log"), &body).unwrap();

        let preview = read_preview(&config, "big.log", &CancellationToken::new()).unwrap();

        assert!(preview.truncated);
        assert_eq!(preview.content.len(), 100);
        assert_eq!(preview.content, &body[..100]);
        assert_eq!(preview.total_size, 500);
    }

    #[test]
    fn large_file_spanning_many_chunks_is_truncated_to_cap() {
        let cap = (READ_CHUNK * 2 + 17) as u64;
        let (_tmp, config) = setup(cap);
        let body = "x".repeat(READ_CHUNK * 3);
        fs::write(config.root_dir().join("huge.txt"), &body).unwrap();

        let preview = read_preview(&config, "huge.txt", &CancellationToken::new()).unwrap();

        assert!(preview.truncated);
        assert_eq!(preview.content.len() as u64, cap);
    }

    #[test]
    fn split_multibyte_char_becomes_replacement() {
        let (_tmp, config) = setup(4);
        // "ab" + "한" (3 bytes): the cap lands inside the Hangul character.
        fs::write(config.root_dir().join("ko.txt"), "ab한글").unwrap();

        let preview = read_preview(&config, "ko.txt", &CancellationToken::new()).unwrap();

        assert!(preview.truncated);
        assert!(preview.content.starts_with("ab"));
        assert!(preview.content.ends_with('\u{FFFD}'));
    }

    #[test]
    fn invalid_bytes_are_replaced_not_rejected() {
        let (_tmp, config) = setup(64);
        fs::write(config.root_dir().join("mixed.log"), [b'o', b'k', 0xFF, 0x00, b'!']).unwrap();

        let preview = read_preview(&config, "mixed.log", &CancellationToken::new()).unwrap();

        assert!(preview.content.starts_with("ok"));
        assert!(preview.content.contains('\u{FFFD}'));
        assert!(!preview.truncated);
    }

    #[test]
    fn non_text_file_yields_empty_preview() {
        let (_tmp, config) = setup(64);
        fs::write(config.root_dir().join("photo.png"), [0x89, b'P', b'N', b'G', 0x0D, 0x0A]).unwrap();

        let preview = read_preview(&config, "photo.png", &CancellationToken::new()).unwrap();

        assert_eq!(preview.content, "");
        assert!(!preview.truncated);
        assert_eq!(preview.total_size, 6);
    }

    #[test]
    fn directory_and_missing_are_not_found() {
        let (_tmp, config) = setup(64);
        fs::create_dir(config.root_dir().join("docs")).unwrap();
        let token = CancellationToken::new();

        assert!(matches!(
            read_preview(&config, "docs", &token).unwrap_err(),
            CoreError::NotFound(_)
        ));
        assert!(matches!(
            read_preview(&config, "nope.txt", &token).unwrap_err(),
            CoreError::NotFound(_)
        ));
    }

    #[test]
    fn traversal_is_rejected() {
        let (_tmp, config) = setup(64);
        let err = read_preview(&config, "../../etc/passwd", &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, CoreError::Traversal(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_onto_hidden_file_cannot_be_read_or_opened() {
        let (_tmp, config) = setup(64);
        fs::write(config.root_dir().join(".env"), "SECRET=hunter2").unwrap();
        std::os::unix::fs::symlink(
            config.root_dir().join(".env"),
            config.root_dir().join("settings.txt"),
        )
        .unwrap();

        let err = read_preview(&config, "settings.txt", &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert!(matches!(
            open_file(&config, "settings.txt").unwrap_err(),
            CoreError::NotFound(_)
        ));
    }

    #[test]
    fn cancelled_token_aborts_read() {
        let (_tmp, config) = setup(64);
        fs::write(config.root_dir().join("notes.txt"), "hello").unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let err = read_preview(&config, "notes.txt", &token).unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[test]
    fn image_info_reads_png_dimensions() {
        let (_tmp, config) = setup(64);
        image::RgbImage::new(3, 2)
            .save(config.root_dir().join("tiny.png"))
            .unwrap();

        let info = read_image_info(&config, "tiny.png").unwrap().unwrap();

        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.format, "Png");
    }

    #[test]
    fn image_info_is_none_for_svg() {
        let (_tmp, config) = setup(64);
        fs::write(config.root_dir().join("logo.svg"), "<svg></svg>").unwrap();

        assert!(read_image_info(&config, "logo.svg").unwrap().is_none());
    }

    #[test]
    fn open_file_returns_stream_and_metadata() {
        let (_tmp, config) = setup(64);
        fs::create_dir(config.root_dir().join("docs")).unwrap();
        fs::write(config.root_dir().join("docs/data.json"), r#"{"a":1}"#).unwrap();

        let mut opened = open_file(&config, "docs/data.json").unwrap();
        let mut body = String::new();
        opened.file.read_to_string(&mut body).unwrap();

        assert_eq!(body, r#"{"a":1}"#);
        assert_eq!(opened.info.name(), "data.json");
        assert_eq!(opened.info.relative_path(), "docs/data.json");
        assert_eq!(opened.info.size(), 7);
        assert_eq!(opened.content_type, "application/json");
        assert_eq!(opened.classification, Classification::Text);
    }

    #[test]
    fn open_file_rejects_directories_and_hidden() {
        let (_tmp, config) = setup(64);
        fs::create_dir(config.root_dir().join("docs")).unwrap();
        fs::write(config.root_dir().join(".env"), "TOKEN=1").unwrap();

        assert!(matches!(
            open_file(&config, "docs").unwrap_err(),
            CoreError::NotFound(_)
        ));
        assert!(matches!(
            open_file(&config, ".env").unwrap_err(),
            CoreError::NotFound(_)
        ));
    }
}
