//! Text / image detection using content sniffing with an extension fallback.
//!
//! Sniffing looks at the first [`SNIFF_LEN`] bytes. Magic numbers come from
//! `infer`; a NUL-free UTF-8 prefix counts as text. When sniffing says nothing
//! useful (empty file, unknown binary), the configured extension lists decide.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::config::RootConfig;

/// Number of leading bytes inspected when sniffing.
pub const SNIFF_LEN: usize = 8192;

/// `application/*` types whose content is human-readable.
const TEXTUAL_APPLICATION_TYPES: &[&str] = &[
    "application/json",
    "application/javascript",
    "application/xml",
    "application/x-sh",
    "application/x-python",
    "application/x-php",
    "application/x-java",
    "application/sql",
    "application/yaml",
    "application/x-yaml",
    "application/x-perl",
    "application/x-ruby",
    "application/x-go",
    "application/x-swift",
    "application/typescript",
    "application/x-powershell",
    "application/x-bat",
    "application/csv",
    "application/vnd.ms-excel",
];

/// How a file can be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Text,
    Image,
    Other,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Text => "text",
            Classification::Image => "image",
            Classification::Other => "other",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the file at `path`.
///
/// Never fails: missing paths, directories, and unreadable files are
/// [`Classification::Other`]. The result is recomputed on every call.
pub fn classify(config: &RootConfig, path: &Path) -> Classification {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => return Classification::Other,
    }

    match sniff(path) {
        Some(mime) if is_textual_mime(mime) => return Classification::Text,
        Some(mime) if mime.starts_with("image/") => return Classification::Image,
        // A recognised binary signature outranks a misleading extension.
        Some(_) => return Classification::Other,
        None => {}
    }

    classify_by_extension(config, path)
}

/// Extension-only classification. Text wins over image.
pub fn classify_by_extension(config: &RootConfig, path: &Path) -> Classification {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Classification::Other;
    };
    if config.is_text_extension(ext) {
        Classification::Text
    } else if config.is_image_extension(ext) {
        Classification::Image
    } else {
        Classification::Other
    }
}

/// MIME type to send when streaming the file to a client.
pub fn content_type(path: &Path) -> String {
    let sniffed = sniff(path);
    if let Some(mime) = sniffed.filter(|m| *m != "text/plain") {
        return mime.to_string();
    }
    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.to_string();
    }
    sniffed.unwrap_or("application/octet-stream").to_string()
}

/// Sniffs the leading bytes of a file. `None` when inconclusive or unreadable.
pub fn sniff(path: &Path) -> Option<&'static str> {
    match read_prefix(path, SNIFF_LEN) {
        Ok(prefix) => sniff_bytes(&prefix),
        Err(e) => {
            tracing::debug!("sniffing failed for {}: {e}", path.display());
            None
        }
    }
}

/// Sniffs an in-memory prefix.
pub fn sniff_bytes(buf: &[u8]) -> Option<&'static str> {
    if buf.is_empty() {
        return None;
    }
    if looks_textual(buf) {
        if svg_is_document_root(buf) {
            return Some("image/svg+xml");
        }
        return Some(infer::get(buf).map_or("text/plain", |kind| kind.mime_type()));
    }
    infer::get(buf).map(|kind| kind.mime_type())
}

fn is_textual_mime(mime: &str) -> bool {
    mime.starts_with("text/") || TEXTUAL_APPLICATION_TYPES.contains(&mime)
}

/// NUL-free and valid UTF-8, tolerating one character cut off at the end.
fn looks_textual(buf: &[u8]) -> bool {
    if buf.contains(&0) {
        return false;
    }
    match std::str::from_utf8(buf) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// `true` when the first element of the document is `<svg`.
///
/// A leading BOM, whitespace, XML declarations, processing instructions,
/// comments and a DOCTYPE may precede it. Markup that merely embeds an
/// `<svg>` (HTML pages, JSX, prose) is not an SVG file.
fn svg_is_document_root(buf: &[u8]) -> bool {
    let mut rest = buf.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(buf);
    loop {
        rest = rest.trim_ascii_start();
        let skipped = if rest.starts_with(b"<?") {
            skip_past(rest, b"?>")
        } else if rest.starts_with(b"<!--") {
            skip_past(rest, b"-->")
        } else if starts_with_ignore_case(rest, b"<!doctype") {
            skip_past(rest, b">")
        } else {
            return starts_with_ignore_case(rest, b"<svg")
                && rest
                    .get(4)
                    .is_some_and(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/');
        };
        match skipped {
            Some(after) => rest = after,
            None => return false,
        }
    }
}

fn skip_past<'a>(buf: &'a [u8], terminator: &[u8]) -> Option<&'a [u8]> {
    buf.windows(terminator.len())
        .position(|w| w == terminator)
        .map(|i| &buf[i + terminator.len()..])
}

fn starts_with_ignore_case(buf: &[u8], prefix: &[u8]) -> bool {
    buf.len() >= prefix.len() && buf[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn read_prefix(path: &Path, len: usize) -> std::io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut buf = Vec::with_capacity(len);
    file.take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
