//! AetherServe core library: the confined filesystem layer behind the file browser.
//!
//! `aether-core` turns untrusted, root-relative path strings into reads that
//! can never leave the configured root. It has no knowledge of HTTP; the web
//! front end (`aether-web`) is a thin caller.
//!
//! # Modules
//!
//! - [`fs`]: path resolution, classification, listing, text previews, and global search.
//! - [`config`]: TOML [`Settings`] and the validated, immutable [`RootConfig`].
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod error;
pub mod fs;

pub use config::{RootConfig, Settings};
pub use error::{CoreError, CoreResult};
pub use fs::classify::{classify, content_type};
pub use fs::listing::{file_info, list_directory};
pub use fs::path::{breadcrumbs, parent_path, resolve};
pub use fs::preview::{open_file, read_image_info, read_preview};
pub use fs::search::search;
pub use fs::{
    Breadcrumb, Classification, DirEntry, FileInfo, ImageInfo, OpenedFile, ResolvedPath,
    SearchHit, SearchOutcome, TextPreview,
};

/// Re-exported so callers can build tokens without depending on `tokio-util` themselves.
pub use tokio_util::sync::CancellationToken;
