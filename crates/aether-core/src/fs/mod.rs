//! Confined filesystem access.
//!
//! Every operation here takes the [`RootConfig`](crate::config::RootConfig)
//! explicitly and a root-relative path string. Paths are resolved and checked
//! by [`path`] before anything is read; [`classify`] decides how a file can be
//! previewed; [`listing`], [`preview`] and [`search`] build on both.

pub mod classify;
pub mod entry;
pub mod listing;
pub mod path;
pub mod preview;
pub mod search;

pub use classify::Classification;
pub use entry::{DirEntry, FileInfo};
pub use path::{Breadcrumb, ResolvedPath};
pub use preview::{ImageInfo, OpenedFile, TextPreview};
pub use search::{SearchHit, SearchOutcome};
