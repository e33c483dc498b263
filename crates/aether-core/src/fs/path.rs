//! Root-relative path resolution and containment.
//!
//! Every path that reaches the filesystem goes through [`resolve`]. It is pure
//! path arithmetic: the caller's string is joined onto the root, `.` and `..`
//! are folded lexically, and the result must still sit under the root.
//! [`confine`] repeats the check after symlinks are resolved, for callers that
//! are about to open or stat the target.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::config::RootConfig;
use crate::error::{CoreError, CoreResult};

/// A path proven to lie inside the configured root.
///
/// Only [`resolve`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    input: String,
    relative: String,
    absolute: PathBuf,
}

impl ResolvedPath {
    /// The string the caller passed in, untouched.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Normalized root-relative form, `/`-separated, `""` for the root.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Absolute, lexically normalized path under the root.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Last component of the relative path, `""` for the root.
    pub fn name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.relative.is_empty()
    }
}

/// One link in a breadcrumb trail (`docs`, `docs/2024`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub relative_path: String,
}

/// Resolves a root-relative path string.
///
/// Leading and trailing `/` or `\` are stripped, so `""`, `"/"` and `"//"`
/// all resolve to the root. No existence check is made.
///
/// # Errors
///
/// [`CoreError::Traversal`] if the normalized path leaves the root.
pub fn resolve(config: &RootConfig, relative: &str) -> CoreResult<ResolvedPath> {
    let root = config.root_dir();
    let trimmed = relative.trim_matches(|c| c == '/' || c == '\\');
    let absolute = normalize_lexically(&root.join(trimmed));

    let Ok(rest) = absolute.strip_prefix(root) else {
        tracing::warn!(input = relative, "rejected path outside root");
        return Err(CoreError::Traversal(relative.to_string()));
    };

    let relative_norm = rest
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Ok(ResolvedPath {
        input: relative.to_string(),
        relative: relative_norm,
        absolute,
    })
}

/// Like [`resolve`], but also treats any hidden path component as missing.
///
/// Hidden entries never appear in listings or search results; this keeps them
/// unreachable by typing their path directly as well.
pub fn resolve_visible(config: &RootConfig, relative: &str) -> CoreResult<ResolvedPath> {
    let resolved = resolve(config, relative)?;
    if config.is_hidden_path(resolved.relative()) {
        tracing::debug!(path = resolved.relative(), "refused hidden path");
        return Err(CoreError::NotFound(resolved.input().to_string()));
    }
    Ok(resolved)
}

/// Canonicalizes an existing resolved path and re-checks containment.
///
/// A symlink inside the root whose target lies outside it is rejected here,
/// and so is one whose target is a hidden entry.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if the path (or a parent) does not exist, the
///   input is not a valid path, or the target is hidden.
/// - [`CoreError::Traversal`] if the canonical target escapes the root.
/// - [`CoreError::Io`] for any other failure.
pub fn confine(config: &RootConfig, resolved: &ResolvedPath) -> CoreResult<PathBuf> {
    let canonical = resolved.absolute().canonicalize().map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidInput => {
            CoreError::NotFound(resolved.input().to_string())
        }
        _ => CoreError::Io(e),
    })?;

    match link_target(config, &canonical) {
        LinkTarget::Visible => Ok(canonical),
        LinkTarget::Hidden => {
            tracing::debug!(input = resolved.input(), "target resolves to a hidden entry");
            Err(CoreError::NotFound(resolved.input().to_string()))
        }
        LinkTarget::Outside => {
            tracing::warn!(input = resolved.input(), "symlink target outside root");
            Err(CoreError::Traversal(resolved.input().to_string()))
        }
    }
}

/// Returns `true` if `path` exists and its canonical target is a visible
/// entry inside the root.
///
/// Used for symlinked children found while listing or walking, which never
/// pass through [`resolve`].
pub(crate) fn target_is_visible(config: &RootConfig, path: &Path) -> bool {
    match path.canonicalize() {
        Ok(canonical) => link_target(config, &canonical) == LinkTarget::Visible,
        Err(_) => false,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LinkTarget {
    Visible,
    Hidden,
    Outside,
}

fn link_target(config: &RootConfig, canonical: &Path) -> LinkTarget {
    let Ok(rest) = canonical.strip_prefix(config.root_dir()) else {
        return LinkTarget::Outside;
    };
    let hidden = rest
        .components()
        .any(|c| config.is_hidden(&c.as_os_str().to_string_lossy()));
    if hidden {
        LinkTarget::Hidden
    } else {
        LinkTarget::Visible
    }
}

/// Joins a root-relative directory and a child name with `/`.
pub fn relative_join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Parent of a root-relative path; `""` for top-level entries and the root.
pub fn parent_path(relative: &str) -> &str {
    relative
        .trim_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or_default()
}

/// Every prefix of `relative`, one [`Breadcrumb`] per component.
pub fn breadcrumbs(relative: &str) -> Vec<Breadcrumb> {
    let mut trail = Vec::new();
    let mut acc = String::new();
    for part in relative.split('/').filter(|p| !p.is_empty()) {
        acc = relative_join(&acc, part);
        trail.push(Breadcrumb {
            name: part.to_string(),
            relative_path: acc.clone(),
        });
    }
    trail
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
