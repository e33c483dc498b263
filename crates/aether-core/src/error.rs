//! Error types for `aether-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

/// Unified error type for all core operations.
///
/// Containment and existence problems always get their own variant; [`CoreError::Io`]
/// is reserved for failures that are neither. Path-carrying variants hold the
/// caller's *relative* input, never the absolute host path.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested path resolves outside the configured root.
    #[error("path escapes root: {0}")]
    Traversal(String),

    /// The target does not exist, or is not the kind of entry the operation needs.
    #[error("path not found: {0}")]
    NotFound(String),

    /// A long-running walk or read was aborted through its cancellation token.
    #[error("operation cancelled")]
    Cancelled,

    /// The configuration is invalid (bad TOML, bad glob, zero preview size...).
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `aether-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_displays_relative_input() {
        let err = CoreError::Traversal("../etc/passwd".to_string());
        assert_eq!(err.to_string(), "path escapes root: ../etc/passwd");
    }

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound("docs/missing.txt".to_string());
        assert_eq!(err.to_string(), "path not found: docs/missing.txt");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn cancelled_displays_message() {
        assert_eq!(CoreError::Cancelled.to_string(), "operation cancelled");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("disk on fire"));
    }

    #[test]
    fn core_result_err() {
        let result: CoreResult<i32> = Err(CoreError::Cancelled);
        assert!(result.is_err());
    }
}
