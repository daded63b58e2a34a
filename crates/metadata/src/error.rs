use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error raised while inspecting or applying filesystem metadata.
///
/// The error pairs a short action description with the path the action was
/// attempted on, so diagnostics read as
/// `failed to preserve ownership '/home/new/.profile': ...`.
#[derive(Debug, Error)]
#[error("failed to {context} '{}': {source}", path.display())]
pub struct MetadataError {
    context: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl MetadataError {
    /// Creates an error for `context` attempted on `path`.
    pub fn new(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            context,
            path: path.into(),
            source,
        }
    }

    /// Returns the action that failed.
    #[must_use]
    pub fn context(&self) -> &str {
        self.context
    }

    /// Returns the path the failed action was attempted on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` when the failure means the destination filesystem does
    /// not support the requested kind of metadata at all.
    ///
    /// Attribute and ACL copies treat this outcome as recoverable: the entry
    /// is still copied, just without that class of metadata.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        self.source.kind() == io::ErrorKind::Unsupported
            || self.source.raw_os_error() == Some(libc::ENOTSUP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context_and_path() {
        let error = MetadataError::new(
            "preserve ownership",
            "/somewhere/file",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let rendered = error.to_string();
        assert!(rendered.contains("preserve ownership"));
        assert!(rendered.contains("/somewhere/file"));
    }

    #[test]
    fn unsupported_is_detected_from_error_kind() {
        let error = MetadataError::new(
            "copy extended attributes",
            "/dst",
            io::Error::new(io::ErrorKind::Unsupported, "no xattr support"),
        );
        assert!(error.is_unsupported());
    }

    #[test]
    fn unsupported_is_detected_from_raw_errno() {
        let error = MetadataError::new(
            "copy ACL",
            "/dst",
            io::Error::from_raw_os_error(libc::ENOTSUP),
        );
        assert!(error.is_unsupported());
    }

    #[test]
    fn other_errors_are_not_unsupported() {
        let error = MetadataError::new(
            "copy extended attributes",
            "/dst",
            io::Error::from_raw_os_error(libc::EACCES),
        );
        assert!(!error.is_unsupported());
    }
}
