use std::io;
use std::path::{Path, PathBuf};

use metadata::MetadataError;
use thiserror::Error;

/// Error raised while copying a single tree entry.
///
/// Entry errors do not abort a traversal: the walker records them, emits a
/// diagnostic on the `treecopy::entry` target, and keeps enumerating
/// siblings. They surface directly only when the failed entry was the tree
/// root itself.
#[derive(Debug, Error)]
pub enum CopyEntryError {
    /// A filesystem operation on the entry failed.
    #[error("failed to {context} '{}': {source}", path.display())]
    Io {
        /// The action that failed.
        context: &'static str,
        /// The path the action was attempted on.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A metadata propagation step failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl CopyEntryError {
    /// Creates an I/O entry error for `context` attempted on `path`.
    pub fn io(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Error terminating a whole tree copy.
#[derive(Debug, Error)]
pub enum TreeCopyError {
    /// Root creation was requested but the destination root already exists.
    #[error("destination root '{}' already exists", path.display())]
    RootExists {
        /// The pre-existing destination root.
        path: PathBuf,
    },

    /// Root creation was requested but the source root is not a directory.
    #[error("source root '{}' is not a directory", path.display())]
    SourceNotDirectory {
        /// The offending source root.
        path: PathBuf,
    },

    /// A tree root could not be inspected.
    #[error("failed to inspect tree root '{}': {source}", path.display())]
    InspectRoot {
        /// The root that could not be inspected.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Copying the requested root entry itself failed.
    #[error("copying the tree root failed: {source}")]
    CopyRoot {
        /// The failure of the root dispatch.
        #[source]
        source: CopyEntryError,
    },

    /// One of the tree roots could not be opened for enumeration.
    #[error("opening the tree roots failed: {source}")]
    OpenRoots {
        /// The failure of the root open.
        #[source]
        source: CopyEntryError,
    },

    /// The traversal finished but at least one entry failed to copy.
    ///
    /// Details of the individual failures were emitted on the
    /// `treecopy::entry` diagnostic target as they happened; the destination
    /// tree is left partially populated.
    #[error("failed to copy {failures} tree entr{}", if *failures == 1 { "y" } else { "ies" })]
    Incomplete {
        /// Number of entries that failed to copy.
        failures: usize,
    },

    /// Restoring the default security creation label failed.
    #[error("resetting the security label context failed: {source}")]
    ResetLabel {
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_pluralizes() {
        let one = TreeCopyError::Incomplete { failures: 1 };
        assert_eq!(one.to_string(), "failed to copy 1 tree entry");
        let many = TreeCopyError::Incomplete { failures: 3 };
        assert_eq!(many.to_string(), "failed to copy 3 tree entries");
    }

    #[test]
    fn entry_error_reports_context_and_path() {
        let error = CopyEntryError::io(
            "create directory",
            Path::new("/dst/sub"),
            io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        );
        let rendered = error.to_string();
        assert!(rendered.contains("create directory"));
        assert!(rendered.contains("/dst/sub"));
    }
}
