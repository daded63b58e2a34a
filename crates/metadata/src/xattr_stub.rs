//! No-op extended attribute copier, substituted when the `xattr` feature is
//! disabled so callers never branch on feature presence.

use std::fs::File;
use std::path::Path;

use crate::error::MetadataError;

/// Copies extended attributes from `source` to `destination`.
///
/// This build has no extended attribute support; the call succeeds without
/// copying anything.
pub fn copy_xattrs(
    _source: &File,
    _destination: &File,
    _source_path: &Path,
    _destination_path: &Path,
) -> Result<(), MetadataError> {
    Ok(())
}
