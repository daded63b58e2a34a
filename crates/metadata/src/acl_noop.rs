//! No-op ACL copier, substituted when the `acl` feature is disabled so
//! callers never branch on feature presence.

use std::fs::File;
use std::path::Path;

use crate::error::MetadataError;

/// Copies the ACL of `source` to `destination`.
///
/// This build has no ACL support; the call succeeds without copying anything.
pub fn copy_acls(
    _source: &File,
    _destination: &File,
    _source_path: &Path,
    _destination_path: &Path,
) -> Result<(), MetadataError> {
    Ok(())
}
