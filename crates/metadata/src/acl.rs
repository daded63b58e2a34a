//! POSIX ACL copy between open descriptors.
//!
//! On Linux, access and default ACLs are stored as `system.posix_acl_*`
//! extended attributes, so copying the raw attribute values between two
//! descriptors reproduces the ACL exactly. The copier reads from and writes
//! to open descriptors only; no path is re-resolved.

use std::fs::File;
use std::path::Path;

use xattr::FileExt;

use crate::attr_filter::ACL_ATTRIBUTES;
use crate::error::MetadataError;

/// Copies the ACL of `source` to `destination`.
///
/// A source filesystem without ACL support simply has nothing to copy. When
/// the destination filesystem rejects ACLs, the returned error satisfies
/// [`MetadataError::is_unsupported`] and callers should proceed without ACL
/// metadata.
pub fn copy_acls(
    source: &File,
    destination: &File,
    source_path: &Path,
    destination_path: &Path,
) -> Result<(), MetadataError> {
    for name in ACL_ATTRIBUTES {
        let value = match source.get_xattr(name) {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(error) => {
                let error = MetadataError::new("read ACL", source_path, error);
                if error.is_unsupported() {
                    continue;
                }
                return Err(error);
            }
        };

        destination
            .set_xattr(name, &value)
            .map_err(|error| MetadataError::new("apply ACL", destination_path, error))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn files_without_acls_copy_cleanly() {
        let temp = tempdir().expect("tempdir");
        let source_path = temp.path().join("src");
        let destination_path = temp.path().join("dst");
        fs::write(&source_path, b"data").expect("write src");
        fs::write(&destination_path, b"data").expect("write dst");

        let source = File::open(&source_path).expect("open src");
        let destination = File::open(&destination_path).expect("open dst");

        copy_acls(&source, &destination, &source_path, &destination_path)
            .expect("copy between plain files");
    }
}
