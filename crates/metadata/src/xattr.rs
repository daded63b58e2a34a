//! Extended attribute copy between open descriptors.

use std::fs::File;
use std::path::Path;

use xattr::FileExt;

use crate::attr_filter::ACL_ATTRIBUTES;
use crate::error::MetadataError;

/// Checks whether an xattr name is accessible at the current privilege level.
///
/// - Non-root on Linux: only the `user.*` namespace is writable.
/// - Root on Linux: every namespace except `system.*` (the `system.*` names
///   are either synthesised by the kernel or handled by the ACL copier).
/// - Non-Linux Unix: no namespace filtering.
#[cfg(target_os = "linux")]
fn is_xattr_permitted(name: &str) -> bool {
    const USER_PREFIX: &str = "user.";
    const SYSTEM_PREFIX: &str = "system.";

    /// Caches the euid check since it does not change during a copy.
    fn is_root() -> bool {
        use std::sync::OnceLock;
        static IS_ROOT: OnceLock<bool> = OnceLock::new();
        *IS_ROOT.get_or_init(|| rustix::process::geteuid().is_root())
    }

    if is_root() {
        !name.starts_with(SYSTEM_PREFIX)
    } else {
        name.starts_with(USER_PREFIX)
    }
}

#[cfg(not(target_os = "linux"))]
fn is_xattr_permitted(_name: &str) -> bool {
    true
}

fn is_acl_attribute(name: &str) -> bool {
    ACL_ATTRIBUTES.contains(&name)
}

/// Copies extended attributes from `source` to `destination`.
///
/// ACL-category attributes are excluded; copying those between filesystems
/// with and without ACL support needs the dedicated ACL copier so that no
/// unexpected permissions result. Attributes that vanish between listing and
/// reading are skipped.
///
/// When the destination filesystem has no attribute support at all, the
/// returned error satisfies [`MetadataError::is_unsupported`] and callers
/// should proceed without attribute metadata.
pub fn copy_xattrs(
    source: &File,
    destination: &File,
    source_path: &Path,
    destination_path: &Path,
) -> Result<(), MetadataError> {
    let names = source.list_xattr().map_err(|error| {
        MetadataError::new("list extended attributes", source_path, error)
    })?;

    for name in names {
        let printable = name.to_string_lossy();
        if is_acl_attribute(&printable) || !is_xattr_permitted(&printable) {
            continue;
        }

        let value = source.get_xattr(&name).map_err(|error| {
            MetadataError::new("read extended attribute", source_path, error)
        })?;
        let Some(value) = value else { continue };

        destination.set_xattr(&name, &value).map_err(|error| {
            MetadataError::new("write extended attribute", destination_path, error)
        })?;
    }

    Ok(())
}
