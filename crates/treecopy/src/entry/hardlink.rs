//! Hard link recreation.

use std::path::Path;

use rustix::fs::{self as unix_fs, AtFlags, Stat};

use crate::context::TraversalContext;
use crate::error::CopyEntryError;
use crate::hardlinks::InodeId;
use crate::path_pair::PathPair;

/// Links the destination entry to the destination path created when this
/// inode was first copied.
///
/// No metadata footer runs here: the linked inode already carries the
/// ownership, permissions, and timestamps applied by the first copy. The
/// registry reference is released only after the link exists.
pub(super) fn copy_hardlink(
    ctx: &mut TraversalContext<'_>,
    dst: &PathPair<'_>,
    stat: &Stat,
    target: &Path,
) -> Result<(), CopyEntryError> {
    unix_fs::linkat(
        rustix::fs::CWD,
        target,
        dst.dirfd(),
        dst.name(),
        AtFlags::empty(),
    )
    .map_err(|error| CopyEntryError::io("create hard link", dst.full_path(), error.into()))?;

    ctx.links_mut().release(InodeId::of(stat));
    ctx.summary_mut().record_hard_link();
    Ok(())
}
