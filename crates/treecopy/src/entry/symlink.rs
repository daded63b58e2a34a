//! Symbolic link copying.

use metadata::{apply, ownership, FileType};
use rustix::fs::{self as unix_fs, Stat, Timestamps};

use crate::context::TraversalContext;
use crate::error::CopyEntryError;
use crate::path_pair::PathPair;

/// Recreates a symbolic link at the destination.
///
/// A target that begins with the original source-root path is rewritten to
/// point inside the destination tree, so links between entries of the copied
/// tree stay internal. Symlinks have no independent permission bits, and
/// ACLs / extended attributes are not copied onto them.
pub(super) fn copy_symlink(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
    stat: &Stat,
    times: &Timestamps,
) -> Result<(), CopyEntryError> {
    let target = src
        .read_link()
        .map_err(|error| CopyEntryError::io("read symbolic link", src.full_path(), error))?;
    let target = ctx.rewrite_link_target(target);

    ctx.prepare_label(dst.full_path(), FileType::Symlink)?;

    unix_fs::symlinkat(target.as_os_str(), dst.dirfd(), dst.name()).map_err(|error| {
        CopyEntryError::io("create symbolic link", dst.full_path(), error.into())
    })?;

    let (uid, gid) = ctx.remap().resolve(stat.st_uid, stat.st_gid);
    ownership::chown_at(dst.dirfd(), dst.name(), dst.full_path(), uid, gid)?;
    apply::set_times_at(dst.dirfd(), dst.name(), dst.full_path(), times)?;

    ctx.summary_mut().record_symlink();
    Ok(())
}
