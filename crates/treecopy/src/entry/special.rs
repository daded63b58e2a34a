//! Special file (FIFO, device node, socket) copying.

use metadata::{apply, ownership, FileType};
use rustix::fs::{self as unix_fs, Mode, Stat, Timestamps};

use crate::context::TraversalContext;
use crate::error::CopyEntryError;
use crate::path_pair::PathPair;

use super::copy_entry_attributes;

/// Recreates a special file at the destination.
///
/// The node is created with the source's file type and a zero permission
/// mask; the real permission bits follow only after ownership has been
/// fixed, mirroring the restrictive-first creation used everywhere else.
pub(super) fn copy_special(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
    stat: &Stat,
    times: &Timestamps,
) -> Result<(), CopyEntryError> {
    let file_type = FileType::from_raw_mode(stat.st_mode);
    ctx.prepare_label(dst.full_path(), file_type)?;

    unix_fs::mknodat(
        dst.dirfd(),
        dst.name(),
        file_type,
        Mode::empty(),
        stat.st_rdev as u64,
    )
    .map_err(|error| CopyEntryError::io("create special file", dst.full_path(), error.into()))?;

    let (uid, gid) = ctx.remap().resolve(stat.st_uid, stat.st_gid);
    ownership::chown_at(dst.dirfd(), dst.name(), dst.full_path(), uid, gid)?;
    apply::set_mode_at(dst.dirfd(), dst.name(), dst.full_path(), stat.st_mode)?;
    copy_entry_attributes(ctx, src, dst)?;
    apply::set_times_at(dst.dirfd(), dst.name(), dst.full_path(), times)?;

    ctx.summary_mut().record_special();
    Ok(())
}
