//! Directory copying.

use logging::trace_copy;
use metadata::{apply, ownership, FileType};
use rustix::fs::{self as unix_fs, Mode, Stat, Timestamps};

use crate::context::TraversalContext;
use crate::error::CopyEntryError;
use crate::path_pair::PathPair;
use crate::walker::walk_tree;

use super::copy_entry_attributes;

/// Copies a directory, recursing into its children.
///
/// A destination that is already a directory is merged into: its own
/// metadata is left untouched and only the recursion happens. Otherwise the
/// directory is created with mode 0700 so there is no window in which its
/// contents are readable under the wrong ownership, then ownership, the full
/// permission bits, ACLs, and attributes are applied. Timestamps go last,
/// after the recursion, so child creation does not disturb the directory's
/// own modification time.
pub(super) fn copy_dir(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
    stat: &Stat,
    times: &Timestamps,
) -> Result<(), CopyEntryError> {
    ctx.prepare_label(dst.full_path(), FileType::Directory)?;

    if let Ok(existing) = dst.stat_no_follow() {
        if FileType::from_raw_mode(existing.st_mode) == FileType::Directory {
            trace_copy!("merging into existing directory {:?}", dst.full_path());
            return walk_tree(ctx, src, dst);
        }
    }

    unix_fs::mkdirat(dst.dirfd(), dst.name(), Mode::RWXU).map_err(|error| {
        CopyEntryError::io("create directory", dst.full_path(), error.into())
    })?;

    let (uid, gid) = ctx.remap().resolve(stat.st_uid, stat.st_gid);
    ownership::chown_at(dst.dirfd(), dst.name(), dst.full_path(), uid, gid)?;
    apply::set_mode_at(dst.dirfd(), dst.name(), dst.full_path(), stat.st_mode)?;
    copy_entry_attributes(ctx, src, dst)?;

    walk_tree(ctx, src, dst)?;

    apply::set_times_at(dst.dirfd(), dst.name(), dst.full_path(), times)?;
    ctx.summary_mut().record_directory();
    Ok(())
}
