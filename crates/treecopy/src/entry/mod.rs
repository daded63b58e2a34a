//! Per-kind entry copiers and the dispatch between them.
//!
//! Classification uses the source entry's `lstat` result, so a symlink is
//! always dispatched as a symlink regardless of what it points at. The
//! destination-exists check deliberately sits *after* the directory branch:
//! a pre-existing destination directory must still be recursed into (merge),
//! while a pre-existing destination entry of any other kind ends the entry's
//! processing without being overwritten.

use std::fs::File;
use std::io;
use std::path::Path;

use metadata::FileType;

use crate::context::TraversalContext;
use crate::error::CopyEntryError;
use crate::hardlinks::InodeId;
use crate::path_pair::PathPair;

mod dir;
mod file;
mod hardlink;
mod special;
mod symlink;

/// Size of the buffer used when streaming regular file contents.
const CHUNK_SIZE: usize = 8 * 1024;

/// Copies one directory entry from `src` to `dst`, dispatching on its type.
pub(crate) fn copy_entry(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
) -> Result<(), CopyEntryError> {
    let stat = src
        .stat_no_follow()
        .map_err(|error| CopyEntryError::io("inspect source entry", src.full_path(), error))?;
    let times = metadata::apply::timestamps_from_stat(&stat);
    let file_type = FileType::from_raw_mode(stat.st_mode);

    if file_type == FileType::Directory {
        return dir::copy_dir(ctx, src, dst, &stat, &times);
    }

    // No-clobber: anything already present at the destination stays as it
    // is. The check comes after the directory branch so that merges into
    // pre-existing subdirectories still recurse.
    match dst.stat_no_follow() {
        Ok(_) => {
            ctx.summary_mut().record_skipped();
            return Ok(());
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(CopyEntryError::io(
                "inspect destination entry",
                dst.full_path(),
                error,
            ));
        }
    }

    if file_type == FileType::Symlink {
        return symlink::copy_symlink(ctx, src, dst, &stat, &times);
    }

    let destination = ctx.destination_for(src.full_path());
    if let Some(target) = ctx.links_mut().check(InodeId::of(&stat), destination) {
        return hardlink::copy_hardlink(ctx, dst, &stat, &target);
    }

    if file_type != FileType::RegularFile {
        return special::copy_special(ctx, src, dst, &stat, &times);
    }

    file::copy_file(ctx, src, dst, &stat, &times)
}

/// Copies ACLs and extended attributes between a freshly created destination
/// entry and its source, opening a dedicated descriptor pair for the purpose.
fn copy_entry_attributes(
    ctx: &TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
) -> Result<(), CopyEntryError> {
    if !cfg!(any(feature = "acl", feature = "xattr")) {
        return Ok(());
    }

    let source = src
        .open_attributes()
        .map_err(|error| CopyEntryError::io("open source entry", src.full_path(), error))?;
    let destination = dst
        .open_attributes()
        .map_err(|error| CopyEntryError::io("open destination entry", dst.full_path(), error))?;

    apply_attribute_pair(
        ctx,
        &File::from(source),
        &File::from(destination),
        src.full_path(),
        dst.full_path(),
    )
}

/// Copies ACLs and extended attributes between two already-open descriptors.
///
/// A destination filesystem without ACL or attribute support is tolerated;
/// any other failure is fatal for the entry. Extended attributes are skipped
/// entirely when a label reset was requested, because a relabel is a
/// deliberate attribute replacement rather than preservation.
fn apply_attribute_pair(
    ctx: &TraversalContext<'_>,
    source: &File,
    destination: &File,
    source_path: &Path,
    destination_path: &Path,
) -> Result<(), CopyEntryError> {
    match metadata::copy_acls(source, destination, source_path, destination_path) {
        Ok(()) => {}
        Err(error) if error.is_unsupported() => {}
        Err(error) => return Err(error.into()),
    }

    if !ctx.reset_label() {
        match metadata::copy_xattrs(source, destination, source_path, destination_path) {
            Ok(()) => {}
            Err(error) if error.is_unsupported() => {}
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}
