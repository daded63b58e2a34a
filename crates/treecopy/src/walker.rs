//! Recursive traversal and the top-level entry point.

use std::ffi::OsStr;
use std::os::fd::AsFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use logging::{trace_copy, trace_walk, warn_entry};
use metadata::FileType;
use rustix::fs::Dir;

use crate::context::TraversalContext;
use crate::entry::copy_entry;
use crate::error::{CopyEntryError, TreeCopyError};
use crate::options::CopyOptions;
use crate::path_pair::PathPair;
use crate::summary::CopySummary;

/// Enumerates one source directory and copies each entry to the destination.
///
/// Both directories are opened without following symlinks and children are
/// addressed relative to the resulting descriptors. A failing entry is
/// recorded and reported on the `treecopy::entry` target, and enumeration
/// continues with its siblings; only a failure to open or read the
/// directories themselves aborts this level.
pub(crate) fn walk_tree(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
) -> Result<(), CopyEntryError> {
    let source_dir = src
        .open_directory()
        .map_err(|error| CopyEntryError::io("open source directory", src.full_path(), error))?;
    let destination_dir = dst.open_directory().map_err(|error| {
        CopyEntryError::io("open destination directory", dst.full_path(), error)
    })?;

    let dir = Dir::read_from(&source_dir).map_err(|error| {
        CopyEntryError::io("read source directory", src.full_path(), error.into())
    })?;

    trace_walk!("enumerating {:?}", src.full_path());

    for entry in dir {
        let entry = entry.map_err(|error| {
            CopyEntryError::io("read source directory", src.full_path(), error.into())
        })?;
        let name = entry.file_name();
        if name.to_bytes() == b"." || name.to_bytes() == b".." {
            continue;
        }
        let name = OsStr::from_bytes(name.to_bytes());

        let child_src = PathPair::child(source_dir.as_fd(), src.full_path(), name);
        let child_dst = PathPair::child(destination_dir.as_fd(), dst.full_path(), name);

        trace_copy!("copying {:?} -> {:?}", child_src.full_path(), child_dst.full_path());

        if let Err(error) = copy_entry(ctx, &child_src, &child_dst) {
            warn_entry!("{}", error);
            ctx.record_failure();
        }
    }

    Ok(())
}

/// Copies the directory tree rooted at `source_root` to `destination_root`.
///
/// With [`CopyOptions::copy_root`] enabled the destination root itself is
/// created: the call fails immediately when the destination root already
/// exists or the source root is not a directory. Otherwise both roots must
/// already be directories and the source's entries are copied into the
/// destination (pre-existing destination entries are never overwritten;
/// pre-existing subdirectories are merged into).
///
/// Per-entry failures do not stop the traversal. When at least one entry
/// failed the call returns [`TreeCopyError::Incomplete`] and the destination
/// is left partially populated; nothing is rolled back. On success the
/// returned [`CopySummary`] describes what was created.
pub fn copy_tree(
    source_root: &Path,
    destination_root: &Path,
    options: &CopyOptions,
) -> Result<CopySummary, TreeCopyError> {
    let mut ctx = TraversalContext::new(source_root, destination_root, options);
    let src = PathPair::root(source_root);
    let dst = PathPair::root(destination_root);

    let outcome = if options.copy_root_enabled() {
        copy_created_root(&mut ctx, &src, &dst)
    } else {
        walk_tree(&mut ctx, &src, &dst).map_err(|source| TreeCopyError::OpenRoots { source })
    };

    // The label context is restored even when the copy failed part way.
    let reset = ctx.finish_labels();

    outcome?;
    if let Err(source) = reset {
        return Err(TreeCopyError::ResetLabel { source });
    }

    if ctx.failures() > 0 {
        return Err(TreeCopyError::Incomplete {
            failures: ctx.failures(),
        });
    }
    Ok(ctx.into_summary())
}

/// Handles `copy_root`: validates both roots, then sends the root itself
/// through the regular entry dispatcher (which creates the destination
/// directory and recurses).
fn copy_created_root(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
) -> Result<(), TreeCopyError> {
    match dst.stat_no_follow() {
        Ok(_) => {
            return Err(TreeCopyError::RootExists {
                path: dst.full_path().to_path_buf(),
            });
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(TreeCopyError::InspectRoot {
                path: dst.full_path().to_path_buf(),
                source: error,
            });
        }
    }

    let stat = src.stat_no_follow().map_err(|source| TreeCopyError::InspectRoot {
        path: src.full_path().to_path_buf(),
        source,
    })?;
    if FileType::from_raw_mode(stat.st_mode) != FileType::Directory {
        return Err(TreeCopyError::SourceNotDirectory {
            path: src.full_path().to_path_buf(),
        });
    }

    copy_entry(ctx, src, dst).map_err(|source| {
        warn_entry!("{}", source);
        TreeCopyError::CopyRoot { source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copy_root_fails_when_the_destination_exists() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("skel");
        let dst = temp.path().join("home");
        fs::create_dir(&src).expect("create src");
        fs::create_dir(&dst).expect("create dst");

        let options = CopyOptions::new().copy_root(true);
        let error = copy_tree(&src, &dst, &options).expect_err("existing root must fail");
        assert!(matches!(error, TreeCopyError::RootExists { .. }));
        // The pre-existing destination is left untouched.
        assert!(dst.is_dir());
    }

    #[test]
    fn copy_root_fails_when_the_source_is_not_a_directory() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("not-a-dir");
        let dst = temp.path().join("home");
        fs::write(&src, b"data").expect("write src");

        let options = CopyOptions::new().copy_root(true);
        let error = copy_tree(&src, &dst, &options).expect_err("file source must fail");
        assert!(matches!(error, TreeCopyError::SourceNotDirectory { .. }));
        assert!(!dst.exists());
    }

    #[test]
    fn missing_roots_fail_whole_operation_without_copy_root() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("absent");
        let dst = temp.path().join("also-absent");

        let options = CopyOptions::new();
        let error = copy_tree(&src, &dst, &options).expect_err("missing roots must fail");
        assert!(matches!(error, TreeCopyError::OpenRoots { .. }));
    }

    #[test]
    fn symlinked_destination_root_is_rejected_for_copy_root() {
        let temp = tempdir().expect("tempdir");
        let src = temp.path().join("skel");
        fs::create_dir(&src).expect("create src");
        let dst = temp.path().join("link-home");
        std::os::unix::fs::symlink("missing-target", &dst).expect("create link");

        // Even a dangling symlink counts as an existing destination entry; it
        // is classified without being followed.
        let options = CopyOptions::new().copy_root(true);
        let error = copy_tree(&src, &dst, &options).expect_err("symlink root must fail");
        assert!(matches!(error, TreeCopyError::RootExists { .. }));
    }
}
