//! Directory-relative addressing of a single filesystem entry.
//!
//! Every raw operation against a tree entry goes through an open directory
//! descriptor plus a name, with the "do not follow symlinks" variant of the
//! syscall wherever one exists. Re-resolving a full path would let a
//! concurrent writer swap a path component between inspection and use; the
//! full path stored here exists only for diagnostics and prefix rewriting and
//! is never handed to the kernel.

use std::ffi::{OsStr, OsString};
use std::io;
use std::os::fd::{BorrowedFd, OwnedFd};
use std::os::unix::ffi::OsStringExt;
use std::path::{Path, PathBuf};

use rustix::fs::{self as unix_fs, AtFlags, Mode, OFlags, Stat};

pub(crate) struct PathPair<'fd> {
    dirfd: BorrowedFd<'fd>,
    name: OsString,
    full_path: PathBuf,
}

impl<'fd> PathPair<'fd> {
    /// Addresses `path` relative to the current working directory; used for
    /// the two tree roots.
    pub(crate) fn root(path: &Path) -> Self {
        Self {
            dirfd: rustix::fs::CWD,
            name: path.as_os_str().to_os_string(),
            full_path: path.to_path_buf(),
        }
    }

    /// Addresses the entry `name` inside an open directory.
    pub(crate) fn child(dirfd: BorrowedFd<'fd>, parent: &Path, name: &OsStr) -> Self {
        Self {
            dirfd,
            name: name.to_os_string(),
            full_path: parent.join(name),
        }
    }

    pub(crate) fn dirfd(&self) -> BorrowedFd<'_> {
        self.dirfd
    }

    pub(crate) fn name(&self) -> &OsStr {
        &self.name
    }

    pub(crate) fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub(crate) fn stat_no_follow(&self) -> io::Result<Stat> {
        unix_fs::statat(self.dirfd, self.name.as_os_str(), AtFlags::SYMLINK_NOFOLLOW)
            .map_err(io::Error::from)
    }

    pub(crate) fn open_directory(&self) -> io::Result<OwnedFd> {
        unix_fs::openat(
            self.dirfd,
            self.name.as_os_str(),
            OFlags::DIRECTORY | OFlags::RDONLY | OFlags::NOFOLLOW | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)
    }

    pub(crate) fn open_read(&self) -> io::Result<OwnedFd> {
        unix_fs::openat(
            self.dirfd,
            self.name.as_os_str(),
            OFlags::RDONLY | OFlags::NOFOLLOW | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)
    }

    /// Opens the entry for attribute access only. `O_NONBLOCK` keeps a FIFO
    /// open from blocking until a writer appears.
    pub(crate) fn open_attributes(&self) -> io::Result<OwnedFd> {
        unix_fs::openat(
            self.dirfd,
            self.name.as_os_str(),
            OFlags::RDONLY | OFlags::NOFOLLOW | OFlags::NONBLOCK | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)
    }

    /// Creates the destination file exclusively, mode 0600.
    ///
    /// `O_EXCL` refuses to clobber any pre-existing entry and, together with
    /// `O_NOFOLLOW`, makes it impossible to be redirected through a planted
    /// symlink. The restrictive initial mode keeps the content unreadable
    /// until ownership has been fixed.
    pub(crate) fn create_exclusive(&self) -> io::Result<OwnedFd> {
        unix_fs::openat(
            self.dirfd,
            self.name.as_os_str(),
            OFlags::WRONLY
                | OFlags::CREATE
                | OFlags::EXCL
                | OFlags::TRUNC
                | OFlags::NOFOLLOW
                | OFlags::CLOEXEC,
            Mode::RUSR | Mode::WUSR,
        )
        .map_err(io::Error::from)
    }

    pub(crate) fn read_link(&self) -> io::Result<OsString> {
        unix_fs::readlinkat(self.dirfd, self.name.as_os_str(), Vec::new())
            .map(|target| OsString::from_vec(target.into_bytes()))
            .map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustix::fs::FileType;
    use std::fs;
    use std::os::fd::AsFd;
    use tempfile::tempdir;

    #[test]
    fn root_pairs_resolve_against_the_working_directory() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("probe.txt");
        fs::write(&file, b"data").expect("write file");

        let pair = PathPair::root(&file);
        let stat = pair.stat_no_follow().expect("stat");
        assert_eq!(FileType::from_raw_mode(stat.st_mode), FileType::RegularFile);
        assert_eq!(pair.full_path(), file.as_path());
    }

    #[test]
    fn child_pairs_resolve_against_the_directory_descriptor() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("inner.txt"), b"data").expect("write file");

        let dir = PathPair::root(temp.path());
        let dirfd = dir.open_directory().expect("open dir");
        let child = PathPair::child(dirfd.as_fd(), temp.path(), OsStr::new("inner.txt"));

        let stat = child.stat_no_follow().expect("stat child");
        assert_eq!(FileType::from_raw_mode(stat.st_mode), FileType::RegularFile);
        assert_eq!(child.full_path(), temp.path().join("inner.txt"));
    }

    #[test]
    fn stat_does_not_follow_symlinks() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("target.txt");
        fs::write(&target, b"data").expect("write target");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("create link");

        let pair = PathPair::root(&link);
        let stat = pair.stat_no_follow().expect("stat link");
        assert_eq!(FileType::from_raw_mode(stat.st_mode), FileType::Symlink);
    }

    #[test]
    fn create_exclusive_refuses_existing_entries() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("existing.txt");
        fs::write(&file, b"data").expect("write file");

        let pair = PathPair::root(&file);
        let error = pair.create_exclusive().expect_err("must not clobber");
        assert_eq!(error.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn open_read_rejects_symlinks() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("target.txt");
        fs::write(&target, b"data").expect("write target");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("create link");

        let pair = PathPair::root(&link);
        assert!(pair.open_read().is_err());
    }

    #[test]
    fn read_link_returns_the_raw_target() {
        let temp = tempdir().expect("tempdir");
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink("no/such/place", &link).expect("create link");

        let pair = PathPair::root(&link);
        assert_eq!(pair.read_link().expect("read link"), OsString::from("no/such/place"));
    }
}
