//! Permission bits and timestamp application.
//!
//! Both helpers exist in a directory-relative shape; the mode helper also has
//! a descriptor shape for regular files whose destination descriptor is
//! already open. Only permission bits (the low 07777) are ever applied; the
//! file type bits are fixed at creation time and never change afterwards.

use std::ffi::OsStr;
use std::io;
use std::os::fd::AsFd;
use std::path::Path;

use rustix::fs::{self as unix_fs, AtFlags, Mode, Stat, Timespec, Timestamps};

use crate::error::MetadataError;

/// Applies permission bits to the entry `name` inside the directory `dirfd`
/// without following a final symlink.
pub fn set_mode_at<Fd: AsFd>(
    dirfd: Fd,
    name: &OsStr,
    destination: &Path,
    mode: u32,
) -> Result<(), MetadataError> {
    unix_fs::chmodat(
        dirfd,
        name,
        Mode::from_bits_truncate(mode & 0o7777),
        AtFlags::SYMLINK_NOFOLLOW,
    )
    .map_err(|error| {
        MetadataError::new("preserve permissions", destination, io::Error::from(error))
    })
}

/// Applies permission bits to an already-open descriptor.
pub fn set_mode_fd<Fd: AsFd>(fd: Fd, destination: &Path, mode: u32) -> Result<(), MetadataError> {
    unix_fs::fchmod(fd, Mode::from_bits_truncate(mode & 0o7777)).map_err(|error| {
        MetadataError::new("preserve permissions", destination, io::Error::from(error))
    })
}

/// Applies access and modification timestamps to the entry `name` inside the
/// directory `dirfd`, without following a final symlink.
///
/// Nanosecond precision is preserved.
pub fn set_times_at<Fd: AsFd>(
    dirfd: Fd,
    name: &OsStr,
    destination: &Path,
    times: &Timestamps,
) -> Result<(), MetadataError> {
    unix_fs::utimensat(dirfd, name, times, AtFlags::SYMLINK_NOFOLLOW).map_err(|error| {
        MetadataError::new("preserve timestamps", destination, io::Error::from(error))
    })
}

/// Captures the access and modification timestamps of a stat result.
///
/// The snapshot is taken before any content is read, so the source's access
/// time is preserved as it was prior to the copy touching it.
#[must_use]
pub fn timestamps_from_stat(stat: &Stat) -> Timestamps {
    Timestamps {
        last_access: Timespec {
            tv_sec: stat.st_atime as _,
            tv_nsec: stat.st_atime_nsec as _,
        },
        last_modification: Timespec {
            tv_sec: stat.st_mtime as _,
            tv_nsec: stat.st_mtime_nsec as _,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn open_dir(path: &Path) -> rustix::io::Result<std::os::fd::OwnedFd> {
        unix_fs::openat(
            rustix::fs::CWD,
            path,
            rustix::fs::OFlags::DIRECTORY | rustix::fs::OFlags::RDONLY,
            Mode::empty(),
        )
    }

    #[test]
    fn mode_is_applied_relative_to_directory() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("entry.txt");
        fs::write(&file, b"data").expect("write file");

        let dirfd = open_dir(temp.path()).expect("open dir");
        set_mode_at(&dirfd, OsStr::new("entry.txt"), &file, 0o640).expect("set mode");

        let meta = fs::metadata(&file).expect("metadata");
        assert_eq!(meta.permissions().mode() & 0o7777, 0o640);
    }

    #[test]
    fn mode_strips_file_type_bits() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("typed.txt");
        fs::write(&file, b"data").expect("write file");

        let dirfd = open_dir(temp.path()).expect("open dir");
        // Full st_mode of a regular file, type bits included.
        set_mode_at(&dirfd, OsStr::new("typed.txt"), &file, 0o100600).expect("set mode");

        let meta = fs::metadata(&file).expect("metadata");
        assert_eq!(meta.permissions().mode() & 0o7777, 0o600);
    }

    #[test]
    fn mode_is_applied_to_open_descriptor() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("fd.txt");
        fs::write(&file, b"data").expect("write file");

        let handle = fs::File::open(&file).expect("open file");
        set_mode_fd(&handle, &file, 0o604).expect("set mode");

        let meta = fs::metadata(&file).expect("metadata");
        assert_eq!(meta.permissions().mode() & 0o7777, 0o604);
    }

    #[test]
    fn timestamps_round_trip_through_stat_snapshot() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("source.txt");
        let dest = temp.path().join("dest.txt");
        fs::write(&source, b"data").expect("write source");
        fs::write(&dest, b"data").expect("write dest");

        let atime = FileTime::from_unix_time(1_700_000_000, 111_000_000);
        let mtime = FileTime::from_unix_time(1_700_000_100, 222_000_000);
        filetime::set_file_times(&source, atime, mtime).expect("set source times");

        let stat = unix_fs::statat(rustix::fs::CWD, &source, AtFlags::SYMLINK_NOFOLLOW)
            .expect("stat source");
        let times = timestamps_from_stat(&stat);

        let dirfd = open_dir(temp.path()).expect("open dir");
        set_times_at(&dirfd, OsStr::new("dest.txt"), &dest, &times).expect("set times");

        let meta = fs::metadata(&dest).expect("metadata");
        assert_eq!(FileTime::from_last_access_time(&meta), atime);
        assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
    }

    #[test]
    fn symlink_timestamps_do_not_follow_the_target() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("target.txt");
        fs::write(&target, b"data").expect("write target");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("create link");

        let target_mtime_before =
            FileTime::from_last_modification_time(&fs::metadata(&target).expect("meta"));

        let times = Timestamps {
            last_access: Timespec {
                tv_sec: 1_600_000_000,
                tv_nsec: 0,
            },
            last_modification: Timespec {
                tv_sec: 1_600_000_001,
                tv_nsec: 0,
            },
        };
        let dirfd = open_dir(temp.path()).expect("open dir");
        set_times_at(&dirfd, OsStr::new("link"), &link, &times).expect("set link times");

        let link_meta = fs::symlink_metadata(&link).expect("link metadata");
        assert_eq!(
            FileTime::from_last_modification_time(&link_meta),
            FileTime::from_unix_time(1_600_000_001, 0)
        );
        let target_meta = fs::metadata(&target).expect("target metadata");
        assert_eq!(
            FileTime::from_last_modification_time(&target_meta),
            target_mtime_before
        );
    }
}
