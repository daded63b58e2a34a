#![allow(unsafe_code)]

//! Ownership remap policy and its two application shapes.
//!
//! Provisioning a home directory from a skeleton usually means "whatever was
//! owned by root in the skeleton belongs to the new user now, everything else
//! keeps its owner". [`IdRemap`] captures that policy for one id axis, and
//! [`OwnershipRemap`] applies it independently to UID and GID. Resolution is
//! a pure computation; the two `chown_*` helpers below are the only places
//! the resolved ids touch the filesystem.

use std::ffi::OsStr;
use std::io;
use std::os::fd::AsFd;
use std::path::Path;

use rustix::fs::{self as unix_fs, AtFlags};
use rustix::process::{RawGid, RawUid};

use crate::error::MetadataError;

pub(crate) fn uid_from_raw(raw: RawUid) -> rustix::fs::Uid {
    rustix::fs::Uid::from_raw(raw)
}

pub(crate) fn gid_from_raw(raw: RawGid) -> rustix::fs::Gid {
    rustix::fs::Gid::from_raw(raw)
}

/// Remap policy for a single id axis (UID or GID).
///
/// `old` constrains which entries are remapped: `None` matches every current
/// owner, `Some(id)` matches only entries currently owned by `id`. `new` is
/// the replacement id; `None` means "never change this axis".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IdRemap {
    old: Option<u32>,
    new: Option<u32>,
}

impl IdRemap {
    /// Creates a remap from an optional matched id to an optional new id.
    #[must_use]
    pub const fn new(old: Option<u32>, new: Option<u32>) -> Self {
        Self { old, new }
    }

    /// The identity remap: every entry keeps its current owner.
    #[must_use]
    pub const fn unchanged() -> Self {
        Self {
            old: None,
            new: None,
        }
    }

    /// Computes the effective id for an entry currently owned by `current`.
    #[must_use]
    pub fn resolve(&self, current: u32) -> u32 {
        let candidate = if self.old.is_none() || self.old == Some(current) {
            self.new
        } else {
            None
        };
        candidate.unwrap_or(current)
    }
}

/// Independent UID and GID remap policies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OwnershipRemap {
    uid: IdRemap,
    gid: IdRemap,
}

impl OwnershipRemap {
    /// Creates a remap from per-axis policies.
    #[must_use]
    pub const fn new(uid: IdRemap, gid: IdRemap) -> Self {
        Self { uid, gid }
    }

    /// Returns the UID policy.
    #[must_use]
    pub const fn uid(&self) -> IdRemap {
        self.uid
    }

    /// Returns the GID policy.
    #[must_use]
    pub const fn gid(&self) -> IdRemap {
        self.gid
    }

    /// Computes the effective ownership for an entry currently owned by
    /// `(uid, gid)`.
    #[must_use]
    pub fn resolve(&self, uid: u32, gid: u32) -> (u32, u32) {
        (self.uid.resolve(uid), self.gid.resolve(gid))
    }
}

/// Assigns `uid`/`gid` to the entry `name` inside the directory `dirfd`.
///
/// The change is applied with `AT_SYMLINK_NOFOLLOW`, so a symbolic link has
/// its own ownership changed rather than its target's. `destination` is only
/// used for diagnostics.
pub fn chown_at<Fd: AsFd>(
    dirfd: Fd,
    name: &OsStr,
    destination: &Path,
    uid: u32,
    gid: u32,
) -> Result<(), MetadataError> {
    unix_fs::chownat(
        dirfd,
        name,
        Some(uid_from_raw(uid as RawUid)),
        Some(gid_from_raw(gid as RawGid)),
        AtFlags::SYMLINK_NOFOLLOW,
    )
    .map_err(|error| MetadataError::new("preserve ownership", destination, io::Error::from(error)))
}

/// Assigns `uid`/`gid` to an already-open descriptor.
///
/// Used for regular files, where the destination descriptor is created with
/// `O_EXCL` and therefore cannot have been swapped for another object.
pub fn chown_fd<Fd: AsFd>(
    fd: Fd,
    destination: &Path,
    uid: u32,
    gid: u32,
) -> Result<(), MetadataError> {
    unix_fs::fchown(
        fd,
        Some(uid_from_raw(uid as RawUid)),
        Some(gid_from_raw(gid as RawGid)),
    )
    .map_err(|error| MetadataError::new("preserve ownership", destination, io::Error::from(error)))
}
