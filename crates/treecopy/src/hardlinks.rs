//! Hard link bookkeeping for one traversal.
//!
//! A source inode with more than one link is visited once per name during a
//! single-pass walk. The registry turns the second and later visits into
//! `link` calls against the destination path created by the first visit, so
//! the destination tree reproduces the source's hard link topology instead of
//! holding duplicate content. Links whose other names lie outside the
//! traversed tree cannot be detected and are copied as independent files.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use rustix::fs::Stat;

/// Inode identity and link count extracted from a stat result.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InodeId {
    device: u64,
    inode: u64,
    links: u64,
}

impl InodeId {
    pub(crate) fn of(stat: &Stat) -> Self {
        Self {
            device: stat.st_dev as u64,
            inode: stat.st_ino as u64,
            links: stat.st_nlink as u64,
        }
    }

    #[cfg(test)]
    pub(crate) fn synthetic(device: u64, inode: u64, links: u64) -> Self {
        Self {
            device,
            inode,
            links,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct InodeKey {
    device: u64,
    inode: u64,
}

impl From<InodeId> for InodeKey {
    fn from(id: InodeId) -> Self {
        Self {
            device: id.device,
            inode: id.inode,
        }
    }
}

struct LinkRecord {
    remaining: u64,
    destination: PathBuf,
}

/// Table of multi-link source inodes not yet fully linked at the destination.
///
/// Scoped to a single top-level tree copy; at most one record per
/// (device, inode) pair is live at a time.
#[derive(Default)]
pub(crate) struct HardlinkRegistry {
    entries: FxHashMap<InodeKey, LinkRecord>,
}

impl HardlinkRegistry {
    /// Looks up `id`, registering it on first encounter.
    ///
    /// Returns the destination path created for this inode when the entry is
    /// a repeat visit; the caller must recreate a hard link rather than copy
    /// content. Returns `None` when the entry is the inode's first visit (or
    /// its only name) and must be copied normally; multi-link inodes are
    /// registered under `destination` so later visits find them.
    pub(crate) fn check(&mut self, id: InodeId, destination: PathBuf) -> Option<PathBuf> {
        let key = InodeKey::from(id);
        if let Some(record) = self.entries.get(&key) {
            return Some(record.destination.clone());
        }

        if id.links <= 1 {
            return None;
        }

        self.entries.insert(
            key,
            LinkRecord {
                remaining: id.links,
                destination,
            },
        );
        None
    }

    /// Releases one reference after a successful link creation, dropping the
    /// record once no references remain.
    pub(crate) fn release(&mut self, id: InodeId) {
        let key = InodeKey::from(id);
        if let Some(record) = self.entries.get_mut(&key) {
            record.remaining = record.remaining.saturating_sub(1);
            if record.remaining == 0 {
                self.entries.remove(&key);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
