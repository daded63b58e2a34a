#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `treecopy` reproduces a directory tree at a destination, the way an
//! account-provisioning tool populates a new user's home directory from a
//! skeleton: regular files, directories, symbolic links, hard links, and
//! special files are recreated with their permission bits, timestamps, and
//! (optionally) ACLs, extended attributes, and security labels, while
//! ownership is remapped according to policy. Pre-existing destination
//! entries are never overwritten; pre-existing destination directories are
//! merged into.
//!
//! # Design
//!
//! - Every destination-side filesystem call is directory-relative (an open
//!   directory descriptor plus an entry name) and refuses to follow a final
//!   symlink. The engine therefore cannot be redirected through a planted
//!   symlink even while running with full privileges against a concurrently
//!   modified filesystem.
//! - Source inodes with more than one link are tracked per traversal so the
//!   destination reproduces the source's hard link topology instead of
//!   duplicating content.
//! - Symbolic link targets that point inside the copied tree are rewritten
//!   to point inside the destination tree; all other targets, dangling ones
//!   included, are preserved verbatim.
//! - New objects are created restrictive-first (directories at 0700, files
//!   at 0600) and only widened after their ownership is in place.
//!
//! # Errors
//!
//! A failing entry does not stop the traversal: the failure is reported on
//! the `treecopy::entry` diagnostic target and enumeration continues with
//! the entry's siblings. The whole copy then fails with
//! [`TreeCopyError::Incomplete`], leaving the partially populated
//! destination in place for the caller to keep or remove. Only root-level
//! problems (a pre-existing destination root when root creation was
//! requested, a source root that is not a directory, unopenable roots)
//! abort immediately.
//!
//! # Examples
//!
//! Provision a home directory from a skeleton, remapping root-owned entries
//! to the new account:
//!
//! ```
//! use treecopy::{copy_tree, CopyOptions};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let skel = temp.path().join("skel");
//! fs::create_dir(&skel)?;
//! fs::write(skel.join(".profile"), "# login shell setup\n")?;
//!
//! let home = temp.path().join("home");
//! let options = CopyOptions::new()
//!     .copy_root(true)
//!     .map_uid(Some(0), Some(1042))
//!     .map_gid(Some(0), Some(1042));
//! let summary = copy_tree(&skel, &home, &options)?;
//!
//! assert!(home.join(".profile").is_file());
//! assert_eq!(summary.files(), 1);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod context;
mod entry;
mod error;
mod hardlinks;
mod options;
mod path_pair;
mod summary;
mod walker;

pub use error::{CopyEntryError, TreeCopyError};
pub use options::CopyOptions;
pub use summary::CopySummary;
pub use walker::copy_tree;

pub use metadata::{FileType, IdRemap, LabelPolicy, MetadataError, NoopLabel, OwnershipRemap};
