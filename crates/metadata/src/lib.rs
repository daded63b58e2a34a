#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` provides the metadata preservation primitives used when a
//! skeleton directory is reproduced inside a freshly provisioned home
//! directory: ownership remapping, permission bits, nanosecond timestamps,
//! extended attributes, POSIX ACLs, and security label assignment.
//!
//! Every filesystem mutation in this crate is directory-relative (an open
//! directory descriptor plus an entry name) or descriptor-based, and uses the
//! "do not follow symlinks" variant of the underlying syscall wherever one
//! exists. Callers that honour the same rule are immune to symlink races on
//! the paths they mutate, which matters because the surrounding tooling runs
//! with full privileges.
//!
//! # Design
//!
//! - [`ownership`] computes effective UID/GID values from a remap policy and
//!   applies them through `fchownat`/`fchown`.
//! - [`apply`] covers permission bits and timestamps.
//! - [`copy_xattrs`] and [`copy_acls`] copy attributes between two open
//!   descriptors. Both are feature-gated; when the `xattr`/`acl` features are
//!   disabled a no-op implementation with the same signature is substituted,
//!   so callers never branch on feature presence.
//! - [`LabelPolicy`] is the seam for mandatory-access-control labelling.
//!   [`NoopLabel`] is used when no labelling subsystem is available.
//!
//! # Errors
//!
//! All fallible operations return [`MetadataError`], which carries the
//! attempted action, the offending path, and the underlying [`std::io::Error`].
//! Attribute copies on filesystems without attribute support surface an error
//! for which [`MetadataError::is_unsupported`] returns `true`; callers are
//! expected to treat that outcome as "nothing to copy" rather than a failure.

mod error;

pub mod apply;
pub mod label;
pub mod ownership;

#[cfg(any(feature = "acl", feature = "xattr"))]
mod attr_filter;

#[cfg(feature = "acl")]
#[path = "acl.rs"]
mod acl_impl;
#[cfg(not(feature = "acl"))]
#[path = "acl_noop.rs"]
mod acl_impl;

#[cfg(feature = "xattr")]
#[path = "xattr.rs"]
mod xattr_impl;
#[cfg(not(feature = "xattr"))]
#[path = "xattr_stub.rs"]
mod xattr_impl;

pub use acl_impl::copy_acls;
pub use error::MetadataError;
pub use label::{LabelPolicy, NoopLabel};
pub use ownership::{IdRemap, OwnershipRemap};
pub use xattr_impl::copy_xattrs;

pub use rustix::fs::FileType;
