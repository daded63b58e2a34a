//! Attribute-name classification shared by the xattr and ACL copiers.

/// Extended attribute names that encode POSIX ACLs (and their NFSv4
/// equivalent). These are copied by the ACL copier and excluded from the
/// plain extended-attribute copier, so the two subsystems never overlap.
pub(crate) const ACL_ATTRIBUTES: &[&str] = &[
    "system.posix_acl_access",
    "system.posix_acl_default",
    "system.nfs4_acl",
];
