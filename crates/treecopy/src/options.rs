use std::fmt;

use metadata::{IdRemap, LabelPolicy, NoopLabel, OwnershipRemap};

/// Configuration for one tree copy.
///
/// The builder mirrors the knobs the surrounding account-provisioning tool
/// exposes: whether the destination root itself must be created, whether the
/// security label state should be reset instead of preserved, and the
/// ownership remap applied to every copied entry.
///
/// # Examples
///
/// Remap everything owned by root to the new account and create the
/// destination root:
///
/// ```
/// use treecopy::CopyOptions;
///
/// let options = CopyOptions::new()
///     .copy_root(true)
///     .map_uid(Some(0), Some(1042))
///     .map_gid(Some(0), Some(1042));
/// assert!(options.copy_root_enabled());
/// ```
pub struct CopyOptions {
    copy_root: bool,
    reset_label: bool,
    remap: OwnershipRemap,
    label: Box<dyn LabelPolicy>,
}

impl CopyOptions {
    /// Creates the default configuration: merge into an existing destination
    /// root, preserve labels and attributes, change no ownership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the destination root itself be created.
    ///
    /// When enabled, the copy fails up front if the destination root already
    /// exists or the source root is not a directory.
    #[must_use]
    pub fn copy_root(mut self, enabled: bool) -> Self {
        self.copy_root = enabled;
        self
    }

    /// Requests fresh security labels instead of preserved attributes.
    ///
    /// A relabel is a deliberate attribute replacement, so extended attribute
    /// copying is skipped entirely while this is enabled. ACLs are still
    /// copied.
    #[must_use]
    pub fn reset_label(mut self, enabled: bool) -> Self {
        self.reset_label = enabled;
        self
    }

    /// Sets the UID remap. `old = None` matches every owner; `new = None`
    /// never changes ownership.
    #[must_use]
    pub fn map_uid(mut self, old: Option<u32>, new: Option<u32>) -> Self {
        self.remap = OwnershipRemap::new(IdRemap::new(old, new), self.remap.gid());
        self
    }

    /// Sets the GID remap. `old = None` matches every group; `new = None`
    /// never changes group ownership.
    #[must_use]
    pub fn map_gid(mut self, old: Option<u32>, new: Option<u32>) -> Self {
        self.remap = OwnershipRemap::new(self.remap.uid(), IdRemap::new(old, new));
        self
    }

    /// Installs a security labelling policy.
    #[must_use]
    pub fn label_policy(mut self, label: Box<dyn LabelPolicy>) -> Self {
        self.label = label;
        self
    }

    /// Returns whether the destination root itself will be created.
    #[must_use]
    pub fn copy_root_enabled(&self) -> bool {
        self.copy_root
    }

    /// Returns whether extended attributes are skipped in favour of fresh
    /// labels.
    #[must_use]
    pub fn reset_label_enabled(&self) -> bool {
        self.reset_label
    }

    /// Returns the ownership remap applied to every entry.
    #[must_use]
    pub fn remap(&self) -> &OwnershipRemap {
        &self.remap
    }

    /// Returns the installed labelling policy.
    #[must_use]
    pub fn label(&self) -> &dyn LabelPolicy {
        self.label.as_ref()
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            copy_root: false,
            reset_label: false,
            remap: OwnershipRemap::default(),
            label: Box::new(NoopLabel),
        }
    }
}

impl fmt::Debug for CopyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopyOptions")
            .field("copy_root", &self.copy_root)
            .field("reset_label", &self.reset_label)
            .field("remap", &self.remap)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_inert() {
        let options = CopyOptions::new();
        assert!(!options.copy_root_enabled());
        assert!(!options.reset_label_enabled());
        assert_eq!(options.remap().resolve(10, 20), (10, 20));
    }

    #[test]
    fn remap_axes_are_independent() {
        let options = CopyOptions::new()
            .map_uid(Some(0), Some(500))
            .map_gid(None, Some(100));
        assert_eq!(options.remap().resolve(0, 0), (500, 100));
        assert_eq!(options.remap().resolve(3, 0), (3, 100));
    }
}
