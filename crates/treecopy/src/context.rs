//! Per-copy traversal state.
//!
//! One [`TraversalContext`] exists per top-level tree copy and is threaded by
//! mutable reference through every recursive call, so the traversal is
//! re-entrant and testable in isolation. It owns the original root paths
//! (needed to rewrite symlink targets and hard link destinations that point
//! inside the copied tree) plus the hard link registry, the running summary,
//! and the failure accumulator.

use std::ffi::OsString;
use std::io;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use metadata::{FileType, OwnershipRemap};

use crate::error::CopyEntryError;
use crate::hardlinks::HardlinkRegistry;
use crate::options::CopyOptions;
use crate::summary::CopySummary;

pub(crate) struct TraversalContext<'a> {
    source_root: PathBuf,
    destination_root: PathBuf,
    options: &'a CopyOptions,
    links: HardlinkRegistry,
    summary: CopySummary,
}

impl<'a> TraversalContext<'a> {
    pub(crate) fn new(source_root: &Path, destination_root: &Path, options: &'a CopyOptions) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            destination_root: destination_root.to_path_buf(),
            options,
            links: HardlinkRegistry::default(),
            summary: CopySummary::default(),
        }
    }

    pub(crate) fn remap(&self) -> &OwnershipRemap {
        self.options.remap()
    }

    pub(crate) fn reset_label(&self) -> bool {
        self.options.reset_label_enabled()
    }

    /// Stages the security label for an object about to be created.
    pub(crate) fn prepare_label(
        &self,
        destination: &Path,
        file_type: FileType,
    ) -> Result<(), CopyEntryError> {
        self.options
            .label()
            .prepare(destination, file_type)
            .map_err(|error| CopyEntryError::io("assign security label", destination, error))
    }

    pub(crate) fn links_mut(&mut self) -> &mut HardlinkRegistry {
        &mut self.links
    }

    pub(crate) fn summary_mut(&mut self) -> &mut CopySummary {
        &mut self.summary
    }

    pub(crate) fn record_failure(&mut self) {
        self.summary.record_failure();
    }

    pub(crate) fn failures(&self) -> usize {
        self.summary.failures()
    }

    pub(crate) fn into_summary(self) -> CopySummary {
        self.summary
    }

    /// Resets the label context once at the end of the top-level call.
    pub(crate) fn finish_labels(&self) -> io::Result<()> {
        self.options.label().reset()
    }

    /// Maps a path inside the source tree to its destination counterpart by
    /// substituting the source-root prefix with the destination root.
    ///
    /// The substitution is a plain byte-prefix match against the root path as
    /// it was passed in, matching how symlink targets are rewritten. Paths
    /// outside the source tree come back unchanged.
    pub(crate) fn destination_for(&self, source_path: &Path) -> PathBuf {
        let source = source_path.as_os_str().as_bytes();
        let root = self.source_root.as_os_str().as_bytes();
        match source.strip_prefix(root) {
            Some(suffix) => {
                let mut destination = self.destination_root.as_os_str().as_bytes().to_vec();
                destination.extend_from_slice(suffix);
                PathBuf::from(OsString::from_vec(destination))
            }
            None => source_path.to_path_buf(),
        }
    }

    /// Rewrites a symlink target that points inside the source tree so the
    /// recreated link stays inside the destination tree. Targets outside the
    /// tree, including dangling ones, are preserved verbatim.
    pub(crate) fn rewrite_link_target(&self, target: OsString) -> OsString {
        let bytes = target.as_bytes();
        let root = self.source_root.as_os_str().as_bytes();
        match bytes.strip_prefix(root) {
            Some(suffix) => {
                let mut rewritten = self.destination_root.as_os_str().as_bytes().to_vec();
                rewritten.extend_from_slice(suffix);
                OsString::from_vec(rewritten)
            }
            None => target,
        }
    }
}
