//! Security label assignment seam.
//!
//! Mandatory-access-control systems (SELinux being the usual one) want newly
//! created filesystem objects to carry the right label from the moment they
//! exist, which means the label context has to be staged *before* the
//! `mkdir`/`open`/`mknod` call that creates the object. The copy engine calls
//! [`LabelPolicy::prepare`] immediately before every creation and
//! [`LabelPolicy::reset`] once when a whole tree copy finishes, successful or
//! not.
//!
//! Platforms without a labelling subsystem plug in [`NoopLabel`]; the engine's
//! control flow never branches on whether labelling is real.

use std::io;
use std::path::Path;

use rustix::fs::FileType;

/// Staged security labelling for filesystem objects about to be created.
pub trait LabelPolicy {
    /// Stages the label for the object that is about to be created at
    /// `destination` with the given file type.
    fn prepare(&self, destination: &Path, file_type: FileType) -> io::Result<()>;

    /// Restores the default creation label.
    ///
    /// Called exactly once per tree copy, after the last entry has been
    /// processed, so later file creation by the surrounding process uses
    /// default labels again.
    fn reset(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Label policy for platforms without a labelling subsystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLabel;

impl LabelPolicy for NoopLabel {
    fn prepare(&self, _destination: &Path, _file_type: FileType) -> io::Result<()> {
        Ok(())
    }
}
