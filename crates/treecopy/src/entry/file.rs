//! Regular file copying.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use metadata::{apply, ownership, FileType};
use rustix::fs::{Stat, Timestamps};

use crate::context::TraversalContext;
use crate::error::CopyEntryError;
use crate::path_pair::PathPair;

use super::{apply_attribute_pair, CHUNK_SIZE};

/// Copies a regular file's metadata and contents.
///
/// The source is opened with `O_NOFOLLOW`, so a symlink racing into the
/// source name is rejected rather than followed. The destination is created
/// exclusively at mode 0600, and ownership plus the real permission bits are
/// applied on the open descriptor *before* any content is written: a crash
/// mid-copy can truncate the file but never leaves content readable under
/// the wrong permissions. Timestamps are applied after both descriptors are
/// closed.
pub(super) fn copy_file(
    ctx: &mut TraversalContext<'_>,
    src: &PathPair<'_>,
    dst: &PathPair<'_>,
    stat: &Stat,
    times: &Timestamps,
) -> Result<(), CopyEntryError> {
    let source_fd = src
        .open_read()
        .map_err(|error| CopyEntryError::io("open source file", src.full_path(), error))?;

    ctx.prepare_label(dst.full_path(), FileType::RegularFile)?;

    let destination_fd = dst
        .create_exclusive()
        .map_err(|error| CopyEntryError::io("create destination file", dst.full_path(), error))?;

    let mut source = File::from(source_fd);
    let mut destination = File::from(destination_fd);

    let (uid, gid) = ctx.remap().resolve(stat.st_uid, stat.st_gid);
    ownership::chown_fd(&destination, dst.full_path(), uid, gid)?;
    apply::set_mode_fd(&destination, dst.full_path(), stat.st_mode)?;
    apply_attribute_pair(
        ctx,
        &source,
        &destination,
        src.full_path(),
        dst.full_path(),
    )?;

    stream_contents(
        &mut source,
        &mut destination,
        src.full_path(),
        dst.full_path(),
    )?;

    drop(source);
    drop(destination);

    apply::set_times_at(dst.dirfd(), dst.name(), dst.full_path(), times)?;
    ctx.summary_mut().record_file();
    Ok(())
}

/// Streams file contents in fixed-size chunks.
///
/// Interrupted reads are retried; any other read or write failure aborts the
/// entry, leaving the destination truncated.
fn stream_contents(
    source: &mut File,
    destination: &mut File,
    source_path: &Path,
    destination_path: &Path,
) -> Result<(), CopyEntryError> {
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let count = match source.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(count) => count,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => {
                return Err(CopyEntryError::io("read file contents", source_path, error));
            }
        };

        destination
            .write_all(&buffer[..count])
            .map_err(|error| CopyEntryError::io("write file contents", destination_path, error))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn streaming_copies_content_larger_than_one_chunk() {
        let temp = tempdir().expect("tempdir");
        let source_path = temp.path().join("big.bin");
        let destination_path = temp.path().join("copy.bin");

        let payload: Vec<u8> = (0..3 * CHUNK_SIZE + 17).map(|i| (i % 251) as u8).collect();
        fs::write(&source_path, &payload).expect("write source");
        fs::write(&destination_path, b"").expect("create destination");

        let mut source = File::open(&source_path).expect("open source");
        let mut destination = File::options()
            .write(true)
            .open(&destination_path)
            .expect("open destination");

        stream_contents(
            &mut source,
            &mut destination,
            &source_path,
            &destination_path,
        )
        .expect("stream");

        assert_eq!(fs::read(&destination_path).expect("read copy"), payload);
    }
}
