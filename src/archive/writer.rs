//! Tar archive writer
//!
//! Walks a source tree and streams it into a compressed tarball. Individual
//! entries that cannot be opened are logged and left out; the archive is still
//! committed with everything else. A file that fails or shrinks mid-read keeps
//! its header size and is zero-padded, so later entries stay readable.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use tracing::{debug, error};
use xz2::write::XzEncoder;

use crate::error::{RotationError, RotationResult};
use crate::models::Compression;

/// xz preset used for lzma archives
const XZ_PRESET: u32 = 6;

/// Result of a single `create` call that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new archive was written
    Created(ArchiveReport),
    /// The destination already existed and was left untouched
    Skipped,
}

/// A source entry that could not be archived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of adding one filesystem object to the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Added,
    Failed(EntryFailure),
}

/// Aggregate of every entry outcome in one archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Entries written, including directories
    pub entries_added: usize,
    /// Entries that were skipped because of an error
    pub failures: Vec<EntryFailure>,
}

impl ArchiveReport {
    fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Added => self.entries_added += 1,
            EntryOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    fn record_failure(&mut self, path: &Path, err: impl std::fmt::Display) {
        self.record(failed(path, err));
    }

    /// Check if every entry made it into the archive
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Capability to materialize a compressed archive of a directory tree
pub trait ArchiveWriter {
    /// Archive `source` into `destination`
    ///
    /// Returns `Skipped` without touching anything when `destination`
    /// already exists.
    fn create(
        &self,
        source: &Path,
        destination: &Path,
        compression: Compression,
    ) -> RotationResult<CreateOutcome>;

    /// Delete an archive that fell out of retention
    fn remove(&self, archive: &Path) -> RotationResult<()> {
        fs::remove_file(archive).map_err(|e| {
            RotationError::Io(format!("Failed to delete {}: {}", archive.display(), e))
        })
    }
}

/// Writes `.tar.{gz,bz2,xz}` archives to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct TarArchiveWriter;

impl TarArchiveWriter {
    /// Create a new TarArchiveWriter
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveWriter for TarArchiveWriter {
    fn create(
        &self,
        source: &Path,
        destination: &Path,
        compression: Compression,
    ) -> RotationResult<CreateOutcome> {
        if fs::symlink_metadata(destination).is_ok() {
            debug!(archive = %destination.display(), "Archive already exists");
            return Ok(CreateOutcome::Skipped);
        }

        if !source.is_dir() {
            return Err(RotationError::directory_not_found(
                source.display().to_string(),
            ));
        }

        // Write to a hidden sibling, then rename into place
        let partial = partial_path(destination)?;
        let file = File::create(&partial).map_err(|e| {
            RotationError::Archive(format!(
                "Failed to create {}: {}",
                partial.display(),
                e
            ))
        })?;

        let report = match write_archive(file, source, compression) {
            Ok(report) => report,
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
        };

        fs::rename(&partial, destination).map_err(|e| {
            let _ = fs::remove_file(&partial);
            RotationError::Archive(format!(
                "Failed to move archive into place at {}: {}",
                destination.display(),
                e
            ))
        })?;

        Ok(CreateOutcome::Created(report))
    }
}

/// `.<name>.partial` next to the final archive
fn partial_path(destination: &Path) -> RotationResult<PathBuf> {
    let name = destination.file_name().ok_or_else(|| {
        RotationError::Archive(format!("Invalid archive path: {}", destination.display()))
    })?;
    Ok(destination.with_file_name(format!(".{}.partial", name.to_string_lossy())))
}

fn write_archive(
    file: File,
    source: &Path,
    compression: Compression,
) -> RotationResult<ArchiveReport> {
    let root = source
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let (file, report) = match compression {
        Compression::Gzip => {
            let encoder = GzEncoder::new(file, flate2::Compression::default());
            let (encoder, report) = build_tar(encoder, source, &root)?;
            (encoder.finish().map_err(finish_error)?, report)
        }
        Compression::Bzip2 => {
            let encoder = BzEncoder::new(file, bzip2::Compression::best());
            let (encoder, report) = build_tar(encoder, source, &root)?;
            (encoder.finish().map_err(finish_error)?, report)
        }
        Compression::Lzma => {
            let encoder = XzEncoder::new(file, XZ_PRESET);
            let (encoder, report) = build_tar(encoder, source, &root)?;
            (encoder.finish().map_err(finish_error)?, report)
        }
    };

    file.sync_all()
        .map_err(|e| RotationError::Archive(format!("Failed to sync archive: {}", e)))?;

    Ok(report)
}

fn finish_error(err: std::io::Error) -> RotationError {
    RotationError::Archive(format!("Failed to finish compression stream: {}", err))
}

fn build_tar<W: Write>(
    writer: W,
    source: &Path,
    root: &Path,
) -> RotationResult<(W, ArchiveReport)> {
    let mut builder = tar::Builder::new(writer);
    builder.follow_symlinks(false);

    let mut report = ArchiveReport::default();
    report.record(append_root(&mut builder, source, root));
    walk(&mut builder, source, root, &mut report);

    let writer = builder
        .into_inner()
        .map_err(|e| RotationError::Archive(format!("Failed to finish tar stream: {}", e)))?;

    Ok((writer, report))
}

/// Depth-first traversal; entries are sorted by name within each directory
fn walk<W: Write>(
    builder: &mut tar::Builder<W>,
    dir: &Path,
    name: &Path,
    report: &mut ArchiveReport,
) {
    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(e) => {
            report.record_failure(dir, e);
            return;
        }
    };

    let mut entries = Vec::new();
    for entry in listing {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => report.record_failure(dir, e),
        }
    }
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let entry_name = name.join(entry.file_name());

        // DirEntry::file_type does not follow symlinks
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        let outcome = append_entry(builder, &path, &entry_name);
        let added = outcome == EntryOutcome::Added;
        report.record(outcome);

        if is_dir && added {
            walk(builder, &path, &entry_name, report);
        }
    }
}

/// The root is always stored as a directory, even when `source` is a symlink
fn append_root<W: Write>(
    builder: &mut tar::Builder<W>,
    source: &Path,
    root: &Path,
) -> EntryOutcome {
    match builder.append_dir(root, source) {
        Ok(()) => EntryOutcome::Added,
        Err(e) => failed(source, e),
    }
}

fn append_entry<W: Write>(
    builder: &mut tar::Builder<W>,
    path: &Path,
    name: &Path,
) -> EntryOutcome {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => return failed(path, e),
    };

    if !metadata.is_file() {
        return match builder.append_path_with_name(path, name) {
            Ok(()) => EntryOutcome::Added,
            Err(e) => failed(path, e),
        };
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return failed(path, e),
    };

    // The header promises `len` bytes; the body must deliver exactly that many
    let mut header = tar::Header::new_gnu();
    header.set_metadata_in_mode(&metadata, tar::HeaderMode::Complete);
    let mut body = PaddedReader::new(file, metadata.len());

    match builder.append_data(&mut header, name, &mut body) {
        Ok(()) => match body.fault {
            None => EntryOutcome::Added,
            Some(fault) => failed(path, format!("{}; entry zero-padded", fault)),
        },
        Err(e) => failed(path, e),
    }
}

/// Yields exactly `remaining` bytes of `inner`, then zeros if it ends early
/// or a read fails
struct PaddedReader<R> {
    inner: R,
    remaining: u64,
    fault: Option<String>,
}

impl<R: Read> PaddedReader<R> {
    fn new(inner: R, len: u64) -> Self {
        Self {
            inner,
            remaining: len,
            fault: None,
        }
    }
}

impl<R: Read> Read for PaddedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));

        if self.fault.is_none() {
            match self.inner.read(&mut buf[..max]) {
                Ok(0) => self.fault = Some("file shrank while archiving".to_string()),
                Ok(n) => {
                    self.remaining -= n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => return Err(e),
                Err(e) => self.fault = Some(format!("read failed: {}", e)),
            }
        }

        buf[..max].fill(0);
        self.remaining -= max as u64;
        Ok(max)
    }
}

fn failed(path: &Path, err: impl std::fmt::Display) -> EntryOutcome {
    error!(path = %path.display(), "Failed to archive entry: {}", err);
    EntryOutcome::Failed(EntryFailure {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
