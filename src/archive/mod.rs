//! Archive creation for backup-rotation
//!
//! # Archive Format
//!
//! Each snapshot is a tarball of the whole source tree, rooted at the source
//! directory's base name and compressed with gzip, bzip2 or xz. Regular
//! files, directories, symlinks and device nodes are stored using their
//! native tar entry types; symlinks are never followed.
//!
//! Archives are written to a hidden `.partial` file and renamed into place
//! once the compression stream is finished and synced, so a finished name
//! always refers to a complete archive.
//!
//! # Example
//!
//! ```rust,ignore
//! use backup_rotation::archive::{ArchiveWriter, CreateOutcome, TarArchiveWriter};
//!
//! let writer = TarArchiveWriter::new();
//! match writer.create(&source, &dest, Compression::Gzip)? {
//!     CreateOutcome::Created(report) => println!("{} entries", report.entries_added),
//!     CreateOutcome::Skipped => println!("already there"),
//! }
//! ```

mod writer;

pub use writer::{
    ArchiveReport, ArchiveWriter, CreateOutcome, EntryFailure, EntryOutcome, TarArchiveWriter,
};
