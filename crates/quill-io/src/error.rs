//! File loading errors.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use quill_arena::ArenaError;

/// Errors from loading a file into memory.
#[derive(Debug)]
pub enum FileError {
    /// The file could not be opened or its size queried.
    Open {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Reading the contents failed part-way.
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file ended before the size reported when it was opened.
    ShortRead {
        /// File being read.
        path: PathBuf,
        /// Bytes expected from the file's metadata.
        expected: usize,
        /// Bytes actually read.
        read: usize,
    },
    /// The file plus its terminator does not fit in one arena block.
    TooLarge {
        /// File being loaded.
        path: PathBuf,
        /// File size in bytes.
        size: u64,
        /// Largest file the target arena can hold.
        limit: usize,
    },
    /// The arena could not provide memory for the contents.
    Arena(ArenaError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open file {}: {source}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "failed to read file {}: {source}", path.display())
            }
            Self::ShortRead {
                path,
                expected,
                read,
            } => {
                write!(
                    f,
                    "failed to read full file {}: expected {expected} bytes, got {read}",
                    path.display()
                )
            }
            Self::TooLarge { path, size, limit } => {
                write!(
                    f,
                    "file {} is {size} bytes, arena blocks hold at most {limit}",
                    path.display()
                )
            }
            Self::Arena(err) => write!(f, "unable to allocate memory for file: {err}"),
        }
    }
}

impl Error for FileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Read { source, .. } => Some(source),
            Self::Arena(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArenaError> for FileError {
    fn from(err: ArenaError) -> Self {
        Self::Arena(err)
    }
}
