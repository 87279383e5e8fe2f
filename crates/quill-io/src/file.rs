//! Whole-file loaders.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use quill_arena::{Allocation, Arena, ArenaError};
use tracing::{debug, warn};

use crate::error::FileError;

/// File contents held in an arena.
///
/// The allocation is `len() + 1` bytes: the contents followed by a NUL.
/// It stops resolving once the arena is reset, or when the scratch window
/// it was loaded in closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaFile {
    alloc: Allocation,
    len: usize,
}

impl ArenaFile {
    /// File size in bytes, not counting the terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the file was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The underlying arena allocation, terminator included.
    pub fn allocation(&self) -> Allocation {
        self.alloc
    }

    /// The file contents without the terminator.
    pub fn bytes<'a>(&self, arena: &'a Arena) -> Option<&'a [u8]> {
        Some(&arena.bytes(&self.alloc)?[..self.len])
    }

    /// The file contents followed by the NUL terminator.
    pub fn with_nul<'a>(&self, arena: &'a Arena) -> Option<&'a [u8]> {
        arena.bytes(&self.alloc)
    }
}

/// File contents held on the heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapFile {
    /// Contents followed by a NUL.
    data: Vec<u8>,
}

impl HeapFile {
    /// File size in bytes, not counting the terminator.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    /// Whether the file was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The file contents without the terminator.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// The file contents followed by the NUL terminator.
    pub fn with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the buffer, terminator included.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// A loaded file, wherever it was placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadedFile {
    /// Loaded into an arena.
    Arena(ArenaFile),
    /// Loaded onto the heap.
    Heap(HeapFile),
}

impl LoadedFile {
    /// File size in bytes, not counting the terminator.
    pub fn len(&self) -> usize {
        match self {
            Self::Arena(file) => file.len(),
            Self::Heap(file) => file.len(),
        }
    }

    /// Whether the file was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load a file into `arena` if one is given, otherwise onto the heap.
pub fn read_file(
    arena: Option<&mut Arena>,
    path: impl AsRef<Path>,
) -> Result<LoadedFile, FileError> {
    match arena {
        Some(arena) => read_to_arena(arena, path).map(LoadedFile::Arena),
        None => read_to_heap(path).map(LoadedFile::Heap),
    }
}

/// Load a file into an arena allocation.
///
/// Files that would not fit in one block (with their terminator) are
/// rejected with [`FileError::TooLarge`] before anything is allocated. A
/// failed read leaves the allocation unreachable until the arena is reset.
pub fn read_to_arena(arena: &mut Arena, path: impl AsRef<Path>) -> Result<ArenaFile, FileError> {
    let path = path.as_ref();
    let result = load_into_arena(arena, path);
    report(path, result)
}

/// Load a file into a heap buffer.
pub fn read_to_heap(path: impl AsRef<Path>) -> Result<HeapFile, FileError> {
    let path = path.as_ref();
    let result = load_onto_heap(path);
    report(path, result)
}

fn load_into_arena(arena: &mut Arena, path: &Path) -> Result<ArenaFile, FileError> {
    let (mut file, size) = open(path)?;
    let limit = arena.config().usable_block_bytes() - 1;
    let len = usize::try_from(size)
        .ok()
        .filter(|&len| len <= limit)
        .ok_or_else(|| FileError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        })?;

    let alloc = arena.allocate(len + 1)?;
    let buf = arena
        .bytes_mut(&alloc)
        .ok_or_else(|| ArenaError::Corrupted {
            reason: format!("fresh allocation {alloc} did not resolve"),
        })?;
    fill(&mut file, path, &mut buf[..len])?;
    buf[len] = 0;

    debug!(path = %path.display(), len, block = %alloc.block(), "loaded file into arena");
    Ok(ArenaFile { alloc, len })
}

fn load_onto_heap(path: &Path) -> Result<HeapFile, FileError> {
    let (mut file, size) = open(path)?;
    let len = usize::try_from(size).map_err(|_| FileError::TooLarge {
        path: path.to_path_buf(),
        size,
        limit: usize::MAX,
    })?;

    let mut data = vec![0u8; len + 1];
    fill(&mut file, path, &mut data[..len])?;

    debug!(path = %path.display(), len, "loaded file onto heap");
    Ok(HeapFile { data })
}

fn open(path: &Path) -> Result<(File, u64), FileError> {
    let open_err = |source| FileError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    let size = file.metadata().map_err(open_err)?.len();
    Ok((file, size))
}

/// Read until `buf` is full, failing if the file ends first.
fn fill(file: &mut File, path: &Path, buf: &mut [u8]) -> Result<(), FileError> {
    let mut read = 0;
    while read < buf.len() {
        match file.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(FileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    if read != buf.len() {
        return Err(FileError::ShortRead {
            path: path.to_path_buf(),
            expected: buf.len(),
            read,
        });
    }
    Ok(())
}

fn report<T>(path: &Path, result: Result<T, FileError>) -> Result<T, FileError> {
    if let Err(err) = &result {
        warn!(path = %path.display(), error = %err, "failed to load file");
    }
    result
}
