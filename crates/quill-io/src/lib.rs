//! File loading for Quill.
//!
//! Reads whole files into memory, either into an [`Arena`] (the buffer then
//! lives exactly as long as the arena's current epoch) or onto the heap.
//! Loaded text is always NUL-terminated, and the reported length never
//! counts the terminator.
//!
//! I/O failures are the one recoverable condition around the arena: they
//! are logged as warnings and returned as [`FileError`] instead of aborting.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod file;

pub use error::FileError;
pub use file::{read_file, read_to_arena, read_to_heap, ArenaFile, HeapFile, LoadedFile};

#[doc(no_inline)]
pub use quill_arena::Arena;
