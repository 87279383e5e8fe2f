//! Small collections and utilities that sit beside the Quill arena.
//!
//! Neither type allocates from a `quill-arena` arena; both manage their own
//! memory.
//!
//! - [`GrowableBuffer`]: contiguous typed buffer with doubling growth.
//! - [`Pcg32`]: deterministic PCG-XSH-RR pseudo-random generator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod prng;

pub use buffer::GrowableBuffer;
pub use prng::Pcg32;
