//! Quill: a region-based arena allocator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Quill sub-crates. For most users, adding `quill` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use quill::prelude::*;
//!
//! let mut arena = Arena::new(ArenaConfig::new(1024)).unwrap();
//! let name = arena.allocate_copy(b"vertex.glsl").unwrap();
//!
//! // Temporary work that is thrown away when the guard drops.
//! {
//!     let mut scratch = arena.scratch();
//!     let tmp = scratch.allocate_zeroed(256).unwrap();
//!     assert_eq!(scratch.bytes(&tmp).unwrap()[0], 0);
//! }
//! assert_eq!(arena.stats().total_bytes, 11);
//! assert_eq!(arena.bytes(&name), Some(&b"vertex.glsl"[..]));
//!
//! // Start over: the blocks are kept, the handles die.
//! arena.reset();
//! assert!(arena.bytes(&name).is_none());
//!
//! let mut rng = Pcg32::new(42, 54);
//! let mut rolls = GrowableBuffer::new();
//! for _ in 0..100 {
//!     rolls.push(rng.range_u32(1, 6));
//! }
//! assert!(rolls.iter().all(|&r| (1..=6).contains(&r)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `quill-arena` | Arena, handles, freelist, scratch checkpoints, stats |
//! | [`collections`] | `quill-collections` | Growable buffer and PCG32 generator |
//! | [`io`] | `quill-io` | Whole-file loading into an arena or the heap |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The arena allocator (`quill-arena`).
///
/// [`arena::Arena`] and its configuration are also in the [`prelude`];
/// the freelist and block diagnostics live here.
pub use quill_arena as arena;

/// Companion collections (`quill-collections`).
pub use quill_collections as collections;

/// File loading (`quill-io`).
///
/// [`io::read_file`] places a file in an arena when given one, otherwise on
/// the heap.
pub use quill_io as io;

/// Common imports for typical Quill usage.
///
/// ```rust
/// use quill::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use quill_arena::{Allocation, Arena, ArenaConfig, ArenaStats, BlockId, ScratchGuard};

    // Errors
    pub use quill_arena::ArenaError;
    pub use quill_io::FileError;

    // Collections
    pub use quill_collections::{GrowableBuffer, Pcg32};

    // Files
    pub use quill_io::{read_file, LoadedFile};
}
