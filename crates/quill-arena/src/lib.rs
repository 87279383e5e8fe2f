//! Region-based memory arena for Quill.
//!
//! Provides a bump allocator over chained fixed-size blocks, a size-sorted
//! freelist that recycles the tails of blocks the cursor has moved past, and
//! a single-level scratch checkpoint for temporary allocation scopes.
//!
//! # Architecture
//!
//! ```text
//! Arena (orchestrator)
//! ├── BlockChain → Block[] (fixed-size Box<[u8]>, 16-byte header each)
//! ├── bump cursor (current_block, current_index)
//! ├── Freelist (largest-first, index-linked FreeSpan nodes)
//! └── Option<Checkpoint> (single scratch level)
//! ```
//!
//! # Ownership
//!
//! The arena owns every block and every byte it hands out. Callers hold
//! [`Allocation`] handles; there is no individual free. Memory becomes
//! available again only through block-tail donation, [`Arena::reset`], or
//! dropping the arena.
//!
//! # Errors
//!
//! Running out of blocks ([`ArenaError::CapacityExceeded`],
//! [`ArenaError::BlockAllocationFailed`]) is reported as an error and
//! leaves the arena unchanged. Contract violations (zero-sized or oversized
//! requests, unbalanced scratch calls) panic at the caller's location.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod block;
pub mod config;
pub mod error;
pub mod freelist;
pub mod handle;
pub mod scratch;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::{ArenaConfig, BLOCK_HEADER_SIZE, FREELIST_NODE_SIZE};
pub use error::ArenaError;
pub use freelist::FreeSpan;
pub use handle::{Allocation, BlockId};
pub use scratch::{Checkpoint, ScratchGuard};
pub use stats::ArenaStats;
