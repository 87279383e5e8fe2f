//! Single-level scratch checkpoints.
//!
//! A [`Checkpoint`] snapshots the arena's bump cursor and counters so a
//! burst of temporary allocations can be undone in O(1). Only one checkpoint
//! may be active at a time; there is no stack of levels.
//!
//! Each checkpoint opens a numbered window. Handles allocated inside it
//! carry the number and stop resolving once the window closes, since the
//! cursor hands their bytes out again.
//!
//! Restoring a checkpoint does not touch the freelist. Spans donated or
//! consumed while the checkpoint was active stay that way, so a span donated
//! from a block the cursor later rewinds into can describe bytes the bump
//! cursor will hand out again. Callers that mix scratch windows with block
//! rollover should reset the arena before relying on freelist contents.

use std::ops::{Deref, DerefMut};

use crate::arena::Arena;
use crate::handle::BlockId;

/// Saved arena cursor state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Block the cursor was in.
    pub block: BlockId,
    /// Byte offset of the cursor within `block`.
    pub index: usize,
    /// Allocated user bytes at capture time.
    pub total_bytes: usize,
    /// Allocation count at capture time.
    pub num_allocations: usize,
    /// Number of the scratch window this checkpoint opened.
    pub window: u64,
}

/// RAII scratch window.
///
/// Created by [`Arena::scratch`]. Begins a checkpoint on creation and
/// restores it on drop; dereferences to the arena so allocations can be
/// made through the guard.
///
/// ```
/// use quill_arena::Arena;
///
/// let mut arena = Arena::with_block_size(1024).unwrap();
/// let _kept = arena.allocate(100).unwrap();
/// {
///     let mut scratch = arena.scratch();
///     let _tmp = scratch.allocate(500).unwrap();
///     assert_eq!(scratch.stats().total_bytes, 600);
/// }
/// assert_eq!(arena.stats().total_bytes, 100);
/// ```
#[must_use]
pub struct ScratchGuard<'a> {
    arena: &'a mut Arena,
}

impl<'a> ScratchGuard<'a> {
    #[track_caller]
    pub(crate) fn new(arena: &'a mut Arena) -> Self {
        arena.scratch_begin();
        Self { arena }
    }
}

impl Deref for ScratchGuard<'_> {
    type Target = Arena;

    fn deref(&self) -> &Arena {
        self.arena
    }
}

impl DerefMut for ScratchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Arena {
        self.arena
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        // The window may already have been closed by hand through the guard.
        if self.arena.scratch_active() {
            self.arena.scratch_end();
        }
    }
}
