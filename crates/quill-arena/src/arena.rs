//! The block-chained bump arena.
//!
//! [`Arena`] is the top-level allocator. It owns a [`BlockChain`], a bump
//! cursor into the current block, a worst-fit [`Freelist`] of spans left
//! behind by block rollover, and an optional scratch [`Checkpoint`].
//!
//! The allocation path per request is:
//! 1. Freelist: the first (largest-first) span that can hold the request.
//! 2. Bump: the remaining capacity of the current block.
//! 3. Rollover: donate the current block's tail to the freelist if it is
//!    big enough, move to the next block (reusing one retained from before a
//!    reset, or growing the chain), then bump.
//!
//! Nothing is ever moved or copied by the arena itself. `reset` and the
//! scratch operations only move cursors.

use std::fmt;

use tracing::{debug, info, trace};

use crate::block::BlockChain;
use crate::config::{ArenaConfig, BLOCK_HEADER_SIZE};
use crate::error::ArenaError;
use crate::freelist::{FreeSpan, Freelist, Grant};
use crate::handle::{Allocation, BlockId};
use crate::scratch::{Checkpoint, ScratchGuard};
use crate::stats::ArenaStats;

/// Single-owner region allocator over a chain of fixed-size blocks.
///
/// Allocations are returned as [`Allocation`] handles and resolved with
/// [`Arena::bytes`] / [`Arena::bytes_mut`]. There is no per-allocation free:
/// memory comes back through block-tail donation, [`Arena::reset`], or
/// dropping the arena.
///
/// The arena is not synchronised. Share it across threads only behind
/// external locking, or give each thread its own arena.
///
/// # Example
///
/// ```
/// use quill_arena::{Arena, ArenaConfig};
///
/// let mut arena = Arena::new(ArenaConfig::new(4096)).unwrap();
/// let greeting = arena.allocate_copy(b"hello").unwrap();
/// assert_eq!(arena.bytes(&greeting), Some(&b"hello"[..]));
///
/// arena.reset();
/// // Handles from before the reset no longer resolve.
/// assert!(arena.bytes(&greeting).is_none());
/// ```
pub struct Arena {
    chain: BlockChain,
    /// Block the bump cursor is in.
    current_block: BlockId,
    /// Offset of the next bump allocation in `current_block`.
    current_index: usize,
    freelist: Freelist,
    checkpoint: Option<Checkpoint>,
    total_bytes: usize,
    num_allocations: usize,
    wasted_bytes: usize,
    /// Incremented on every reset; stamped into handles and block headers.
    epoch: u64,
    /// Scratch windows opened so far.
    windows: u64,
    config: ArenaConfig,
}

impl Arena {
    /// Create an arena, allocating its first block.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` if the config fails
    /// [`ArenaConfig::validate`], or `Err(ArenaError::BlockAllocationFailed)`
    /// if the first block cannot be allocated.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let chain = BlockChain::new(config.block_size, config.max_blocks)?;
        debug!(
            block_size = config.block_size,
            max_blocks = ?config.max_blocks,
            "created arena"
        );
        Ok(Self {
            chain,
            current_block: BlockId(0),
            current_index: BLOCK_HEADER_SIZE,
            freelist: Freelist::new(),
            checkpoint: None,
            total_bytes: 0,
            num_allocations: 0,
            wasted_bytes: 0,
            epoch: 0,
            windows: 0,
            config,
        })
    }

    /// Create an arena with the given block size and default limits.
    pub fn with_block_size(block_size: usize) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig::new(block_size))
    }

    /// Allocate `size` uninitialised bytes.
    ///
    /// The bytes may hold data from before a reset or scratch restore.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when a new block is needed and cannot be had:
    /// [`ArenaError::CapacityExceeded`] at the `max_blocks` limit, or
    /// [`ArenaError::BlockAllocationFailed`] if the host allocator refuses.
    /// The arena is left unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or larger than
    /// [`ArenaConfig::usable_block_bytes`]: the arena was configured too
    /// small for the workload.
    #[track_caller]
    pub fn allocate(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        self.check_request(size);

        if let Some(grant) = self.freelist.take(size, self.config.min_free_span) {
            if let Grant::Whole(span) = grant {
                self.wasted_bytes += span.size - size;
            }
            let (block, offset) = grant.location();
            return Ok(self.record(block, offset, size));
        }

        if self.current_index + size > self.config.block_size {
            self.roll_over(size)?;
        }

        let offset = self.current_index;
        self.current_index += size;
        Ok(self.record(self.current_block, offset, size))
    }

    /// Allocate `size` bytes and zero exactly those bytes.
    ///
    /// Same errors and panics as [`Arena::allocate`].
    #[track_caller]
    pub fn allocate_zeroed(&mut self, size: usize) -> Result<Allocation, ArenaError> {
        let alloc = self.allocate(size)?;
        if let Some(bytes) = self.bytes_mut(&alloc) {
            bytes.fill(0);
        }
        Ok(alloc)
    }

    /// Allocate space for `data` and copy it in.
    ///
    /// Same errors and panics as [`Arena::allocate`], with `data.len()` as
    /// the request size.
    #[track_caller]
    pub fn allocate_copy(&mut self, data: &[u8]) -> Result<Allocation, ArenaError> {
        let alloc = self.allocate(data.len())?;
        if let Some(bytes) = self.bytes_mut(&alloc) {
            bytes.copy_from_slice(data);
        }
        Ok(alloc)
    }

    /// Resolve an allocation to its bytes.
    ///
    /// Returns `None` for handles from an earlier epoch (before a reset),
    /// from a scratch window that has since closed, or that do not describe
    /// a range in this arena.
    pub fn bytes(&self, alloc: &Allocation) -> Option<&[u8]> {
        if !self.is_live(alloc) {
            return None;
        }
        self.chain.get(alloc.block)?.slice(alloc.offset, alloc.len)
    }

    /// Resolve an allocation to its bytes, mutably.
    ///
    /// Returns `None` under the same conditions as [`Arena::bytes`].
    pub fn bytes_mut(&mut self, alloc: &Allocation) -> Option<&mut [u8]> {
        if !self.is_live(alloc) {
            return None;
        }
        self.chain
            .get_mut(alloc.block)?
            .slice_mut(alloc.offset, alloc.len)
    }

    /// Rewind to the start of the first block.
    ///
    /// Counters are cleared, the freelist is discarded, and any active
    /// scratch checkpoint is dropped. Blocks stay in the chain and are
    /// reused in order as allocation proceeds. Handles from before the reset
    /// stop resolving.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.current_block = BlockId(0);
        self.current_index = BLOCK_HEADER_SIZE;
        self.chain.restamp(0, self.epoch);
        self.freelist.clear();
        self.checkpoint = None;
        self.total_bytes = 0;
        self.num_allocations = 0;
        self.wasted_bytes = 0;
        debug!(epoch = self.epoch, blocks = self.chain.len(), "arena reset");
    }

    /// Free every block and consume the arena.
    ///
    /// Equivalent to dropping it; spelled out for call sites that want the
    /// teardown to be visible.
    pub fn destroy(self) {
        debug!(
            blocks = self.chain.len(),
            bytes = self.chain.memory_bytes(),
            "destroying arena"
        );
        drop(self);
    }

    /// Release blocks after the current one, returning how many were freed.
    ///
    /// Useful after a reset or scratch restore left retained blocks that
    /// will not be needed again. Freelist spans inside released blocks are
    /// dropped with them.
    pub fn trim(&mut self) -> usize {
        let keep = self.current_block.index() + 1;
        let released = self.chain.truncate(keep);
        if released > 0 {
            let dropped_spans = self.freelist.retain(|span| span.block.index() < keep);
            debug!(released, dropped_spans, blocks = keep, "trimmed block chain");
        }
        released
    }

    /// Save the cursor and counters so later allocations can be undone.
    ///
    /// # Panics
    ///
    /// Panics if a checkpoint is already active.
    #[track_caller]
    pub fn scratch_begin(&mut self) {
        assert!(
            self.checkpoint.is_none(),
            "a scratch checkpoint is already active"
        );
        self.windows += 1;
        self.checkpoint = Some(Checkpoint {
            block: self.current_block,
            index: self.current_index,
            total_bytes: self.total_bytes,
            num_allocations: self.num_allocations,
            window: self.windows,
        });
        trace!(
            block = %self.current_block,
            index = self.current_index,
            window = self.windows,
            "scratch checkpoint taken"
        );
    }

    /// Restore the saved cursor and counters.
    ///
    /// Allocations made since [`Arena::scratch_begin`] stop resolving and
    /// their bytes are handed out again; the bytes are not zeroed. The
    /// freelist is left as it is.
    ///
    /// # Panics
    ///
    /// Panics if no checkpoint is active.
    #[track_caller]
    pub fn scratch_end(&mut self) {
        let Some(checkpoint) = self.checkpoint.take() else {
            panic!("no scratch checkpoint is active");
        };
        self.current_block = checkpoint.block;
        self.current_index = checkpoint.index;
        self.total_bytes = checkpoint.total_bytes;
        self.num_allocations = checkpoint.num_allocations;
        trace!(
            block = %checkpoint.block,
            index = checkpoint.index,
            "scratch checkpoint restored"
        );
    }

    /// Open a scratch window that closes when the guard is dropped.
    ///
    /// # Panics
    ///
    /// Panics if a checkpoint is already active.
    #[track_caller]
    pub fn scratch(&mut self) -> ScratchGuard<'_> {
        ScratchGuard::new(self)
    }

    /// Whether a scratch checkpoint is active.
    pub fn scratch_active(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// The active scratch checkpoint, if any.
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    /// Snapshot of usage counters. Has no side effects.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            num_allocations: self.num_allocations,
            total_bytes: self.total_bytes,
            num_blocks: self.chain.len(),
            extra_blocks_allocated: self.chain.grown(),
            freelist_spans: self.freelist.len(),
            freelist_bytes: self.freelist.total_bytes(),
            wasted_bytes: self.wasted_bytes,
            block_size: self.config.block_size,
            metadata_bytes: self.chain.len() * BLOCK_HEADER_SIZE,
        }
    }

    /// Emit the current [`ArenaStats`] as an `info` event.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            num_allocations = stats.num_allocations,
            total_bytes = stats.total_bytes,
            num_blocks = stats.num_blocks,
            freelist_bytes = stats.freelist_bytes,
            wasted_bytes = stats.wasted_bytes,
            "{stats}"
        );
    }

    /// Verify cursor bounds, freelist links and spans, and block headers.
    pub fn check_integrity(&self) -> Result<(), ArenaError> {
        let corrupted = |reason: String| ArenaError::Corrupted { reason };
        let block_size = self.config.block_size;

        if self.current_block.index() >= self.chain.len() {
            return Err(corrupted(format!(
                "current block {} is past the end of a {}-block chain",
                self.current_block,
                self.chain.len(),
            )));
        }
        if !(BLOCK_HEADER_SIZE..=block_size).contains(&self.current_index) {
            return Err(corrupted(format!(
                "cursor {} outside [{BLOCK_HEADER_SIZE}, {block_size}]",
                self.current_index,
            )));
        }

        self.freelist.check_links().map_err(corrupted)?;
        for span in self.freelist.iter() {
            if span.block.index() >= self.chain.len()
                || span.offset < BLOCK_HEADER_SIZE
                || span.end() > block_size
                || span.size < self.config.min_free_span
            {
                return Err(corrupted(format!("free span {span:?} is out of bounds")));
            }
        }

        for (index, block) in self.chain.iter().enumerate() {
            let header = block.header();
            if header.index != index as u64 {
                return Err(corrupted(format!(
                    "block {index} header records index {}",
                    header.index
                )));
            }
            if index <= self.current_block.index() && header.epoch != self.epoch {
                return Err(corrupted(format!(
                    "block {index} header records epoch {}, arena is at {}",
                    header.epoch, self.epoch,
                )));
            }
        }
        Ok(())
    }

    /// The arena's configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Read access to the freelist.
    pub fn freelist(&self) -> &Freelist {
        &self.freelist
    }

    /// Freelist span sizes, head to tail.
    pub fn freelist_spans(&self) -> Vec<usize> {
        self.freelist.sizes()
    }

    /// Number of blocks in the chain.
    pub fn block_count(&self) -> usize {
        self.chain.len()
    }

    /// Block the bump cursor is in.
    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    /// Offset of the next bump allocation within the current block.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Bytes left for bump allocation in the current block.
    pub fn block_remaining(&self) -> usize {
        self.config.block_size - self.current_index
    }

    /// Number of resets so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Total memory held by the block chain in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.chain.memory_bytes()
    }

    #[track_caller]
    fn check_request(&self, size: usize) {
        assert!(size > 0, "allocation size is 0");
        assert!(
            size <= self.config.usable_block_bytes(),
            "allocation of {size} bytes does not fit in a {}-byte block alongside its {}-byte header",
            self.config.block_size,
            BLOCK_HEADER_SIZE,
        );
    }

    /// Move the cursor to the next block, donating the old block's tail.
    ///
    /// The next block is secured before anything else changes, so a failure
    /// leaves the arena untouched.
    fn roll_over(&mut self, requested: usize) -> Result<(), ArenaError> {
        let next = self
            .chain
            .enter_next(self.current_block, self.epoch, requested)?;

        let tail = FreeSpan {
            block: self.current_block,
            offset: self.current_index,
            size: self.config.block_size - self.current_index,
        };
        if tail.size > self.config.min_free_span {
            self.freelist.insert(tail);
        } else {
            self.wasted_bytes += tail.size;
            if tail.size > 0 {
                trace!(block = %tail.block, size = tail.size, "abandoned block tail");
            }
        }

        self.current_block = next;
        self.current_index = BLOCK_HEADER_SIZE;
        Ok(())
    }

    fn record(&mut self, block: BlockId, offset: usize, size: usize) -> Allocation {
        self.num_allocations += 1;
        self.total_bytes += size;
        Allocation::new(block, offset, size, self.epoch)
            .in_window(self.checkpoint.map(|c| c.window))
    }

    /// Same epoch, and either outside any window or in the open one.
    fn is_live(&self, alloc: &Allocation) -> bool {
        alloc.epoch == self.epoch
            && alloc
                .window
                .is_none_or(|w| self.checkpoint.is_some_and(|c| c.window == w))
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("config", &self.config)
            .field("blocks", &self.chain.len())
            .field("current_block", &self.current_block)
            .field("current_index", &self.current_index)
            .field("freelist", &self.freelist.sizes())
            .field("checkpoint", &self.checkpoint)
            .field("epoch", &self.epoch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(block_size: usize) -> Arena {
        Arena::with_block_size(block_size).unwrap()
    }

    #[test]
    fn new_arena_starts_past_header() {
        let a = arena(128);
        assert_eq!(a.current_block(), BlockId(0));
        assert_eq!(a.current_index(), BLOCK_HEADER_SIZE);
        assert_eq!(a.block_count(), 1);
        assert_eq!(a.stats().num_allocations, 0);
        a.check_integrity().unwrap();
    }

    #[test]
    fn invalid_config_is_an_error() {
        let err = Arena::with_block_size(BLOCK_HEADER_SIZE).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn bump_allocations_are_contiguous() {
        let mut a = arena(128);
        let x = a.allocate(10).unwrap();
        let y = a.allocate(20).unwrap();
        assert_eq!(x.offset(), 16);
        assert_eq!(y.offset(), 26);
        assert_eq!(a.current_index(), 46);
        assert!(!x.overlaps(&y));
    }

    #[test]
    fn write_then_read_through_handle() {
        let mut a = arena(128);
        let h = a.allocate(4).unwrap();
        a.bytes_mut(&h).unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(a.bytes(&h).unwrap(), &[1u8, 2, 3, 4]);
    }

    #[test]
    fn rollover_donates_large_tail() {
        let mut a = arena(128);
        let _ = a.allocate(60).unwrap(); // index 76, 52 bytes left
        let b = a.allocate(100).unwrap();
        assert_eq!(b.block(), BlockId(1));
        assert_eq!(a.freelist_spans(), vec![52]);
        let span = *a.freelist().iter().next().unwrap();
        assert_eq!(span.block, BlockId(0));
        assert_eq!(span.offset, 76);
        a.check_integrity().unwrap();
    }

    #[test]
    fn rollover_abandons_small_tail() {
        let mut a = arena(128);
        let _ = a.allocate(100).unwrap(); // 12 bytes left
        let _ = a.allocate(20).unwrap();
        assert!(a.freelist().is_empty());
        assert_eq!(a.stats().wasted_bytes, 12);
    }

    #[test]
    fn freelist_is_tried_before_bump() {
        let mut a = arena(128);
        let _ = a.allocate(60).unwrap();
        let _ = a.allocate(100).unwrap(); // donates 52 bytes at block 0, offset 76
        let c = a.allocate(8).unwrap();
        // Carved from the top of the donated span.
        assert_eq!(c.block(), BlockId(0));
        assert_eq!(c.offset(), 120);
        assert_eq!(a.freelist_spans(), vec![44]);
    }

    #[test]
    fn whole_span_grant_counts_forfeit_as_waste() {
        let mut a = arena(128);
        let _ = a.allocate(60).unwrap();
        let _ = a.allocate(100).unwrap(); // span of 52
        let c = a.allocate(40).unwrap(); // 40 + 24 > 52: whole span
        assert_eq!(c.block(), BlockId(0));
        assert_eq!(c.offset(), 76);
        assert_eq!(c.len(), 40);
        assert!(a.freelist().is_empty());
        assert_eq!(a.stats().wasted_bytes, 12);
    }

    #[test]
    fn zeroed_allocation_clears_only_its_bytes() {
        let mut a = arena(128);
        let first = a.allocate_copy(&[0xAA; 8]).unwrap();
        a.reset();
        let dirty = a.allocate(8).unwrap();
        assert_eq!(a.bytes(&dirty).unwrap(), &[0xAAu8; 8]);
        a.reset();
        let clean = a.allocate_zeroed(4).unwrap();
        assert_eq!(clean.offset(), first.offset());
        assert_eq!(a.bytes(&clean).unwrap(), &[0u8; 4]);
        // The neighbouring stale bytes are untouched.
        let rest = a.allocate(4).unwrap();
        assert_eq!(a.bytes(&rest).unwrap(), &[0xAAu8; 4]);
        assert_eq!(a.chain.get(BlockId(0)).unwrap().header().epoch, 2);
    }

    #[test]
    fn reset_invalidates_handles() {
        let mut a = arena(128);
        let h = a.allocate(8).unwrap();
        a.reset();
        assert!(a.bytes(&h).is_none());
        assert_eq!(a.epoch(), 1);
    }

    #[test]
    fn reset_drops_active_checkpoint() {
        let mut a = arena(128);
        a.scratch_begin();
        a.reset();
        assert!(!a.scratch_active());
        a.scratch_begin();
        a.scratch_end();
    }

    #[test]
    fn trim_releases_blocks_after_cursor() {
        let mut a = arena(64);
        for _ in 0..4 {
            let _ = a.allocate(48).unwrap();
        }
        assert_eq!(a.block_count(), 4);
        a.reset();
        assert_eq!(a.trim(), 3);
        assert_eq!(a.block_count(), 1);
        a.check_integrity().unwrap();
    }

    #[test]
    fn trim_drops_spans_in_released_blocks() {
        let mut a = arena(128).with_scratch_spans();
        assert_eq!(a.freelist().len(), 1);
        a.trim();
        assert!(a.freelist().is_empty());
        a.check_integrity().unwrap();
    }

    #[test]
    fn max_blocks_surfaces_as_error_without_mutation() {
        let mut a = Arena::new(ArenaConfig::new(64).with_max_blocks(1)).unwrap();
        let _ = a.allocate(20).unwrap();
        let before = a.stats();
        let err = a.allocate(40).unwrap_err();
        assert!(matches!(err, ArenaError::CapacityExceeded { .. }));
        assert_eq!(a.stats(), before);
        assert_eq!(a.current_index(), 36);
        assert!(a.freelist().is_empty());
    }

    #[test]
    #[should_panic(expected = "allocation size is 0")]
    fn zero_size_panics() {
        let _ = arena(128).allocate(0);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn oversized_request_panics() {
        let _ = arena(128).allocate(113);
    }

    #[test]
    fn largest_legal_request_fills_a_block() {
        let mut a = arena(128);
        let h = a.allocate(112).unwrap();
        assert_eq!(h.offset(), BLOCK_HEADER_SIZE);
        assert_eq!(a.block_remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "already active")]
    fn double_scratch_begin_panics() {
        let mut a = arena(128);
        a.scratch_begin();
        a.scratch_begin();
    }

    #[test]
    #[should_panic(expected = "no scratch checkpoint")]
    fn scratch_end_without_begin_panics() {
        arena(128).scratch_end();
    }

    #[test]
    fn scratch_guard_restores_on_drop() {
        let mut a = arena(256);
        let _ = a.allocate(10).unwrap();
        {
            let mut guard = a.scratch();
            let _ = guard.allocate(100).unwrap();
            assert!(guard.scratch_active());
        }
        assert!(!a.scratch_active());
        assert_eq!(a.stats().total_bytes, 10);
        assert_eq!(a.current_index(), 26);
    }

    #[test]
    fn scratch_handles_go_stale_when_window_closes() {
        let mut a = arena(256);
        let kept = a.allocate_copy(b"kept").unwrap();

        a.scratch_begin();
        let dead = a.allocate_copy(b"scratch!").unwrap();
        assert_eq!(dead.scratch_window(), Some(1));
        assert_eq!(a.bytes(&dead).unwrap(), b"scratch!");
        assert_eq!(a.bytes(&kept).unwrap(), b"kept");
        a.scratch_end();

        assert!(a.bytes(&dead).is_none());
        assert_eq!(a.bytes(&kept).unwrap(), b"kept");

        // The next allocation reuses the window's bytes.
        let live = a.allocate_copy(b"newdata!").unwrap();
        assert!(live.overlaps(&dead));
        assert_eq!(live.scratch_window(), None);
        assert!(a.bytes(&dead).is_none());

        // A later window does not revive handles from an earlier one.
        a.scratch_begin();
        assert!(a.bytes_mut(&dead).is_none());
        a.scratch_end();
    }

    #[test]
    fn scratch_guard_tolerates_manual_end() {
        let mut a = arena(256);
        let mut guard = a.scratch();
        guard.scratch_end();
        drop(guard);
        assert!(!a.scratch_active());
    }

    #[test]
    fn debug_output_names_cursor() {
        let a = arena(128);
        let text = format!("{a:?}");
        assert!(text.contains("current_index: 16"));
    }

    impl Arena {
        /// Leave the cursor in block 0 with a donated span living in block 1.
        fn with_scratch_spans(mut self) -> Self {
            self.scratch_begin();
            let _ = self.allocate(100).unwrap(); // block 0, 12 left
            let _ = self.allocate(60).unwrap(); // rolls to block 1, index 76
            let _ = self.allocate(100).unwrap(); // donates 52 from block 1, rolls to block 2
            self.scratch_end();
            self
        }
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(usize),
            Reset,
            Scratch(Vec<usize>),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                8 => (1usize..=112).prop_map(Op::Alloc),
                1 => Just(Op::Reset),
                1 => proptest::collection::vec(1usize..=112, 0..6).prop_map(Op::Scratch),
            ]
        }

        proptest! {
            #[test]
            fn bump_cursor_only_rewinds_on_rollover(
                sizes in proptest::collection::vec(1usize..=112, 1..60),
            ) {
                let mut a = Arena::new(ArenaConfig::new(128)).unwrap();
                for size in sizes {
                    let (block, index) = (a.current_block(), a.current_index());
                    let remaining = a.block_remaining();
                    let _ = a.allocate(size).unwrap();
                    if a.current_block() == block {
                        prop_assert!(a.current_index() >= index);
                    } else {
                        prop_assert!(size > remaining);
                        prop_assert_eq!(a.current_block().index(), block.index() + 1);
                    }
                }
            }

            #[test]
            fn live_allocations_never_overlap(
                sizes in proptest::collection::vec(1usize..=112, 1..60),
            ) {
                let mut a = Arena::new(ArenaConfig::new(128).with_min_free_span(8)).unwrap();
                let mut live: Vec<Allocation> = Vec::new();
                for size in sizes {
                    let h = a.allocate(size).unwrap();
                    for other in &live {
                        prop_assert!(!h.overlaps(other), "{} overlaps {}", h, other);
                    }
                    live.push(h);
                }
                prop_assert!(a.check_integrity().is_ok());
            }

            #[test]
            fn counters_match_model(ops in proptest::collection::vec(op(), 1..50)) {
                let mut a = Arena::new(ArenaConfig::new(128)).unwrap();
                let (mut count, mut bytes) = (0usize, 0usize);
                for op in ops {
                    match op {
                        Op::Alloc(size) => {
                            let _ = a.allocate(size).unwrap();
                            count += 1;
                            bytes += size;
                        }
                        Op::Reset => {
                            a.reset();
                            count = 0;
                            bytes = 0;
                        }
                        Op::Scratch(sizes) => {
                            let mut guard = a.scratch();
                            for size in sizes {
                                let _ = guard.allocate(size).unwrap();
                            }
                        }
                    }
                    let stats = a.stats();
                    prop_assert_eq!(stats.num_allocations, count);
                    prop_assert_eq!(stats.total_bytes, bytes);
                    prop_assert!(a.check_integrity().is_ok());
                }
            }
        }
    }
}
