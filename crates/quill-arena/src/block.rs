//! Fixed-size memory blocks and the block chain.
//!
//! A [`Block`] is a contiguous `Box<[u8]>` whose first
//! [`BLOCK_HEADER_SIZE`] bytes hold a [`BlockHeader`]. A [`BlockChain`] is
//! the growable, ordered collection of blocks an arena bump-allocates from.
//! Blocks are never freed individually during use: after a reset they are
//! re-entered in order and reused.

use smallvec::SmallVec;
use tracing::debug;

use crate::config::BLOCK_HEADER_SIZE;
use crate::error::ArenaError;
use crate::handle::BlockId;

/// Metadata stored in the first bytes of every block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    /// Position of the block in its chain.
    pub index: u64,
    /// Arena epoch in which the block was last entered.
    pub epoch: u64,
}

/// A single fixed-capacity memory block.
///
/// The backing storage is allocated to full size at creation and zeroed
/// once. Later reuse does not clear it.
pub struct Block {
    data: Box<[u8]>,
}

impl Block {
    /// Allocate a zeroed block of `size` bytes.
    ///
    /// Returns `Err(ArenaError::BlockAllocationFailed)` if the host allocator
    /// refuses the request.
    pub fn new(size: usize) -> Result<Self, ArenaError> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| ArenaError::BlockAllocationFailed { block_size: size })?;
        data.resize(size, 0u8);
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Write the header into the reserved leading bytes.
    pub fn stamp(&mut self, header: BlockHeader) {
        self.data[..8].copy_from_slice(&header.index.to_le_bytes());
        self.data[8..BLOCK_HEADER_SIZE].copy_from_slice(&header.epoch.to_le_bytes());
    }

    /// Decode the header from the reserved leading bytes.
    pub fn header(&self) -> BlockHeader {
        let mut index = [0u8; 8];
        let mut epoch = [0u8; 8];
        index.copy_from_slice(&self.data[..8]);
        epoch.copy_from_slice(&self.data[8..BLOCK_HEADER_SIZE]);
        BlockHeader {
            index: u64::from_le_bytes(index),
            epoch: u64::from_le_bytes(epoch),
        }
    }

    /// Get a shared slice at the given offset and length.
    ///
    /// Returns `None` if the range falls outside the block or into its header.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        if offset < BLOCK_HEADER_SIZE {
            return None;
        }
        self.data.get(offset..offset.checked_add(len)?)
    }

    /// Get a mutable slice at the given offset and length.
    ///
    /// Returns `None` if the range falls outside the block or into its header.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        if offset < BLOCK_HEADER_SIZE {
            return None;
        }
        self.data.get_mut(offset..offset.checked_add(len)?)
    }

    /// Total capacity in bytes, header included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// An ordered, growable chain of equally-sized [`Block`]s.
///
/// The chain never shrinks on its own. Advancing past the last block
/// appends a new one (up to `max_blocks`); advancing onto a block retained
/// from before a reset reuses it.
pub struct BlockChain {
    blocks: SmallVec<[Block; 4]>,
    block_size: usize,
    max_blocks: Option<usize>,
    /// Blocks appended beyond the first over the chain's lifetime.
    grown: u64,
}

impl BlockChain {
    /// Create a chain holding one freshly allocated block, stamped for epoch 0.
    pub fn new(block_size: usize, max_blocks: Option<usize>) -> Result<Self, ArenaError> {
        let mut first = Block::new(block_size)?;
        first.stamp(BlockHeader { index: 0, epoch: 0 });
        let mut blocks = SmallVec::new();
        blocks.push(first);
        Ok(Self {
            blocks,
            block_size,
            max_blocks,
            grown: 0,
        })
    }

    /// Move from `current` to the following block, creating it if needed.
    ///
    /// `requested` is only used to describe the failure if the chain is at
    /// its `max_blocks` limit.
    pub fn enter_next(
        &mut self,
        current: BlockId,
        epoch: u64,
        requested: usize,
    ) -> Result<BlockId, ArenaError> {
        let next = current.index() + 1;
        if next < self.blocks.len() {
            debug!(block = next, epoch, "reusing retained block");
        } else {
            let at_limit = self.max_blocks.is_some_and(|max| self.blocks.len() >= max);
            if at_limit || u32::try_from(next).is_err() {
                return Err(ArenaError::CapacityExceeded {
                    requested,
                    capacity: self.memory_bytes(),
                });
            }
            self.blocks.push(Block::new(self.block_size)?);
            self.grown += 1;
            debug!(
                block = next,
                block_size = self.block_size,
                blocks = self.blocks.len(),
                "grew block chain"
            );
        }
        self.restamp(next, epoch);
        // `next` fits in u32: either an existing block or checked above.
        Ok(BlockId(next as u32))
    }

    /// Rewrite the header of an existing block for a new epoch.
    pub fn restamp(&mut self, index: usize, epoch: u64) {
        self.blocks[index].stamp(BlockHeader {
            index: index as u64,
            epoch,
        });
    }

    /// Get a block by id.
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Get a block by id, mutably.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.index())
    }

    /// Drop every block after the first `keep`, returning how many were freed.
    ///
    /// The first block is always kept.
    pub fn truncate(&mut self, keep: usize) -> usize {
        let keep = keep.max(1);
        let released = self.blocks.len().saturating_sub(keep);
        self.blocks.truncate(keep);
        released
    }

    /// Iterate over blocks in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Number of blocks currently in the chain.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain holds no blocks.
    ///
    /// A chain always holds at least one block, so this is false.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Size of each block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Blocks appended beyond the first since the chain was created.
    pub fn grown(&self) -> u64 {
        self.grown
    }

    /// Total memory held by the chain in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.len() * self.block_size
    }
}
