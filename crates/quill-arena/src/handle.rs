//! Block identifiers and allocation handles.
//!
//! An [`Allocation`] encodes the physical location of a caller's bytes
//! within the arena. It is epoch-scoped: the `epoch` field allows O(1)
//! staleness checks after [`Arena::reset`](crate::Arena::reset) without a
//! lookup table. Allocations made inside a scratch window also record the
//! window's number, so they go stale when
//! [`Arena::scratch_end`](crate::Arena::scratch_end) closes it.

use std::fmt;

/// Position of a block within the arena's chain.
///
/// `BlockId(0)` is the first block, created together with the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The chain index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Location of an allocation within the arena.
///
/// Handles are plain data: copying one does not copy the bytes. Resolve a
/// handle with [`Arena::bytes`](crate::Arena::bytes) or
/// [`Arena::bytes_mut`](crate::Arena::bytes_mut).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Allocation {
    /// Block holding the bytes.
    pub(crate) block: BlockId,
    /// Byte offset within the block (past the block header).
    pub(crate) offset: usize,
    /// Number of bytes requested by the caller.
    pub(crate) len: usize,
    /// Arena epoch when this allocation was made.
    pub(crate) epoch: u64,
    /// Scratch window the allocation was made in, if any.
    pub(crate) window: Option<u64>,
}

impl Allocation {
    pub(crate) fn new(block: BlockId, offset: usize, len: usize, epoch: u64) -> Self {
        Self {
            block,
            offset,
            len,
            epoch,
            window: None,
        }
    }

    pub(crate) fn in_window(mut self, window: Option<u64>) -> Self {
        self.window = window;
        self
    }

    /// The block holding this allocation.
    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Byte offset of the first byte within its block.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: the arena never hands out empty allocations.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset one past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The arena epoch this allocation belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The scratch window this allocation was made in, if any.
    pub fn scratch_window(&self) -> Option<u64> {
        self.window
    }

    /// Whether two allocations share any byte.
    pub fn overlaps(&self, other: &Allocation) -> bool {
        self.block == other.block && self.offset < other.end() && other.offset < self.end()
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Allocation(block={}, off={}, len={}, epoch={}",
            self.block, self.offset, self.len, self.epoch
        )?;
        if let Some(window) = self.window {
            write!(f, ", scratch={window}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_report_fields() {
        let a = Allocation::new(BlockId(2), 40, 8, 1);
        assert_eq!(a.block(), BlockId(2));
        assert_eq!(a.offset(), 40);
        assert_eq!(a.len(), 8);
        assert_eq!(a.end(), 48);
        assert_eq!(a.epoch(), 1);
        assert!(!a.is_empty());
    }

    #[test]
    fn overlap_requires_same_block() {
        let a = Allocation::new(BlockId(0), 16, 10, 0);
        let b = Allocation::new(BlockId(0), 20, 10, 0);
        let c = Allocation::new(BlockId(1), 16, 10, 0);
        let d = Allocation::new(BlockId(0), 26, 4, 0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn display_includes_location() {
        let a = Allocation::new(BlockId(3), 16, 4, 7);
        assert_eq!(a.to_string(), "Allocation(block=3, off=16, len=4, epoch=7)");
        let b = a.in_window(Some(2));
        assert_eq!(b.scratch_window(), Some(2));
        assert_eq!(
            b.to_string(),
            "Allocation(block=3, off=16, len=4, epoch=7, scratch=2)"
        );
    }
}
