//! Read-only arena diagnostics.

use std::fmt;

/// Snapshot of arena usage, produced by [`Arena::stats`](crate::Arena::stats).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Allocations served since creation or the last reset.
    pub num_allocations: usize,
    /// User bytes requested by those allocations.
    pub total_bytes: usize,
    /// Blocks currently in the chain.
    pub num_blocks: usize,
    /// Blocks appended beyond the first over the arena's lifetime.
    pub extra_blocks_allocated: u64,
    /// Spans currently on the freelist.
    pub freelist_spans: usize,
    /// Free bytes held by those spans.
    pub freelist_bytes: usize,
    /// Bytes lost until the next reset: block tails too small to donate and
    /// span remainders handed out with whole-span grants.
    pub wasted_bytes: usize,
    /// Size of each block in bytes.
    pub block_size: usize,
    /// Bytes spent on block headers.
    pub metadata_bytes: usize,
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arena with block size {}", self.block_size)?;
        writeln!(f, "\t{} allocation(s)", self.num_allocations)?;
        writeln!(f, "\tin {} block(s)", self.num_blocks)?;
        writeln!(f, "\ttotalling {} bytes of user data", self.total_bytes)?;
        writeln!(f, "\tand {} bytes of metadata", self.metadata_bytes)?;
        write!(
            f,
            "\twith {} free span(s) holding {} bytes, {} bytes wasted",
            self.freelist_spans, self.freelist_bytes, self.wasted_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_counters() {
        let stats = ArenaStats {
            num_allocations: 3,
            total_bytes: 120,
            num_blocks: 2,
            extra_blocks_allocated: 1,
            freelist_spans: 1,
            freelist_bytes: 40,
            wasted_bytes: 4,
            block_size: 256,
            metadata_bytes: 32,
        };
        let text = stats.to_string();
        assert!(text.starts_with("Arena with block size 256\n"));
        assert!(text.contains("\t3 allocation(s)"));
        assert!(text.contains("\tin 2 block(s)"));
        assert!(text.contains("\ttotalling 120 bytes of user data"));
        assert!(text.contains("\tand 32 bytes of metadata"));
        assert!(text.ends_with("1 free span(s) holding 40 bytes, 4 bytes wasted"));
    }
}
