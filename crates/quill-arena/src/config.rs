//! Arena configuration parameters.

use crate::error::ArenaError;

/// Bytes reserved at the start of every block for its header.
///
/// The header records the block's chain index and the arena epoch in which
/// the block was last entered (see [`BlockHeader`](crate::block::BlockHeader)).
pub const BLOCK_HEADER_SIZE: usize = 16;

/// Footprint of a freelist node: a size plus two links.
///
/// Spans smaller than this are not worth tracking and are abandoned instead.
pub const FREELIST_NODE_SIZE: usize = 24;

/// Configuration for the arena allocator.
///
/// Controls block sizing, the optional chain length cap, and the smallest
/// span the freelist will track. Validated at construction; all values are
/// immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of each block in bytes, including the block header.
    ///
    /// Default: 64 MiB. Must exceed [`BLOCK_HEADER_SIZE`].
    pub block_size: usize,

    /// Maximum number of blocks the chain may grow to.
    ///
    /// `None` (the default) leaves growth bounded only by the host allocator.
    pub max_blocks: Option<usize>,

    /// Smallest span, in bytes, the freelist keeps a node for.
    ///
    /// Default: [`FREELIST_NODE_SIZE`]. A block tail must be strictly larger
    /// than this to be donated, and a carve must leave at least this many
    /// bytes behind in the span it came from.
    pub min_free_span: usize,
}

impl ArenaConfig {
    /// Default block size: 64 MiB.
    pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024 * 1024;

    /// Create a config with the given block size and default limits.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            max_blocks: None,
            min_free_span: FREELIST_NODE_SIZE,
        }
    }

    /// Cap the number of blocks the chain may hold.
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = Some(max_blocks);
        self
    }

    /// Override the smallest span the freelist tracks.
    pub fn with_min_free_span(mut self, min_free_span: usize) -> Self {
        self.min_free_span = min_free_span;
        self
    }

    /// Largest single request the arena can serve: one block minus its header.
    pub fn usable_block_bytes(&self) -> usize {
        self.block_size.saturating_sub(BLOCK_HEADER_SIZE)
    }

    /// Check the configuration for values the arena cannot work with.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.block_size <= BLOCK_HEADER_SIZE {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "block_size must exceed the {BLOCK_HEADER_SIZE}-byte block header (got {})",
                    self.block_size,
                ),
            });
        }
        if self.min_free_span == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "min_free_span must be non-zero".into(),
            });
        }
        if self.max_blocks == Some(0) {
            return Err(ArenaError::InvalidConfig {
                reason: "max_blocks must be >= 1; the arena always owns its first block".into(),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_size_is_64mb() {
        let config = ArenaConfig::default();
        assert_eq!(config.block_size, 64 * 1024 * 1024);
        assert_eq!(config.min_free_span, FREELIST_NODE_SIZE);
        assert_eq!(config.max_blocks, None);
    }

    #[test]
    fn usable_bytes_excludes_header() {
        let config = ArenaConfig::new(128);
        assert_eq!(config.usable_block_bytes(), 112);
    }

    #[test]
    fn block_size_must_exceed_header() {
        assert!(ArenaConfig::new(BLOCK_HEADER_SIZE).validate().is_err());
        assert!(ArenaConfig::new(0).validate().is_err());
        assert!(ArenaConfig::new(BLOCK_HEADER_SIZE + 1).validate().is_ok());
    }

    #[test]
    fn zero_limits_rejected() {
        let err = ArenaConfig::new(128).with_min_free_span(0).validate();
        assert!(matches!(err, Err(ArenaError::InvalidConfig { .. })));
        let err = ArenaConfig::new(128).with_max_blocks(0).validate();
        assert!(matches!(err, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn builders_set_fields() {
        let config = ArenaConfig::new(256).with_max_blocks(4).with_min_free_span(8);
        assert_eq!(config.max_blocks, Some(4));
        assert_eq!(config.min_free_span, 8);
    }
}
