//! Arena-specific error types.
//!
//! Only conditions a caller can act on are errors. Misuse of the allocation
//! contract (zero-sized or oversized requests, unbalanced scratch calls) is a
//! programming error and panics at the call site instead.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The configuration cannot produce a working arena.
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
    /// The block chain is at its configured `max_blocks` limit.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Total capacity of the chain in bytes.
        capacity: usize,
    },
    /// The host allocator could not provide a new block.
    BlockAllocationFailed {
        /// Size of the block that could not be allocated.
        block_size: usize,
    },
    /// An internal consistency check failed.
    Corrupted {
        /// Which check failed.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::BlockAllocationFailed { block_size } => {
                write!(f, "failed to allocate a {block_size}-byte block")
            }
            Self::Corrupted { reason } => write!(f, "arena corrupted: {reason}"),
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_sizes() {
        let err = ArenaError::CapacityExceeded {
            requested: 64,
            capacity: 512,
        };
        let msg = err.to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("512"));
    }

    #[test]
    fn block_allocation_failure_display() {
        let err = ArenaError::BlockAllocationFailed { block_size: 4096 };
        assert_eq!(err.to_string(), "failed to allocate a 4096-byte block");
    }
}
