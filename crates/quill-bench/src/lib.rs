//! Benchmark workloads for the Quill arena allocator.
//!
//! Provides deterministic request streams shared by the benches:
//!
//! - [`small_objects`]: many tiny requests that rarely leave a block
//! - [`mixed_sizes`]: requests up to half a block, frequent rollover
//! - [`fragmenting`]: alternating near-full and tiny requests that keep
//!   the freelist busy
//! - [`run_workload`]: replay a stream against an arena

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use quill_arena::{Arena, ArenaConfig, ArenaError};
use quill_collections::Pcg32;

/// Block size used by every workload profile.
pub const BENCH_BLOCK_SIZE: usize = 64 * 1024;

/// A request stream plus the arena layout it is meant for.
#[derive(Clone, Debug)]
pub struct Workload {
    /// Arena layout to replay against.
    pub config: ArenaConfig,
    /// Request sizes in order.
    pub sizes: Vec<usize>,
}

impl Workload {
    /// Sum of all request sizes.
    pub fn total_bytes(&self) -> usize {
        self.sizes.iter().sum()
    }
}

/// `count` requests of 8..=64 bytes.
pub fn small_objects(count: usize, seed: u64) -> Workload {
    let mut rng = Pcg32::new(seed, 1);
    Workload {
        config: ArenaConfig::new(BENCH_BLOCK_SIZE),
        sizes: (0..count).map(|_| rng.range_u32(8, 64) as usize).collect(),
    }
}

/// `count` requests spread up to half a block.
pub fn mixed_sizes(count: usize, seed: u64) -> Workload {
    let mut rng = Pcg32::new(seed, 2);
    let max = (BENCH_BLOCK_SIZE / 2) as u32;
    Workload {
        config: ArenaConfig::new(BENCH_BLOCK_SIZE),
        sizes: (0..count).map(|_| rng.range_u32(1, max) as usize).collect(),
    }
}

/// `count` requests alternating between large and small.
///
/// Large requests leave sizeable block tails that end up on the freelist;
/// the small requests that follow are carved out of them.
pub fn fragmenting(count: usize, seed: u64) -> Workload {
    let config = ArenaConfig::new(BENCH_BLOCK_SIZE);
    let usable = config.usable_block_bytes() as u32;
    let mut rng = Pcg32::new(seed, 3);
    let sizes = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                rng.range_u32(usable / 2, usable - 1) as usize
            } else {
                rng.range_u32(16, 256) as usize
            }
        })
        .collect();
    Workload { config, sizes }
}

/// Replay `workload` against `arena`, returning the number of bytes served.
pub fn run_workload(arena: &mut Arena, workload: &Workload) -> Result<usize, ArenaError> {
    let mut served = 0;
    for &size in &workload.sizes {
        served += arena.allocate(size)?.len();
    }
    Ok(served)
}
