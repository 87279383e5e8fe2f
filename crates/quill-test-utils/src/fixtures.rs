//! Reusable arena fixtures.
//!
//! - [`scenario_config`]: 128-byte blocks, default freelist threshold.
//! - [`small_arena`]: arena with the given block size and span threshold.
//! - [`donate_tail`]: put a span of an exact size on the freelist.
//! - [`random_sizes`]: seeded request sizes drawn with [`Pcg32`].

use quill_arena::{Arena, ArenaConfig, BlockId};
use quill_collections::Pcg32;

/// The 128-byte block layout used throughout the scenario tests.
///
/// With the 16-byte header, each block serves up to 112 bytes.
pub fn scenario_config() -> ArenaConfig {
    ArenaConfig::new(128)
}

/// Arena with `block_size`-byte blocks that tracks spans above `min_free_span`.
pub fn small_arena(block_size: usize, min_free_span: usize) -> Arena {
    Arena::new(ArenaConfig::new(block_size).with_min_free_span(min_free_span))
        .expect("fixture config is valid")
}

/// Roll the arena over so that exactly `tail` bytes of the current block
/// land on the freelist.
///
/// Bump-fills the current block up to `tail` bytes from its end, then makes
/// a request one byte larger than both `tail` and the largest existing span
/// so it can only be met by a fresh block. Afterwards the cursor sits in a
/// new block, `tail + 1` (or more) bytes past its header.
///
/// # Panics
///
/// Panics if the current block has fewer than `tail` bytes left, or if the
/// fill request could be served by an existing span (donate spans in
/// ascending size order to avoid that).
pub fn donate_tail(arena: &mut Arena, tail: usize) {
    let largest = arena.freelist_spans().first().copied().unwrap_or(0);
    let remaining = arena.block_remaining();
    assert!(
        remaining >= tail,
        "current block has {remaining} bytes left, cannot donate {tail}"
    );

    let fill = remaining - tail;
    if fill > 0 {
        assert!(
            fill > largest,
            "fill of {fill} bytes would be served by a {largest}-byte span"
        );
        let _fill = arena
            .allocate(fill)
            .expect("fill fits in the current block");
    }

    let before = arena.current_block();
    let _rollover = arena
        .allocate(tail.max(largest) + 1)
        .expect("rollover request fits in a fresh block");
    assert_ne!(arena.current_block(), before, "request did not roll over");
}

/// A freelist span as `(block, offset, size)`, head to tail.
pub type SpanView = (BlockId, usize, usize);

/// The arena's freelist as plain tuples, head to tail.
pub fn spans_of(arena: &Arena) -> Vec<SpanView> {
    arena
        .freelist()
        .iter()
        .map(|span| (span.block, span.offset, span.size))
        .collect()
}

/// `count` request sizes in `1..=max`, reproducible from `seed`.
pub fn random_sizes(seed: u64, count: usize, max: u32) -> Vec<usize> {
    assert!(max > 1, "max must allow more than one size");
    let mut rng = Pcg32::new(seed, 0x5eed);
    (0..count).map(|_| rng.range_u32(1, max) as usize).collect()
}

