//! PCG32 pseudo-random number generator.
//!
//! A thin wrapper over [`rand_pcg::Pcg32`] (PCG-XSH-RR 64/32): 64 bits of
//! state, a stream selector, and 32-bit output. Sequences are fully
//! determined by the `(initstate, initseq)` seed pair and match the
//! reference `pcg32_srandom_r` / `pcg32_random_r` implementation.

use std::time::{SystemTime, UNIX_EPOCH};

use rand_core::{RngCore, SeedableRng};

/// PCG-XSH-RR generator with a selectable stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pcg32 {
    inner: rand_pcg::Pcg32,
}

impl Pcg32 {
    /// Seed a generator with a starting state and a stream selector.
    ///
    /// Generators with the same `initstate` but different `initseq` produce
    /// unrelated sequences.
    pub fn new(initstate: u64, initseq: u64) -> Self {
        Self {
            inner: rand_pcg::Pcg32::new(initstate, initseq),
        }
    }

    /// Seed from a single `u64`, expanding it into state and stream.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: rand_pcg::Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the wall clock and process id.
    ///
    /// Not reproducible; use [`Pcg32::new`] where runs must repeat.
    pub fn from_time() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let initseq = u64::from(now.subsec_nanos()) ^ u64::from(std::process::id());
        Self::new(now.as_secs(), initseq)
    }

    /// Next uniformly distributed `u32`.
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Value in `[min, max]`, inclusive.
    ///
    /// Uses modulo reduction, so very wide ranges carry a slight bias toward
    /// low values.
    ///
    /// # Panics
    ///
    /// Panics unless `max > min`.
    #[track_caller]
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        assert!(max > min, "range max {max} must exceed min {min}");
        let span = u64::from(max - min) + 1;
        (u64::from(self.next_u32()) % span) as u32 + min
    }

    /// Value in `[min, max]`, inclusive.
    ///
    /// # Panics
    ///
    /// Panics unless `max > min`.
    #[track_caller]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        assert!(max > min, "range max {max} must exceed min {min}");
        let span = i64::from(max) - i64::from(min) + 1;
        (i64::from(self.next_u32()) % span + i64::from(min)) as i32
    }

    /// Value in `[0, 1]`.
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }
}
