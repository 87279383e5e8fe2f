//! Test utilities and fixtures for Quill development.
//!
//! Provides arena constructors sized for readable offsets, a helper that
//! shapes the freelist through real block-tail donation, and deterministic
//! allocation workloads for property tests and benches.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{donate_tail, random_sizes, scenario_config, small_arena, spans_of, SpanView};
