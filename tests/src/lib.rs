//! Cross-crate scenarios for the block lifecycle:
//! genesis, build, sign, validate, then the next block on top.
//!
//! [`fixtures`] holds the scripted VM and the in-memory [`fixtures::TestChain`];
//! [`integration`] holds the scenarios. Benchmarks live under `benches/`.
//!
//! ```bash
//! cargo test -p qc-tests integration::
//! cargo bench -p qc-tests
//! ```

pub mod fixtures;
