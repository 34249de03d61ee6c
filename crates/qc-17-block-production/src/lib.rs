//! # Block production
//!
//! Turns a snapshot plus an ordered transaction sequence into the next
//! unsigned block, then attaches the quorum signatures that authorize it.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports                                              │
//! │  - Outbound: TxExecutor (the transaction VM)        │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (pure logic)                                │
//! │  - BlockBuilder: start / add_tx / build             │
//! │  - Signer: sign_block, sign_with_keys               │
//! │  - Genesis: initial_block                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants held by `BlockBuilder`
//!
//! 1. **Runlimit**: sum(tx cost) ≤ `max_block_runlimit`
//! 2. **Nonce uniqueness**: a nonce enters the snapshot at most once
//! 3. **Contract existence**: only existing contracts are consumed
//! 4. **Timestamp monotonicity**: block time > snapshot time
//! 5. **Single use**: a failed or finished session is never resumed
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_17_block_production::{BlockBuilder, BuilderConfig, sign_with_keys};
//!
//! let config = BuilderConfig::default();
//! let mut builder = BlockBuilder::start(&snapshot, now_ms, &config, &vm)?;
//! for tx in txs {
//!     builder.add_tx(tx)?;
//! }
//! let (block, snapshot) = builder.build()?;
//! let signed = sign_with_keys(block, &previous_predicate, &keys)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use config::{BuilderConfig, RunlimitPolicy};
pub use domain::{initial_block, sign_block, sign_with_keys, verify_genesis, BlockBuilder};
pub use error::{BuildError, Result, SignError};
pub use ports::{Execution, TxEffects, TxExecutor, VmFault};
