//! Domain layer - pure block production logic
//!
//! No I/O and no async. The VM is reached only through
//! [`crate::ports::TxExecutor`].
//!
//! - [`BlockBuilder`]: one builder session per block
//! - [`sign_block`] / [`sign_with_keys`]: quorum signing
//! - [`initial_block`]: the genesis block

pub mod builder;
pub mod genesis;
pub mod signer;

pub use builder::BlockBuilder;
pub use genesis::{initial_block, verify_genesis};
pub use signer::{sign_block, sign_with_keys};
