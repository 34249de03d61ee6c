//! Domain layer for block validation
//!
//! - block_validation: structure, linkage, state roots, orchestration
//! - quorum: parallel signature verification against a predicate

mod block_validation;
mod error;
mod quorum;

pub use block_validation::*;
pub use error::*;
pub use quorum::*;
