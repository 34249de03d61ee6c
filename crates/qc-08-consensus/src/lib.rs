//! # qc-08-consensus
//!
//! Block validation for the block protocol.
//!
//! ## Architecture
//!
//! Validation is pure: no I/O, no async, no mutation of the block or the
//! snapshot under test. Four checks are exposed separately so a caller can
//! run just the one it needs:
//!
//! ```text
//! validate_structure ──→ validate_against_previous ──→ validate_signatures
//!                                                        (previous.next_predicate)
//! validate_snapshot_roots (optional, needs the post-block snapshot)
//! ```
//!
//! ### Zero-Trust Signature Verification
//!
//! Every present signature is verified against the block ID. A present but
//! invalid signature fails the block outright; it is never counted as an
//! abstention.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_08_consensus::{BlockValidator, ValidationOptions};
//!
//! let validator = BlockValidator::with_defaults();
//! validator.validate_block(&signed, Some(previous.header()), ValidationOptions::default())?;
//! ```

#![warn(missing_docs)]

pub mod domain;

pub use domain::*;
