//! # qc-04-state-management
//!
//! Chain state as of a given block height.
//!
//! ## Role in System
//!
//! - **Input to block production**: the builder clones a [`Snapshot`] into a
//!   working copy, applies transaction effects to it and hands the result
//!   back as the next snapshot
//! - **Content addressed**: the contract set and the nonce set each expose a
//!   Merkle root that the block header commits to
//!
//! ## Ownership
//!
//! ```text
//! Snapshot(h) ──clone──→ [Builder working copy] ──Build──→ Snapshot(h+1)
//!      │                                                        │
//!   untouched                                          returned by value
//! ```
//!
//! A snapshot that another builder session is reading is never mutated;
//! every session works on its own copy.

pub mod domain;

pub use domain::*;
