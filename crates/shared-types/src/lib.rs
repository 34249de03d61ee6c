//! # Shared Types Crate
//!
//! Value types of the block protocol, shared by block production
//! (qc-17), state management (qc-04) and validation (qc-08).
//!
//! ## Design Principles
//!
//! - **Immutable values**: a header is created once by the builder and never
//!   changes; a signed block is a header plus an index-aligned signature list.
//! - **Canonical encoding**: the bytes that get hashed and signed come from
//!   [`encoding`], never from the wire codec.
//! - **Tagged absence**: an abstaining signer is [`SignatureSlot::Absent`],
//!   never a null that could be mistaken for an invalid signature.

pub mod codec;
pub mod encoding;
pub mod entities;
pub mod errors;

pub use codec::WireCodec;
pub use entities::*;
pub use errors::*;

pub use shared_crypto::{Hash, EMPTY_ROOT};

/// Block header version produced by this implementation.
pub const CURRENT_BLOCK_VERSION: u32 = 1;

/// Predicate version produced by this implementation.
pub const CURRENT_PREDICATE_VERSION: u32 = 1;

/// Default ceiling on the total runlimit of one block.
pub const DEFAULT_MAX_BLOCK_RUNLIMIT: i64 = 1_000_000_000;

/// Largest blob the wire codec will decode (64 MiB).
pub const MAX_WIRE_BYTES: usize = 64 * 1024 * 1024;
