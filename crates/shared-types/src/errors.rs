//! # Error Types
//!
//! Error categories shared by every crate, plus the errors raised by the
//! value types themselves.

use shared_crypto::CryptoError;
use thiserror::Error;

/// How an error should be treated by the caller.
///
/// Nothing in the engine retries; the category only tells the caller what
/// kind of invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed input or configuration. Rejected immediately.
    Input,
    /// The transaction conflicts with the state being built. Aborts the
    /// builder session.
    StateConsistency,
    /// The block does not link to its declared predecessor.
    ChainLinkage,
    /// The block is not authorized by the required quorum.
    Authorization,
    /// Wire bytes could not be encoded or decoded.
    Encoding,
}

/// Errors raised when constructing or checking value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Quorum larger than the key set.
    #[error("Malformed predicate: quorum {quorum} with {keys} pubkeys")]
    MalformedPredicate {
        /// Declared quorum
        quorum: u32,
        /// Number of public keys
        keys: usize,
    },

    /// More public keys than a predicate can index.
    #[error("Too many pubkeys: {count}")]
    TooManyPubkeys {
        /// Number of keys supplied
        count: usize,
    },

    /// A key or signature failed to parse.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl TypeError {
    /// Every type error is an input error.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Errors raised by the wire codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input larger than [`crate::MAX_WIRE_BYTES`].
    #[error("Input too large: {size} bytes, maximum {max}")]
    TooLarge {
        /// Input size in bytes
        size: usize,
        /// Maximum accepted size
        max: usize,
    },

    /// Encoding failed.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Decoding failed.
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl CodecError {
    /// Every codec error is an encoding error.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Encoding
    }
}
