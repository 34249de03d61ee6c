use shared_crypto::short_hex;
use shared_types::{ErrorCategory, Hash};
use thiserror::Error;

/// Errors raised by snapshot mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Contract not found: {}", short_hex(.id))]
    ContractNotFound { id: Hash },

    #[error("Duplicate contract: {}", short_hex(.id))]
    DuplicateContract { id: Hash },

    #[error("Nonce not found: {}", short_hex(.id))]
    NonceNotFound { id: Hash },

    #[error("Duplicate nonce: {}", short_hex(.id))]
    DuplicateNonce { id: Hash },

    #[error("Header out of sequence: snapshot at height {current}, header height {got}")]
    HeaderOutOfSequence { current: u64, got: u64 },
}

impl SnapshotError {
    /// Error category for callers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HeaderOutOfSequence { .. } => ErrorCategory::ChainLinkage,
            _ => ErrorCategory::StateConsistency,
        }
    }
}
