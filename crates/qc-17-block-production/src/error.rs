//! Error types for block production

use qc_04_state_management::SnapshotError;
use shared_crypto::short_hex;
use shared_types::{ErrorCategory, Hash, TypeError};
use thiserror::Error;

/// Result type alias for block production operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that can occur while building a block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Block timestamp does not advance past the snapshot
    #[error("Stale timestamp: {timestamp_ms} <= snapshot timestamp {snapshot_timestamp_ms}")]
    StaleTimestamp {
        /// Requested block timestamp
        timestamp_ms: u64,
        /// Timestamp of the snapshot's last block
        snapshot_timestamp_ms: u64,
    },

    /// Snapshot chain tip is self-contradictory
    #[error("Inconsistent snapshot at height {height}: {reason}")]
    InconsistentSnapshot {
        /// Snapshot height
        height: u64,
        /// What is wrong
        reason: String,
    },

    /// Transaction declares a negative runlimit
    #[error("Transaction {index} declares negative runlimit {runlimit}")]
    NegativeTxRunlimit {
        /// Transaction position in the block
        index: usize,
        /// Declared runlimit
        runlimit: i64,
    },

    /// Block runlimit ceiling would be exceeded
    #[error("Runlimit exceeded: used {used} + cost {cost} > limit {limit}")]
    RuntimeExceeded {
        /// Runlimit consumed before this transaction
        used: i64,
        /// Cost of this transaction
        cost: i64,
        /// Block ceiling
        limit: i64,
    },

    /// Transaction introduces a nonce already present
    #[error("Duplicate nonce: {}", short_hex(.id))]
    DuplicateNonce {
        /// Nonce ID
        id: Hash,
    },

    /// Transaction introduces a nonce that has already expired
    #[error("Nonce {} expired at {expires_ms}, block timestamp {timestamp_ms}", short_hex(.id))]
    NonceExpired {
        /// Nonce ID
        id: Hash,
        /// Nonce expiry
        expires_ms: u64,
        /// Block timestamp
        timestamp_ms: u64,
    },

    /// Transaction consumes a contract that does not exist
    #[error("Contract not found: {}", short_hex(.id))]
    ContractNotFound {
        /// Contract ID
        id: Hash,
    },

    /// Transaction creates a contract that already exists
    #[error("Duplicate contract: {}", short_hex(.id))]
    DuplicateContract {
        /// Contract ID
        id: Hash,
    },

    /// VM execution failed
    #[error("VM error in transaction {index}: {reason}")]
    VmError {
        /// Transaction position in the block
        index: usize,
        /// VM failure description
        reason: String,
    },

    /// No predicate available for the next block
    #[error("No next predicate configured and the snapshot carries none")]
    EmptyPredicateMismatch,

    /// Next predicate violates the quorum invariant
    #[error("Malformed predicate: {0}")]
    MalformedPredicate(#[from] TypeError),

    /// A previous call failed; the session must be discarded
    #[error("Builder session aborted by an earlier error")]
    SessionAborted,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The built header could not be folded into the snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(SnapshotError),
}

impl From<SnapshotError> for BuildError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::ContractNotFound { id } => Self::ContractNotFound { id },
            SnapshotError::DuplicateContract { id } => Self::DuplicateContract { id },
            SnapshotError::DuplicateNonce { id } => Self::DuplicateNonce { id },
            other => Self::Snapshot(other),
        }
    }
}

impl BuildError {
    /// Error category for callers
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StaleTimestamp { .. }
            | Self::InconsistentSnapshot { .. }
            | Self::NegativeTxRunlimit { .. }
            | Self::EmptyPredicateMismatch
            | Self::MalformedPredicate(_)
            | Self::InvalidConfig(_) => ErrorCategory::Input,
            Self::Snapshot(err) => err.category(),
            _ => ErrorCategory::StateConsistency,
        }
    }
}

/// Errors that can occur while signing a block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// A signer callback failed
    #[error("Signer {index} failed: {reason}")]
    Signer {
        /// Signer index
        index: usize,
        /// Failure description
        reason: String,
    },

    /// Key does not belong to the predicate slot it was given for
    #[error("Key at index {index} does not match the predicate pubkey")]
    KeyMismatch {
        /// Signer index
        index: usize,
    },

    /// More keys than predicate slots
    #[error("Too many keys: {keys} keys for {pubkeys} pubkeys")]
    TooManyKeys {
        /// Keys supplied
        keys: usize,
        /// Predicate size
        pubkeys: usize,
    },

    /// Previous predicate violates the quorum invariant
    #[error("Malformed predicate: {0}")]
    MalformedPredicate(#[from] TypeError),
}

impl SignError {
    /// Every signing error is an input error
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}
