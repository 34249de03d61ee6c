use shared_crypto::short_hex;
use shared_types::{ErrorCategory, Hash};

/// Block validation errors.
///
/// Each variant names the violated rule; none is ever downgraded to a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    /// Header version outside the accepted range.
    BadVersion {
        /// Declared version
        version: u32,
        /// Lowest accepted version
        min: u32,
        /// Highest accepted version
        max: u32,
    },
    /// `refs_count` disagrees with the transaction list.
    RefsCountMismatch {
        /// Count in the header
        declared: u64,
        /// Transactions actually carried
        actual: u64,
    },
    /// `transactions_root` does not commit to the transaction list.
    TransactionsRootMismatch {
        /// Root in the header
        declared: Hash,
        /// Root over the carried transactions
        computed: Hash,
    },
    /// Header runlimit is negative.
    NegativeRunlimit {
        /// Declared runlimit
        runlimit: i64,
    },
    /// Header runlimit is above the configured ceiling.
    RunlimitAboveCeiling {
        /// Declared runlimit
        runlimit: i64,
        /// Configured ceiling
        max: i64,
    },
    /// Height 0 is never a block.
    ZeroHeight,
    /// Genesis block names a predecessor.
    GenesisWithPrevious,
    /// Non-genesis block has no predecessor ID.
    MissingPrevious {
        /// Height of the block
        height: u64,
    },
    /// `quorum > len(pubkeys)`.
    MalformedPredicate {
        /// Declared quorum
        quorum: u32,
        /// Number of listed keys
        keys: usize,
    },
    /// `previous_block_id` is not the predecessor's ID.
    ChainMismatch {
        /// ID of the predecessor
        expected: Hash,
        /// ID named by the block
        got: Option<Hash>,
    },
    /// Height is not predecessor height + 1.
    HeightMismatch {
        /// Predecessor height + 1
        expected: u64,
        /// Height of the block
        got: u64,
    },
    /// Predecessor sits at the maximum height; nothing can follow it.
    HeightOverflow {
        /// Height of the predecessor
        previous: u64,
    },
    /// Timestamp does not advance past the predecessor.
    TimestampNotMonotonic {
        /// Predecessor timestamp
        previous: u64,
        /// Block timestamp
        got: u64,
    },
    /// Version lower than the predecessor's.
    VersionDowngrade {
        /// Predecessor version
        previous: u32,
        /// Block version
        got: u32,
    },
    /// Signature list length differs from the predicate's key count.
    SignatureCountMismatch {
        /// Keys in the predicate
        expected: usize,
        /// Slots in the block
        got: usize,
    },
    /// A present signature does not verify.
    InvalidSignature {
        /// Position of the slot
        index: usize,
    },
    /// Fewer valid signatures than the quorum.
    QuorumNotMet {
        /// Valid signatures found
        valid: usize,
        /// Quorum of the predicate
        required: usize,
    },
    /// `contracts_root` disagrees with the snapshot.
    ContractsRootMismatch {
        /// Root in the header
        declared: Hash,
        /// Root of the snapshot
        computed: Hash,
    },
    /// `nonces_root` disagrees with the snapshot.
    NoncesRootMismatch {
        /// Root in the header
        declared: Hash,
        /// Root of the snapshot
        computed: Hash,
    },
    /// A non-genesis block was validated without its predecessor.
    MissingPredecessor {
        /// Height of the block
        height: u64,
    },
    /// Validator configuration is unusable.
    InvalidConfig(String),
}

impl BlockValidationError {
    /// Error category for callers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ChainMismatch { .. }
            | Self::HeightMismatch { .. }
            | Self::HeightOverflow { .. }
            | Self::TimestampNotMonotonic { .. }
            | Self::VersionDowngrade { .. }
            | Self::MissingPredecessor { .. } => ErrorCategory::ChainLinkage,
            Self::SignatureCountMismatch { .. }
            | Self::InvalidSignature { .. }
            | Self::QuorumNotMet { .. } => ErrorCategory::Authorization,
            Self::ContractsRootMismatch { .. } | Self::NoncesRootMismatch { .. } => {
                ErrorCategory::StateConsistency
            }
            _ => ErrorCategory::Input,
        }
    }
}

impl std::fmt::Display for BlockValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadVersion { version, min, max } => {
                write!(f, "Block version {} outside [{}, {}]", version, min, max)
            }
            Self::RefsCountMismatch { declared, actual } => write!(
                f,
                "refs_count {} but block carries {} transactions",
                declared, actual
            ),
            Self::TransactionsRootMismatch { declared, computed } => write!(
                f,
                "Transactions root mismatch: declared {}, computed {}",
                short_hex(declared),
                short_hex(computed)
            ),
            Self::NegativeRunlimit { runlimit } => {
                write!(f, "Negative block runlimit {}", runlimit)
            }
            Self::RunlimitAboveCeiling { runlimit, max } => {
                write!(f, "Block runlimit {} above ceiling {}", runlimit, max)
            }
            Self::ZeroHeight => write!(f, "Block height 0"),
            Self::GenesisWithPrevious => write!(f, "Genesis block has a previous block id"),
            Self::MissingPrevious { height } => {
                write!(f, "Block at height {} has no previous block id", height)
            }
            Self::MalformedPredicate { quorum, keys } => {
                write!(f, "Malformed predicate: quorum {} with {} keys", quorum, keys)
            }
            Self::ChainMismatch { expected, got } => write!(
                f,
                "Previous block id {} does not match predecessor {}",
                got.as_ref().map_or_else(|| "none".to_string(), short_hex),
                short_hex(expected)
            ),
            Self::HeightMismatch { expected, got } => {
                write!(f, "Height mismatch: expected {}, got {}", expected, got)
            }
            Self::HeightOverflow { previous } => {
                write!(f, "No height follows predecessor height {}", previous)
            }
            Self::TimestampNotMonotonic { previous, got } => write!(
                f,
                "Timestamp {} does not advance past predecessor {}",
                got, previous
            ),
            Self::VersionDowngrade { previous, got } => {
                write!(f, "Version downgrade: {} after {}", got, previous)
            }
            Self::SignatureCountMismatch { expected, got } => write!(
                f,
                "Signature count mismatch: expected {}, got {}",
                expected, got
            ),
            Self::InvalidSignature { index } => write!(f, "Invalid signature at index {}", index),
            Self::QuorumNotMet { valid, required } => {
                write!(f, "Quorum not met: {} of {} required", valid, required)
            }
            Self::ContractsRootMismatch { declared, computed } => write!(
                f,
                "Contracts root mismatch: declared {}, snapshot {}",
                short_hex(declared),
                short_hex(computed)
            ),
            Self::NoncesRootMismatch { declared, computed } => write!(
                f,
                "Nonces root mismatch: declared {}, snapshot {}",
                short_hex(declared),
                short_hex(computed)
            ),
            Self::MissingPredecessor { height } => {
                write!(f, "Block at height {} needs its predecessor", height)
            }
            Self::InvalidConfig(reason) => write!(f, "Invalid validation config: {}", reason),
        }
    }
}

impl std::error::Error for BlockValidationError {}
