//! Block Validation Service - Pure Domain Logic
//!
//! Each check is a free function that can be called on its own:
//!
//! - [`validate_structure`]: the block is internally consistent
//! - [`validate_against_previous`]: the header links to its predecessor
//! - [`validate_signatures`](super::validate_signatures): a quorum of the
//!   predecessor's predicate signed it
//! - [`validate_snapshot_roots`]: the state roots match a snapshot
//!
//! [`BlockValidator`] runs them in order. Genesis (height 1) gets the
//! structural check only.

use qc_04_state_management::Snapshot;
use serde::Deserialize;
use shared_crypto::{merkle_root, short_hex};
use shared_types::{
    SignedBlock, UnsignedBlock, UnsignedBlockHeader, CURRENT_BLOCK_VERSION,
    DEFAULT_MAX_BLOCK_RUNLIMIT,
};
use tracing::{debug, warn};

use super::error::BlockValidationError;
use super::quorum::validate_signatures;

/// Configuration for block validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Lowest accepted header version.
    pub min_version: u32,
    /// Highest accepted header version.
    pub max_version: u32,
    /// Ceiling on the header runlimit.
    pub max_block_runlimit: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_version: 1,
            max_version: CURRENT_BLOCK_VERSION,
            max_block_runlimit: DEFAULT_MAX_BLOCK_RUNLIMIT,
        }
    }
}

impl ValidationConfig {
    /// Reject configurations that accept nothing.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        if self.min_version > self.max_version {
            return Err(BlockValidationError::InvalidConfig(format!(
                "min_version {} above max_version {}",
                self.min_version, self.max_version
            )));
        }
        if self.max_block_runlimit < 0 {
            return Err(BlockValidationError::InvalidConfig(format!(
                "negative max_block_runlimit {}",
                self.max_block_runlimit
            )));
        }
        Ok(())
    }
}

/// Checks [`BlockValidator::validate_block`] may skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Do not verify the quorum signatures.
    pub skip_signatures: bool,
    /// Accept a non-genesis block without its predecessor (structure only).
    pub skip_previous: bool,
}

/// Check the block on its own: version, runlimit, height/predecessor shape,
/// transaction commitment and next predicate.
pub fn validate_structure(
    block: &UnsignedBlock,
    config: &ValidationConfig,
) -> Result<(), BlockValidationError> {
    let header = &block.header;

    if header.version < config.min_version || header.version > config.max_version {
        return Err(BlockValidationError::BadVersion {
            version: header.version,
            min: config.min_version,
            max: config.max_version,
        });
    }

    match (header.height, header.previous_block_id) {
        (0, _) => return Err(BlockValidationError::ZeroHeight),
        (1, Some(_)) => return Err(BlockValidationError::GenesisWithPrevious),
        (height, None) if height > 1 => {
            return Err(BlockValidationError::MissingPrevious { height })
        }
        _ => {}
    }

    if header.runlimit < 0 {
        return Err(BlockValidationError::NegativeRunlimit {
            runlimit: header.runlimit,
        });
    }
    if header.runlimit > config.max_block_runlimit {
        return Err(BlockValidationError::RunlimitAboveCeiling {
            runlimit: header.runlimit,
            max: config.max_block_runlimit,
        });
    }

    let actual = block.transactions.len() as u64;
    if header.refs_count != actual {
        return Err(BlockValidationError::RefsCountMismatch {
            declared: header.refs_count,
            actual,
        });
    }

    let computed = merkle_root(&block.transaction_ids());
    if header.transactions_root != computed {
        return Err(BlockValidationError::TransactionsRootMismatch {
            declared: header.transactions_root,
            computed,
        });
    }

    if header.next_predicate.check().is_err() {
        return Err(BlockValidationError::MalformedPredicate {
            quorum: header.next_predicate.quorum,
            keys: header.next_predicate.len(),
        });
    }

    Ok(())
}

/// Check that `header` extends `previous`.
pub fn validate_against_previous(
    header: &UnsignedBlockHeader,
    previous: &UnsignedBlockHeader,
) -> Result<(), BlockValidationError> {
    let expected = previous.hash();
    if header.previous_block_id != Some(expected) {
        return Err(BlockValidationError::ChainMismatch {
            expected,
            got: header.previous_block_id,
        });
    }

    let expected_height = previous
        .height
        .checked_add(1)
        .ok_or(BlockValidationError::HeightOverflow {
            previous: previous.height,
        })?;
    if header.height != expected_height {
        return Err(BlockValidationError::HeightMismatch {
            expected: expected_height,
            got: header.height,
        });
    }

    if header.timestamp_ms <= previous.timestamp_ms {
        return Err(BlockValidationError::TimestampNotMonotonic {
            previous: previous.timestamp_ms,
            got: header.timestamp_ms,
        });
    }

    if header.version < previous.version {
        return Err(BlockValidationError::VersionDowngrade {
            previous: previous.version,
            got: header.version,
        });
    }

    Ok(())
}

/// Check the header's state roots against the snapshot it claims to produce.
pub fn validate_snapshot_roots(
    header: &UnsignedBlockHeader,
    snapshot: &Snapshot,
) -> Result<(), BlockValidationError> {
    let contracts = snapshot.contracts_root();
    if header.contracts_root != contracts {
        return Err(BlockValidationError::ContractsRootMismatch {
            declared: header.contracts_root,
            computed: contracts,
        });
    }
    let nonces = snapshot.nonces_root();
    if header.nonces_root != nonces {
        return Err(BlockValidationError::NoncesRootMismatch {
            declared: header.nonces_root,
            computed: nonces,
        });
    }
    Ok(())
}

/// Pure domain service for block validation.
pub struct BlockValidator {
    config: ValidationConfig,
}

impl BlockValidator {
    /// Create a validator, rejecting an unusable configuration.
    pub fn new(config: ValidationConfig) -> Result<Self, BlockValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a validator with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `signed`, linking it to `previous` when given.
    ///
    /// With a predecessor: structure, linkage, then (unless skipped) the
    /// quorum of `previous.next_predicate`. Without one: structure only, and
    /// only for genesis or with `skip_previous` set.
    #[tracing::instrument(skip_all, fields(height = signed.header().height))]
    pub fn validate_block(
        &self,
        signed: &SignedBlock,
        previous: Option<&UnsignedBlockHeader>,
        options: ValidationOptions,
    ) -> Result<(), BlockValidationError> {
        let result = self.run_checks(signed, previous, options);
        match &result {
            Ok(()) => debug!(block_id = %short_hex(&signed.block_id()), "Block valid"),
            Err(err) => warn!(
                block_id = %short_hex(&signed.block_id()),
                category = ?err.category(),
                error = %err,
                "Block rejected"
            ),
        }
        result
    }

    fn run_checks(
        &self,
        signed: &SignedBlock,
        previous: Option<&UnsignedBlockHeader>,
        options: ValidationOptions,
    ) -> Result<(), BlockValidationError> {
        validate_structure(&signed.block, &self.config)?;

        let header = signed.header();
        match previous {
            Some(previous) => {
                validate_against_previous(header, previous)?;
                if !options.skip_signatures {
                    validate_signatures(signed, &previous.next_predicate)?;
                }
                Ok(())
            }
            None if header.is_genesis() || options.skip_previous => Ok(()),
            None => Err(BlockValidationError::MissingPredecessor {
                height: header.height,
            }),
        }
    }
}
