//! Genesis Block Creation
//!
//! The genesis block sits at height 1 on the empty snapshot. It carries no
//! transactions and declares the predicate that authorizes block 2.

use qc_04_state_management::Snapshot;
use shared_types::{Predicate, PublicKey, UnsignedBlock, CURRENT_PREDICATE_VERSION};

use crate::config::BuilderConfig;
use crate::domain::builder::BlockBuilder;
use crate::error::Result;
use crate::ports::{Execution, VmFault};

/// Build the genesis block and the snapshot after it.
///
/// A `quorum` of 0 requires every key in `pubkeys`. Any `next_predicate`
/// already in `config` is replaced.
pub fn initial_block(
    pubkeys: Vec<PublicKey>,
    quorum: u32,
    timestamp_ms: u64,
    config: &BuilderConfig,
) -> Result<(UnsignedBlock, Snapshot)> {
    let predicate = Predicate::with_default_quorum(CURRENT_PREDICATE_VERSION, quorum, pubkeys)?;
    let config = config.clone().with_next_predicate(predicate);

    let builder = BlockBuilder::start(&Snapshot::empty(), timestamp_ms, &config, &no_transactions)?;
    builder.build()
}

fn no_transactions(_: &Snapshot, _: &[u8], _: i64) -> std::result::Result<Execution, VmFault> {
    Err(VmFault::Failed("genesis takes no transactions".into()))
}

/// Rebuild the genesis block and check it matches `expected`.
pub fn verify_genesis(
    expected: &UnsignedBlock,
    pubkeys: Vec<PublicKey>,
    quorum: u32,
    config: &BuilderConfig,
) -> Result<bool> {
    if !expected.header.is_genesis() {
        return Ok(false);
    }
    let (rebuilt, _) = initial_block(pubkeys, quorum, expected.header.timestamp_ms, config)?;
    Ok(rebuilt == *expected)
}
