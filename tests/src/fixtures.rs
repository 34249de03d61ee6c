//! Shared test fixtures.
//!
//! [`ScriptVm`] runs programs that are just a bincode-encoded [`Script`]: the
//! effects and cost are whatever the test wrote into the transaction.
//! [`TestChain`] drives genesis and successive blocks through the real
//! builder, signer and validator.

use qc_04_state_management::{NonceEntry, Snapshot};
use qc_08_consensus::{BlockValidationError, BlockValidator, ValidationOptions};
use qc_17_block_production::{
    initial_block, sign_with_keys, BlockBuilder, BuildError, BuilderConfig, Execution, SignError,
    TxEffects, TxExecutor, VmFault,
};
use serde::{Deserialize, Serialize};
use shared_crypto::{Ed25519KeyPair, Hash};
use shared_types::{Predicate, PublicKey, SignedBlock, Transaction, UnsignedBlockHeader};
use thiserror::Error;

/// Program format understood by [`ScriptVm`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Effects the VM reports.
    pub effects: TxEffects,
    /// Cost the VM reports.
    pub cost: i64,
    /// Fail with this message instead of executing.
    pub fail: Option<String>,
}

impl Script {
    /// A script with no effects.
    pub fn cost(cost: i64) -> Self {
        Self {
            cost,
            ..Default::default()
        }
    }

    /// Add a created contract.
    pub fn create(mut self, id: Hash) -> Self {
        self.effects.contracts_created.push(id);
        self
    }

    /// Add a consumed contract.
    pub fn consume(mut self, id: Hash) -> Self {
        self.effects.contracts_consumed.push(id);
        self
    }

    /// Add a nonce.
    pub fn nonce(mut self, id: Hash, expires_ms: u64) -> Self {
        self.effects.nonces.push(NonceEntry::new(id, expires_ms));
        self
    }

    /// Make the VM fail on this script.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail: Some(reason.to_string()),
            ..Default::default()
        }
    }

    /// Wrap the script in a transaction with the given runlimit.
    pub fn into_tx(self, runlimit: i64) -> Transaction {
        let program = bincode::serialize(&self).expect("script encodes");
        Transaction::new(1, runlimit, program)
    }
}

/// VM that decodes and replays a [`Script`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptVm;

impl TxExecutor for ScriptVm {
    fn apply(&self, _: &Snapshot, program: &[u8], runlimit: i64) -> Result<Execution, VmFault> {
        let script: Script =
            bincode::deserialize(program).map_err(|e| VmFault::Failed(e.to_string()))?;
        if let Some(reason) = script.fail {
            return Err(VmFault::Failed(reason));
        }
        if script.cost > runlimit {
            return Err(VmFault::OutOfRunlimit {
                used: script.cost,
                limit: runlimit,
            });
        }
        Ok(Execution {
            effects: script.effects,
            cost: script.cost,
        })
    }
}

/// Deterministic keypair for signer `index`.
pub fn key(index: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([index.wrapping_add(1); 32])
}

/// Public keys of signers `0..n`.
pub fn pubkeys(n: u8) -> Vec<PublicKey> {
    (0..n).map(|i| key(i).public_key()).collect()
}

/// Any failure while extending a [`TestChain`].
#[derive(Debug, Error)]
pub enum ChainError {
    /// Builder failure
    #[error(transparent)]
    Build(#[from] BuildError),
    /// Signer failure
    #[error(transparent)]
    Sign(#[from] SignError),
    /// Validator failure
    #[error(transparent)]
    Validation(#[from] BlockValidationError),
}

/// A chain driven through the real builder, signer and validator.
pub struct TestChain {
    /// Snapshot after the tip.
    pub snapshot: Snapshot,
    /// Blocks from genesis to tip.
    pub blocks: Vec<SignedBlock>,
    /// Key indices authorizing the next block, aligned with the tip's
    /// `next_predicate`.
    pub signer_keys: Vec<u8>,
    validator: BlockValidator,
}

impl TestChain {
    /// Genesis with signers `0..n` and the given quorum.
    pub fn genesis(n: u8, quorum: u32, timestamp_ms: u64) -> Result<Self, ChainError> {
        let (block, snapshot) =
            initial_block(pubkeys(n), quorum, timestamp_ms, &BuilderConfig::default())?;
        let genesis = SignedBlock::unsigned(block);
        let validator = BlockValidator::with_defaults();
        validator.validate_block(&genesis, None, ValidationOptions::default())?;
        Ok(Self {
            snapshot,
            blocks: vec![genesis],
            signer_keys: (0..n).collect(),
            validator,
        })
    }

    /// Header of the newest block.
    pub fn tip(&self) -> &UnsignedBlockHeader {
        // A chain always holds its genesis block.
        &self.blocks[self.blocks.len() - 1].block.header
    }

    /// Predicate the next block must satisfy.
    pub fn next_predicate(&self) -> &Predicate {
        &self.tip().next_predicate
    }

    /// Build, sign (with the signer positions in `signers`) and validate the
    /// next block, then append it.
    pub fn extend(
        &mut self,
        txs: Vec<Transaction>,
        timestamp_ms: u64,
        signers: &[usize],
    ) -> Result<&SignedBlock, ChainError> {
        self.extend_with(txs, timestamp_ms, signers, BuilderConfig::default(), None)
    }

    /// Like [`TestChain::extend`], with an explicit config and an optional
    /// rotation: `(key indices, quorum)` become the next block's predicate.
    pub fn extend_with(
        &mut self,
        txs: Vec<Transaction>,
        timestamp_ms: u64,
        signers: &[usize],
        mut config: BuilderConfig,
        rotate_to: Option<(Vec<u8>, u32)>,
    ) -> Result<&SignedBlock, ChainError> {
        if let Some((keys, quorum)) = &rotate_to {
            let pubkeys = keys.iter().map(|i| key(*i).public_key()).collect();
            let predicate = Predicate::new(1, *quorum, pubkeys).map_err(BuildError::from)?;
            config = config.with_next_predicate(predicate);
        }

        let mut builder = BlockBuilder::start(&self.snapshot, timestamp_ms, &config, &ScriptVm)?;
        for tx in txs {
            builder.add_tx(tx)?;
        }
        let (block, snapshot) = builder.build()?;

        let keys: Vec<Option<Ed25519KeyPair>> = self
            .signer_keys
            .iter()
            .enumerate()
            .map(|(pos, k)| signers.contains(&pos).then(|| key(*k)))
            .collect();
        let previous = self.next_predicate().clone();
        let signed = sign_with_keys(block, &previous, &keys)?;

        self.validator
            .validate_block(&signed, Some(self.tip()), ValidationOptions::default())?;
        qc_08_consensus::validate_snapshot_roots(signed.header(), &snapshot)?;

        self.snapshot = snapshot;
        if let Some((keys, _)) = rotate_to {
            self.signer_keys = keys;
        }
        self.blocks.push(signed);
        Ok(&self.blocks[self.blocks.len() - 1])
    }
}

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_replays_through_vm() {
        let tx = Script::cost(3)
            .create([0xC1; 32])
            .consume([0xC2; 32])
            .nonce([0x0E; 32], 9_000)
            .into_tx(5);
        assert!(!tx.program.is_empty());

        let execution = ScriptVm.apply(&Snapshot::empty(), &tx.program, tx.runlimit).unwrap();
        assert_eq!(execution.cost, 3);
        assert_eq!(execution.effects.contracts_created, vec![[0xC1; 32]]);
        assert_eq!(execution.effects.contracts_consumed, vec![[0xC2; 32]]);
        assert_eq!(
            execution.effects.nonces,
            vec![NonceEntry::new([0x0E; 32], 9_000)]
        );
    }

    #[test]
    fn test_failing_script_reports_its_reason() {
        let tx = Script::failing("bad opcode").into_tx(1);
        assert_eq!(
            ScriptVm.apply(&Snapshot::empty(), &tx.program, 1),
            Err(VmFault::Failed("bad opcode".into()))
        );
    }
}
