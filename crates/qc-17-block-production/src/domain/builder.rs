//! # Block Builder
//!
//! One builder session turns a snapshot plus an ordered transaction sequence
//! into the next unsigned block and the snapshot after it.
//!
//! ## Session
//!
//! ```text
//! (no builder) --start--> BlockBuilder --add_tx*--> BlockBuilder --build--> (block, snapshot)
//! ```
//!
//! `build` takes `self`, so a session is single use. The caller's snapshot is
//! cloned at `start` and never touched; the returned snapshot replaces it.
//!
//! Any `add_tx` failure aborts the session. Later calls return
//! [`BuildError::SessionAborted`]; there is no partial block.

use qc_04_state_management::Snapshot;
use shared_crypto::{merkle_root, short_hex, Hash};
use shared_types::{Transaction, UnsignedBlock, UnsignedBlockHeader};
use tracing::{debug, info, warn};

use crate::config::{BuilderConfig, RunlimitPolicy};
use crate::error::{BuildError, Result};
use crate::ports::{Execution, TxEffects, TxExecutor};

/// A started builder session.
pub struct BlockBuilder<'a, E: TxExecutor + ?Sized> {
    config: &'a BuilderConfig,
    executor: &'a E,
    working: Snapshot,
    height: u64,
    timestamp_ms: u64,
    previous_block_id: Option<Hash>,
    transactions: Vec<Transaction>,
    leaves: Vec<Hash>,
    runlimit_used: i64,
    aborted: bool,
}

impl<'a, E: TxExecutor + ?Sized> BlockBuilder<'a, E> {
    /// Start a session on top of `snapshot`.
    #[tracing::instrument(
        skip(snapshot, config, executor),
        fields(height = snapshot.height().saturating_add(1))
    )]
    pub fn start(
        snapshot: &Snapshot,
        timestamp_ms: u64,
        config: &'a BuilderConfig,
        executor: &'a E,
    ) -> Result<Self> {
        config.validate()?;

        if timestamp_ms <= snapshot.timestamp_ms() {
            return Err(BuildError::StaleTimestamp {
                timestamp_ms,
                snapshot_timestamp_ms: snapshot.timestamp_ms(),
            });
        }

        match (snapshot.height(), snapshot.last_block_id()) {
            (0, Some(_)) => {
                return Err(BuildError::InconsistentSnapshot {
                    height: 0,
                    reason: "pre-genesis snapshot has a last block id".into(),
                })
            }
            (height, None) if height > 0 => {
                return Err(BuildError::InconsistentSnapshot {
                    height,
                    reason: "missing last block id".into(),
                })
            }
            _ => {}
        }

        let height = snapshot
            .height()
            .checked_add(1)
            .ok_or_else(|| BuildError::InconsistentSnapshot {
                height: snapshot.height(),
                reason: "no height follows the snapshot".into(),
            })?;

        let mut working = snapshot.clone();
        let pruned = working.prune_nonces(timestamp_ms);
        debug!(pruned, "Builder session started");

        Ok(Self {
            config,
            executor,
            height,
            timestamp_ms,
            previous_block_id: snapshot.last_block_id(),
            working,
            transactions: Vec::new(),
            leaves: Vec::new(),
            runlimit_used: 0,
            aborted: false,
        })
    }

    /// Height of the block being built.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Timestamp of the block being built.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Transactions accepted so far.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Runlimit consumed so far.
    pub fn runlimit_used(&self) -> i64 {
        self.runlimit_used
    }

    /// The working snapshot, with every accepted transaction applied.
    pub fn snapshot(&self) -> &Snapshot {
        &self.working
    }

    /// True once a failed call has aborted the session.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Execute `tx` against the working snapshot and append it to the block.
    /// Returns the transaction ID.
    pub fn add_tx(&mut self, tx: Transaction) -> Result<Hash> {
        if self.aborted {
            return Err(BuildError::SessionAborted);
        }
        match self.apply_tx(tx) {
            Ok(id) => Ok(id),
            Err(err) => {
                warn!(height = self.height, index = self.transactions.len(), error = %err, "Builder session aborted");
                self.aborted = true;
                Err(err)
            }
        }
    }

    fn apply_tx(&mut self, tx: Transaction) -> Result<Hash> {
        let index = self.transactions.len();

        if tx.runlimit < 0 {
            return Err(BuildError::NegativeTxRunlimit {
                index,
                runlimit: tx.runlimit,
            });
        }

        let Execution { effects, cost } = self
            .executor
            .apply(&self.working, &tx.program, tx.runlimit)
            .map_err(|fault| BuildError::VmError {
                index,
                reason: fault.to_string(),
            })?;

        if cost < 0 || cost > tx.runlimit {
            return Err(BuildError::VmError {
                index,
                reason: format!("reported cost {cost} outside [0, {}]", tx.runlimit),
            });
        }

        let limit = self.config.max_block_runlimit;
        let total = match self.runlimit_used.checked_add(cost) {
            Some(total) if total <= limit => total,
            _ => {
                return Err(BuildError::RuntimeExceeded {
                    used: self.runlimit_used,
                    cost,
                    limit,
                })
            }
        };

        self.apply_effects(effects)?;

        let id = tx.id();
        debug!(index, cost, tx = %short_hex(&id), "Transaction applied");
        self.leaves.push(id);
        self.transactions.push(tx);
        self.runlimit_used = total;
        Ok(id)
    }

    fn apply_effects(&mut self, effects: TxEffects) -> Result<()> {
        for id in &effects.contracts_consumed {
            self.working.remove_contract(id)?;
        }
        for id in effects.contracts_created {
            self.working.insert_contract(id)?;
        }
        for entry in effects.nonces {
            if entry.expires_ms < self.timestamp_ms {
                return Err(BuildError::NonceExpired {
                    id: entry.id,
                    expires_ms: entry.expires_ms,
                    timestamp_ms: self.timestamp_ms,
                });
            }
            self.working.insert_nonce(entry)?;
        }
        Ok(())
    }

    /// Finish the session: produce the block and the snapshot that follows it.
    pub fn build(self) -> Result<(UnsignedBlock, Snapshot)> {
        if self.aborted {
            return Err(BuildError::SessionAborted);
        }

        let next_predicate = self
            .config
            .next_predicate
            .clone()
            .or_else(|| self.working.next_predicate().cloned())
            .ok_or(BuildError::EmptyPredicateMismatch)?;
        next_predicate.check()?;

        let runlimit = match self.config.runlimit_policy {
            RunlimitPolicy::Accumulated => self.runlimit_used,
            RunlimitPolicy::Ceiling => self.config.max_block_runlimit,
        };

        let header = UnsignedBlockHeader {
            version: self.config.block_version,
            height: self.height,
            previous_block_id: self.previous_block_id,
            timestamp_ms: self.timestamp_ms,
            runlimit,
            refs_count: self.transactions.len() as u64,
            transactions_root: merkle_root(&self.leaves),
            contracts_root: self.working.contracts_root(),
            nonces_root: self.working.nonces_root(),
            next_predicate,
        };

        let mut snapshot = self.working;
        snapshot.apply_header(&header)?;

        info!(
            height = header.height,
            txs = header.refs_count,
            runlimit = header.runlimit,
            block_id = %short_hex(&snapshot.last_block_id().unwrap_or_default()),
            "Block built"
        );

        Ok((
            UnsignedBlock {
                header,
                transactions: self.transactions,
            },
            snapshot,
        ))
    }
}
