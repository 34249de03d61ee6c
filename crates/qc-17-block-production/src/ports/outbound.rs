//! Outbound ports (driven side - SPI)
//!
//! The transaction VM is a black box: it reads the working snapshot, runs a
//! program, and reports the state effects plus the runlimit it consumed.
//! The builder applies the effects; the VM never mutates state itself.

use qc_04_state_management::{NonceEntry, Snapshot};
use serde::{Deserialize, Serialize};
use shared_types::Hash;
use thiserror::Error;

/// State effects of one transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEffects {
    /// Contracts spent by the transaction; each must exist.
    pub contracts_consumed: Vec<Hash>,
    /// Contracts created by the transaction; each must be new.
    pub contracts_created: Vec<Hash>,
    /// Nonces introduced by the transaction; each must be new.
    pub nonces: Vec<NonceEntry>,
}

/// Successful execution of one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Effects to apply to the working snapshot.
    pub effects: TxEffects,
    /// Runlimit actually consumed.
    pub cost: i64,
}

/// Execution failure reported by the VM.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VmFault {
    /// The program failed.
    #[error("execution failed: {0}")]
    Failed(String),

    /// The program ran out of runlimit.
    #[error("runlimit exhausted after {used} (limit {limit})")]
    OutOfRunlimit {
        /// Runlimit consumed when execution stopped
        used: i64,
        /// Declared runlimit
        limit: i64,
    },
}

/// Port: execute a transaction program against a snapshot.
pub trait TxExecutor {
    /// Run `program` with at most `runlimit` against `snapshot`.
    fn apply(&self, snapshot: &Snapshot, program: &[u8], runlimit: i64)
        -> Result<Execution, VmFault>;
}

impl<F> TxExecutor for F
where
    F: Fn(&Snapshot, &[u8], i64) -> Result<Execution, VmFault>,
{
    fn apply(
        &self,
        snapshot: &Snapshot,
        program: &[u8],
        runlimit: i64,
    ) -> Result<Execution, VmFault> {
        self(snapshot, program, runlimit)
    }
}
