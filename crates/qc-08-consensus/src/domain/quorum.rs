//! Quorum signature verification.
//!
//! Slots are verified in parallel; results are folded in index order so the
//! lowest invalid index is the one reported.

use rayon::prelude::*;
use shared_types::{Predicate, SignatureSlot, SignedBlock};

use super::error::BlockValidationError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum SlotStatus {
    Valid,
    Absent,
    Invalid,
}

/// Check that `signed` carries a quorum of valid signatures for
/// `previous_predicate`.
///
/// A present signature that fails to verify is a hard error, never counted
/// as an abstention.
pub fn validate_signatures(
    signed: &SignedBlock,
    previous_predicate: &Predicate,
) -> Result<(), BlockValidationError> {
    if previous_predicate.check().is_err() {
        return Err(BlockValidationError::MalformedPredicate {
            quorum: previous_predicate.quorum,
            keys: previous_predicate.len(),
        });
    }
    if signed.signatures.len() != previous_predicate.len() {
        return Err(BlockValidationError::SignatureCountMismatch {
            expected: previous_predicate.len(),
            got: signed.signatures.len(),
        });
    }

    let block_id = signed.block_id();
    let statuses: Vec<SlotStatus> = signed
        .signatures
        .par_iter()
        .zip(previous_predicate.pubkeys.par_iter())
        .map(|(slot, pubkey)| match slot {
            SignatureSlot::Absent => SlotStatus::Absent,
            SignatureSlot::Present(sig) => match pubkey.verify(&block_id, sig) {
                Ok(()) => SlotStatus::Valid,
                Err(_) => SlotStatus::Invalid,
            },
        })
        .collect();

    if let Some(index) = statuses.iter().position(|s| *s == SlotStatus::Invalid) {
        return Err(BlockValidationError::InvalidSignature { index });
    }

    let valid = statuses.iter().filter(|s| **s == SlotStatus::Valid).count();
    let required = previous_predicate.quorum as usize;
    if valid < required {
        return Err(BlockValidationError::QuorumNotMet { valid, required });
    }
    Ok(())
}
