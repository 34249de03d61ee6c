//! Quorum signing.
//!
//! A block is signed by the keys of its predecessor's `next_predicate`. The
//! signature list is index-aligned with that predicate's pubkeys; a signer
//! that declines leaves [`SignatureSlot::Absent`] in its slot.

use rayon::prelude::*;
use shared_crypto::{Ed25519KeyPair, Hash};
use shared_types::{Predicate, Signature, SignatureSlot, SignedBlock, UnsignedBlock};
use tracing::debug;

use crate::error::SignError;

/// Sign `block` for `previous_predicate`.
///
/// `signer(index, &block_id)` is called once per predicate key, in parallel.
/// `Ok(None)` abstains; any error fails the whole signing.
pub fn sign_block<F>(
    block: UnsignedBlock,
    previous_predicate: &Predicate,
    signer: F,
) -> Result<SignedBlock, SignError>
where
    F: Fn(usize, &Hash) -> Result<Option<Signature>, SignError> + Sync,
{
    previous_predicate.check()?;
    let block_id = block.hash();

    let signatures = (0..previous_predicate.len())
        .into_par_iter()
        .map(|index| signer(index, &block_id).map(SignatureSlot::from))
        .collect::<Result<Vec<_>, _>>()?;

    let signed = SignedBlock { block, signatures };
    debug!(
        height = signed.header().height,
        present = signed.present_signatures(),
        quorum = previous_predicate.quorum,
        "Block signed"
    );
    Ok(signed)
}

/// Sign `block` with positional private keys.
///
/// `keys[i]` signs for `predicate.pubkeys[i]`. A `None` entry, or a list
/// shorter than the predicate, abstains.
pub fn sign_with_keys(
    block: UnsignedBlock,
    predicate: &Predicate,
    keys: &[Option<Ed25519KeyPair>],
) -> Result<SignedBlock, SignError> {
    if keys.len() > predicate.len() {
        return Err(SignError::TooManyKeys {
            keys: keys.len(),
            pubkeys: predicate.len(),
        });
    }

    sign_block(block, predicate, |index, block_id| match keys.get(index) {
        Some(Some(key)) => {
            if key.public_key() != predicate.pubkeys[index] {
                return Err(SignError::KeyMismatch { index });
            }
            Ok(Some(key.sign(block_id)))
        }
        _ => Ok(None),
    })
}
