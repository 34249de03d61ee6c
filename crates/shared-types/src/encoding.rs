//! # Canonical Encoding
//!
//! Byte layout that feeds block IDs and transaction IDs. Independent of the
//! wire codec: changing serde derives must never change a block ID.
//!
//! All integers are little-endian and fixed width. Variable-length fields
//! carry a `u64` length prefix. Optional hashes carry a `0x00`/`0x01` flag.

use crate::entities::{Predicate, Transaction, UnsignedBlockHeader};
use shared_crypto::Hash;

/// Domain tag for block IDs.
pub const BLOCK_HEADER_TAG: &[u8] = b"qc/blockheader/v1";

/// Domain tag for transaction IDs.
pub const TRANSACTION_TAG: &[u8] = b"qc/tx/v1";

/// Domain tag for nonce set leaves.
pub const NONCE_TAG: &[u8] = b"qc/nonce/v1";

/// Encode a header for hashing.
pub fn encode_header(header: &UnsignedBlockHeader) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(256 + 32 * header.next_predicate.pubkeys.len());

    bytes.extend_from_slice(&header.version.to_le_bytes());
    bytes.extend_from_slice(&header.height.to_le_bytes());
    put_optional_hash(&mut bytes, header.previous_block_id.as_ref());
    bytes.extend_from_slice(&header.timestamp_ms.to_le_bytes());
    bytes.extend_from_slice(&header.runlimit.to_le_bytes());
    bytes.extend_from_slice(&header.refs_count.to_le_bytes());
    bytes.extend_from_slice(&header.transactions_root);
    bytes.extend_from_slice(&header.contracts_root);
    bytes.extend_from_slice(&header.nonces_root);
    put_predicate(&mut bytes, &header.next_predicate);

    bytes
}

/// Encode a transaction for hashing.
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(20 + tx.program.len());

    bytes.extend_from_slice(&tx.version.to_le_bytes());
    bytes.extend_from_slice(&tx.runlimit.to_le_bytes());
    bytes.extend_from_slice(&(tx.program.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&tx.program);

    bytes
}

/// Encode a nonce set entry for hashing.
pub fn encode_nonce(id: &Hash, expires_ms: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(40);
    bytes.extend_from_slice(id);
    bytes.extend_from_slice(&expires_ms.to_le_bytes());
    bytes
}

fn put_optional_hash(bytes: &mut Vec<u8>, hash: Option<&Hash>) {
    match hash {
        Some(h) => {
            bytes.push(1);
            bytes.extend_from_slice(h);
        }
        None => bytes.push(0),
    }
}

fn put_predicate(bytes: &mut Vec<u8>, predicate: &Predicate) {
    bytes.extend_from_slice(&predicate.version.to_le_bytes());
    bytes.extend_from_slice(&predicate.quorum.to_le_bytes());
    bytes.extend_from_slice(&(predicate.pubkeys.len() as u64).to_le_bytes());
    for key in &predicate.pubkeys {
        bytes.extend_from_slice(key.as_bytes());
    }
}
