//! # Chain State Snapshot
//!
//! Two content-addressed sets plus the chain tip they were folded from.
//!
//! ## Canonical Order
//!
//! Both sets are ordered by ID (`BTreeSet` / `BTreeMap`), so enumeration,
//! equality and roots are independent of insertion order.
//!
//! ## Roots
//!
//! - `contracts_root`: Merkle root over contract IDs
//! - `nonces_root`: Merkle root over `H(tag || id || expires_ms)`

use serde::{Deserialize, Serialize};
use shared_crypto::{merkle_root, tagged_hash, Hash};
use shared_types::encoding::{encode_nonce, NONCE_TAG};
use shared_types::{Predicate, UnsignedBlockHeader, WireCodec};
use std::collections::{BTreeMap, BTreeSet};

use super::errors::SnapshotError;

/// A one-time-use token with an expiry. While present in the nonce set it
/// blocks replay of the transaction that introduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceEntry {
    /// Nonce ID.
    pub id: Hash,
    /// Milliseconds timestamp after which the nonce may be pruned.
    pub expires_ms: u64,
}

impl NonceEntry {
    /// Create a nonce entry.
    pub fn new(id: Hash, expires_ms: u64) -> Self {
        Self { id, expires_ms }
    }

    /// Merkle leaf for this entry.
    pub fn leaf(&self) -> Hash {
        tagged_hash(NONCE_TAG, &encode_nonce(&self.id, self.expires_ms))
    }
}

/// Accumulated chain state as of `height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    contracts: BTreeSet<Hash>,
    nonces: BTreeMap<Hash, u64>,
    height: u64,
    timestamp_ms: u64,
    last_block_id: Option<Hash>,
    next_predicate: Option<Predicate>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    /// State before the genesis block: no contracts, no nonces, height 0.
    pub fn empty() -> Self {
        Self {
            contracts: BTreeSet::new(),
            nonces: BTreeMap::new(),
            height: 0,
            timestamp_ms: 0,
            last_block_id: None,
            next_predicate: None,
        }
    }

    /// Height of the last block folded into this snapshot.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Timestamp of the last block folded into this snapshot.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// ID of the last block folded into this snapshot.
    pub fn last_block_id(&self) -> Option<Hash> {
        self.last_block_id
    }

    /// Predicate the next block must satisfy.
    pub fn next_predicate(&self) -> Option<&Predicate> {
        self.next_predicate.as_ref()
    }

    // =========================================================================
    // CONTRACTS
    // =========================================================================

    /// Is the contract in the committed set?
    pub fn contains_contract(&self, id: &Hash) -> bool {
        self.contracts.contains(id)
    }

    /// Add a contract.
    pub fn insert_contract(&mut self, id: Hash) -> Result<(), SnapshotError> {
        if !self.contracts.insert(id) {
            return Err(SnapshotError::DuplicateContract { id });
        }
        Ok(())
    }

    /// Remove (consume) a contract.
    pub fn remove_contract(&mut self, id: &Hash) -> Result<(), SnapshotError> {
        if !self.contracts.remove(id) {
            return Err(SnapshotError::ContractNotFound { id: *id });
        }
        Ok(())
    }

    /// Contract IDs in canonical order.
    pub fn contracts(&self) -> impl Iterator<Item = &Hash> {
        self.contracts.iter()
    }

    /// Number of committed contracts.
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }

    /// Merkle root of the contract set.
    pub fn contracts_root(&self) -> Hash {
        let leaves: Vec<Hash> = self.contracts.iter().copied().collect();
        merkle_root(&leaves)
    }

    // =========================================================================
    // NONCES
    // =========================================================================

    /// Is the nonce in the set?
    pub fn contains_nonce(&self, id: &Hash) -> bool {
        self.nonces.contains_key(id)
    }

    /// Expiry of a nonce, if present.
    pub fn nonce_expiry(&self, id: &Hash) -> Option<u64> {
        self.nonces.get(id).copied()
    }

    /// Add a nonce. A nonce ID may only be present once.
    pub fn insert_nonce(&mut self, entry: NonceEntry) -> Result<(), SnapshotError> {
        if self.nonces.contains_key(&entry.id) {
            return Err(SnapshotError::DuplicateNonce { id: entry.id });
        }
        self.nonces.insert(entry.id, entry.expires_ms);
        Ok(())
    }

    /// Remove a nonce.
    pub fn remove_nonce(&mut self, id: &Hash) -> Result<(), SnapshotError> {
        self.nonces
            .remove(id)
            .map(|_| ())
            .ok_or(SnapshotError::NonceNotFound { id: *id })
    }

    /// Drop every nonce that expired before `now_ms`. Returns how many were
    /// dropped.
    pub fn prune_nonces(&mut self, now_ms: u64) -> usize {
        let before = self.nonces.len();
        self.nonces.retain(|_, expires_ms| *expires_ms >= now_ms);
        let pruned = before - self.nonces.len();
        if pruned > 0 {
            tracing::debug!(pruned, now_ms, "pruned expired nonces");
        }
        pruned
    }

    /// Nonces in canonical order.
    pub fn nonces(&self) -> impl Iterator<Item = NonceEntry> + '_ {
        self.nonces
            .iter()
            .map(|(id, expires_ms)| NonceEntry::new(*id, *expires_ms))
    }

    /// Number of live nonces.
    pub fn nonce_count(&self) -> usize {
        self.nonces.len()
    }

    /// Merkle root of the nonce set.
    pub fn nonces_root(&self) -> Hash {
        let leaves: Vec<Hash> = self.nonces().map(|n| n.leaf()).collect();
        merkle_root(&leaves)
    }

    // =========================================================================
    // CHAIN TIP
    // =========================================================================

    /// Fold a freshly built header into the snapshot: the header becomes the
    /// chain tip the next block links to.
    pub fn apply_header(&mut self, header: &UnsignedBlockHeader) -> Result<(), SnapshotError> {
        if self.height.checked_add(1) != Some(header.height) {
            return Err(SnapshotError::HeaderOutOfSequence {
                current: self.height,
                got: header.height,
            });
        }
        self.height = header.height;
        self.timestamp_ms = header.timestamp_ms;
        self.last_block_id = Some(header.hash());
        self.next_predicate = Some(header.next_predicate.clone());
        Ok(())
    }
}

impl WireCodec for Snapshot {}
