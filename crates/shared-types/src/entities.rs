//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Authorization**: `Predicate`, `SignatureSlot`
//! - **Chain**: `UnsignedBlockHeader`, `UnsignedBlock`, `SignedBlock`
//! - **Execution input**: `Transaction`

use serde::{Deserialize, Serialize};
use shared_crypto::{tagged_hash, Ed25519PublicKey, Ed25519Signature, Hash};

use crate::encoding::{self, BLOCK_HEADER_TAG, TRANSACTION_TAG};
use crate::errors::TypeError;
use crate::CURRENT_PREDICATE_VERSION;

/// A 32-byte Ed25519 public key.
pub type PublicKey = Ed25519PublicKey;

/// A 64-byte Ed25519 signature.
pub type Signature = Ed25519Signature;

// =============================================================================
// CLUSTER A: AUTHORIZATION
// =============================================================================

/// Quorum-of-N authorization predicate.
///
/// A block is authorized by its predecessor's `next_predicate`: at least
/// `quorum` of `pubkeys` must sign the block ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Predicate format version.
    pub version: u32,
    /// Minimum number of valid signatures.
    pub quorum: u32,
    /// Ordered signer keys; signature slots align with this order.
    pub pubkeys: Vec<PublicKey>,
}

impl Predicate {
    /// Create a predicate, checking `quorum <= pubkeys.len()`.
    pub fn new(version: u32, quorum: u32, pubkeys: Vec<PublicKey>) -> Result<Self, TypeError> {
        let predicate = Self {
            version,
            quorum,
            pubkeys,
        };
        predicate.check()?;
        Ok(predicate)
    }

    /// Create a predicate where a quorum of `0` means "every key".
    ///
    /// With no keys the quorum stays `0` and the predicate is trivially
    /// satisfied.
    pub fn with_default_quorum(
        version: u32,
        quorum: u32,
        pubkeys: Vec<PublicKey>,
    ) -> Result<Self, TypeError> {
        let count = u32::try_from(pubkeys.len()).map_err(|_| TypeError::TooManyPubkeys {
            count: pubkeys.len(),
        })?;
        let quorum = if quorum == 0 { count } else { quorum };
        Self::new(version, quorum, pubkeys)
    }

    /// The key-less, quorum-0 predicate.
    pub fn empty() -> Self {
        Self {
            version: CURRENT_PREDICATE_VERSION,
            quorum: 0,
            pubkeys: Vec::new(),
        }
    }

    /// Check the quorum invariant.
    pub fn check(&self) -> Result<(), TypeError> {
        if self.quorum as usize > self.pubkeys.len() {
            return Err(TypeError::MalformedPredicate {
                quorum: self.quorum,
                keys: self.pubkeys.len(),
            });
        }
        Ok(())
    }

    /// True when no signature is required.
    pub fn is_trivial(&self) -> bool {
        self.quorum == 0
    }

    /// Number of signer keys.
    pub fn len(&self) -> usize {
        self.pubkeys.len()
    }

    /// True when the predicate has no keys.
    pub fn is_empty(&self) -> bool {
        self.pubkeys.is_empty()
    }
}

/// One entry of a signature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureSlot {
    /// The signer at this index signed.
    Present(Signature),
    /// The signer at this index abstained.
    Absent,
}

impl SignatureSlot {
    /// True if a signature is present.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The signature, if present.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Present(sig) => Some(sig),
            Self::Absent => None,
        }
    }
}

impl From<Option<Signature>> for SignatureSlot {
    fn from(value: Option<Signature>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

// =============================================================================
// CLUSTER B: EXECUTION INPUT
// =============================================================================

/// A transaction record. The program is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// Declared runlimit (maximum execution cost).
    pub runlimit: i64,
    /// Program bytes executed by the VM.
    pub program: Vec<u8>,
}

impl Transaction {
    /// Create a transaction.
    pub fn new(version: u32, runlimit: i64, program: Vec<u8>) -> Self {
        Self {
            version,
            runlimit,
            program,
        }
    }

    /// Content hash of the transaction; the leaf committed by
    /// `transactions_root`.
    pub fn id(&self) -> Hash {
        tagged_hash(TRANSACTION_TAG, &encoding::encode_transaction(self))
    }
}

// =============================================================================
// CLUSTER C: THE CHAIN
// =============================================================================

/// Header of a block, without signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedBlockHeader {
    /// Block format version.
    pub version: u32,
    /// Height in the chain; the genesis block has height 1.
    pub height: u64,
    /// ID of the predecessor. Absent exactly when `height == 1`.
    pub previous_block_id: Option<Hash>,
    /// Block timestamp in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Block runlimit (see the builder's runlimit policy).
    pub runlimit: i64,
    /// Number of transactions committed by `transactions_root`.
    pub refs_count: u64,
    /// Merkle root of transaction IDs in block order.
    pub transactions_root: Hash,
    /// Merkle root of the contract set after this block.
    pub contracts_root: Hash,
    /// Merkle root of the nonce set after this block.
    pub nonces_root: Hash,
    /// Predicate that must authorize the next block.
    pub next_predicate: Predicate,
}

impl UnsignedBlockHeader {
    /// Block ID: canonical hash of the header. This is also the payload
    /// that quorum members sign.
    pub fn hash(&self) -> Hash {
        tagged_hash(BLOCK_HEADER_TAG, &encoding::encode_header(self))
    }

    /// True for the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 1
    }
}

/// A header with the transactions it commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedBlock {
    /// The header.
    pub header: UnsignedBlockHeader,
    /// Transactions in commit order.
    pub transactions: Vec<Transaction>,
}

impl UnsignedBlock {
    /// Block ID (hash of the header).
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Transaction IDs in commit order.
    pub fn transaction_ids(&self) -> Vec<Hash> {
        self.transactions.iter().map(Transaction::id).collect()
    }
}

/// A block plus the signature list authorizing it.
///
/// `signatures[i]` belongs to `pubkeys[i]` of the previous block's
/// `next_predicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlock {
    /// The signed content.
    pub block: UnsignedBlock,
    /// Index-aligned signature slots.
    pub signatures: Vec<SignatureSlot>,
}

impl SignedBlock {
    /// Wrap a block with no signatures (genesis blocks are distributed like
    /// this).
    pub fn unsigned(block: UnsignedBlock) -> Self {
        Self {
            block,
            signatures: Vec::new(),
        }
    }

    /// The header.
    pub fn header(&self) -> &UnsignedBlockHeader {
        &self.block.header
    }

    /// Block ID (hash of the header).
    pub fn block_id(&self) -> Hash {
        self.block.header.hash()
    }

    /// Transaction at `index`, if any.
    pub fn transaction(&self, index: usize) -> Option<&Transaction> {
        self.block.transactions.get(index)
    }

    /// Number of present signatures (valid or not).
    pub fn present_signatures(&self) -> usize {
        self.signatures.iter().filter(|s| s.is_present()).count()
    }
}
