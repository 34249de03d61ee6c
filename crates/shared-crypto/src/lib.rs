//! Hashing, Merkle trees and Ed25519 for the block protocol.
//!
//! Builder, signer and validator must agree on these bit for bit, so each
//! concern has exactly one implementation here:
//!
//! - [`hashing`]: SHA3-256 for block, transaction and predicate IDs.
//! - [`merkle`]: binary SHA3-256 tree behind the transaction, contract
//!   and nonce roots. Leaves hash under `0x00`, interior nodes under `0x01`.
//! - [`signatures`]: Ed25519 quorum signatures over block IDs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod merkle;
pub mod signatures;

pub use errors::CryptoError;
pub use hashing::{
    hash, hash_many, short_hex, tagged_hash, Hash, Sha3Hasher, EMPTY_ROOT, HASH_LEN,
};
pub use merkle::{merkle_root, MerkleProof, MerkleTree, ProofStep, SiblingPosition};
pub use signatures::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, PUBLIC_KEY_LEN, SIGNATURE_LEN,
};
