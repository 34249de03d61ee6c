//! Failures from key parsing, signature checks and Merkle proofs.

use thiserror::Error;

/// Error returned by every fallible function in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Public key bytes have the wrong length
    #[error("bad pubkey length {actual}, want {expected}")]
    BadPubkeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Signature bytes have the wrong length
    #[error("bad signature length {actual}, want {expected}")]
    BadSignatureLength {
        /// Expected signature length in bytes
        expected: usize,
        /// Actual signature length in bytes
        actual: usize,
    },

    /// Private key seed has the wrong length
    #[error("bad private key length {actual}, want {expected}")]
    BadPrivateKeyLength {
        /// Expected seed length in bytes
        expected: usize,
        /// Actual seed length in bytes
        actual: usize,
    },

    /// Signature does not verify under the key
    #[error("signature does not verify")]
    SignatureVerificationFailed,

    /// Public key bytes are not a valid curve point
    #[error("public key is not a valid curve point")]
    InvalidPublicKey,

    /// Merkle proof requested for a leaf that does not exist
    #[error("leaf {index} out of range, tree has {leaf_count}")]
    LeafIndexOutOfRange {
        /// Requested leaf index
        index: usize,
        /// Number of leaves in the tree
        leaf_count: usize,
    },
}
