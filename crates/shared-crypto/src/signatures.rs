//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces. Block quorum
//! signatures are Ed25519 signatures over the 32-byte block ID.
//!
//! Signing needs no RNG. Verification is strict: malleable signatures and
//! small-order keys are rejected.

use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 public key (32 bytes).
///
/// Keys decoded from the wire are checked for being a curve point only when
/// used to verify, so a decoded predicate always re-encodes unchanged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LEN]);

impl Ed25519PublicKey {
    /// Create from bytes, validating the curve point.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a byte slice of exactly [`PUBLIC_KEY_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::BadPubkeyLength {
                    expected: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                })?;
        Self::from_bytes(array)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Strictly verify `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        VerifyingKey::from_bytes(&self.0)
            .map_err(|_| CryptoError::InvalidPublicKey)?
            .verify_strict(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", hex::encode(self.0))
    }
}

/// Ed25519 signature (64 bytes).
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519Signature(#[serde_as(as = "Bytes")] [u8; SIGNATURE_LEN]);

impl Ed25519Signature {
    /// Wrap raw signature bytes. Validity is only known at verification.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice of exactly [`SIGNATURE_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::BadSignatureLength {
                    expected: SIGNATURE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({}..)", hex::encode(&self.0[..8]))
    }
}

/// Signing half of a quorum member's key.
///
/// The inner `SigningKey` wipes itself on drop; seeds handed out by
/// [`Ed25519KeyPair::to_seed`] are wrapped in [`Zeroizing`].
pub struct Ed25519KeyPair {
    secret: SigningKey,
}

impl Ed25519KeyPair {
    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            secret: SigningKey::generate(&mut OsRng),
        }
    }

    /// Key derived from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            secret: SigningKey::from_bytes(&seed),
        }
    }

    /// Key derived from a seed slice; anything but 32 bytes is rejected.
    pub fn from_seed_slice(seed: &[u8]) -> Result<Self, CryptoError> {
        if seed.len() != 32 {
            return Err(CryptoError::BadPrivateKeyLength {
                expected: 32,
                actual: seed.len(),
            });
        }
        let mut array = Zeroizing::new([0u8; 32]);
        array.copy_from_slice(seed);
        Ok(Self::from_seed(*array))
    }

    /// The public key a predicate lists for this signer.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.secret.verifying_key().to_bytes())
    }

    /// Sign `message` (a block ID, in practice).
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.secret.sign(message).to_bytes())
    }

    /// The seed, wiped when the returned value is dropped.
    pub fn to_seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes())
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
