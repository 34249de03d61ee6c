//! # Wire Codec
//!
//! The serialize/deserialize boundary for blocks, headers, transactions and
//! snapshots. bincode, fixed-width integers, little endian, no trailing
//! bytes, capped at [`MAX_WIRE_BYTES`].
//!
//! Consensus never depends on these bytes; block IDs come from
//! [`crate::encoding`].

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};

use crate::entities::{SignedBlock, Transaction, UnsignedBlock, UnsignedBlockHeader};
use crate::errors::CodecError;
use crate::MAX_WIRE_BYTES;

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_WIRE_BYTES as u64)
        .reject_trailing_bytes()
}

/// Types that cross the wire boundary.
pub trait WireCodec: Serialize + DeserializeOwned {
    /// Encode to wire bytes.
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        wire_options()
            .serialize(self)
            .map_err(|e| CodecError::Serialize(e.to_string()))
    }

    /// Decode from wire bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() > MAX_WIRE_BYTES {
            return Err(CodecError::TooLarge {
                size: bytes.len(),
                max: MAX_WIRE_BYTES,
            });
        }
        wire_options()
            .deserialize(bytes)
            .map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}

impl WireCodec for SignedBlock {}
impl WireCodec for UnsignedBlock {}
impl WireCodec for UnsignedBlockHeader {}
impl WireCodec for Transaction {}
