//! Raw fetched bytes.

use feed_model::{TextEncoding, Transfer};

/// Unprocessed bytes of one fetch, plus how they are meant to be decoded.
///
/// Owned by the caller only until decoding; nothing here checks that the
/// bytes are actually valid in the declared encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    /// Name of the descriptor that produced this payload.
    pub resource: String,
    /// Human-readable location the bytes were read from.
    pub location: String,
    /// The bytes as received.
    pub bytes: Vec<u8>,
    /// Character encoding from the descriptor.
    pub encoding: TextEncoding,
    /// Transfer encoding from the descriptor.
    pub transfer: Transfer,
}

impl RawPayload {
    /// Number of bytes received.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if nothing was received.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
