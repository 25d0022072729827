/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, EC operations, key decoding, and wire parsing.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("private key scalar out of range (zero or >= curve order)")]
    ScalarOutOfRange,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
