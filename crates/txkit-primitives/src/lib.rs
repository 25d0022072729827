/// txkit - Hashing, wire encoding, and key primitives.
///
/// This crate provides the foundational building blocks for txkit:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Chain hash type for transaction identification
/// - Variable-length integer and little-endian wire codec helpers
/// - Base58 / Base58Check encoding
/// - secp256k1 keys and ECDSA signatures

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
