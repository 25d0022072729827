//! Elliptic curve cryptography over secp256k1.
//!
//! Private keys, public keys, and ECDSA signatures with the encodings
//! used by legacy Bitcoin transactions (WIF, SEC1, DER).

mod private_key;
mod public_key;
mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
