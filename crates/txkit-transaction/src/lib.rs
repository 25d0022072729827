/// txkit - Transaction building, signing, serialization, and verification.
///
/// Provides the legacy Transaction type with inputs, outputs, signature
/// hash computation, P2PKH script templates, binary/hex serialization,
/// and local script verification of signed inputs.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod verify;

mod error;
pub use error::TransactionError;
pub use input::{OutPoint, TransactionInput, DEFAULT_SEQUENCE_NUMBER};
pub use output::TransactionOutput;
pub use transaction::{Transaction, TX_VERSION};
pub use verify::verify_input;

#[cfg(test)]
mod tests;
