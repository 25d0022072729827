//! Script templates for standard transaction types.
//!
//! Provides the `UnlockingScriptTemplate` trait and the P2PKH
//! implementation for creating locking and unlocking scripts during
//! transaction signing.

pub mod p2pkh;

use txkit_script::Script;

use crate::transaction::Transaction;
use crate::TransactionError;

/// Trait for script templates that produce unlocking scripts.
///
/// Any signing strategy should implement this trait. The `sign` method
/// receives the full transaction and the input index, computes the
/// appropriate signature hash, signs it, and returns the unlocking script.
pub trait UnlockingScriptTemplate {
    /// Produce an unlocking script for the given input.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The index of the input to sign.
    ///
    /// # Returns
    /// `Ok(Script)` containing the unlocking script, or an error on failure.
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError>;
}
