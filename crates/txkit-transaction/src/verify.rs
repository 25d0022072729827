//! Local script verification of signed transaction inputs.
//!
//! Re-executes the combined unlocking + locking script pair through the
//! interpreter to confirm a transaction is self-consistent before it is
//! handed to the submission collaborator. `OP_CHECKSIG` recomputes the
//! legacy signature hash for the input and verifies the ECDSA signature
//! against the embedded public key.

use txkit_primitives::ec::{PublicKey, Signature};
use txkit_script::interpreter::{Engine, InterpreterError, InterpreterErrorCode, TxContext};
use txkit_script::Script;

use crate::sighash;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Bridges a `Transaction` into the interpreter's `TxContext` seam.
struct SigContext<'a> {
    tx: &'a Transaction,
}

impl TxContext for SigContext<'_> {
    fn verify_signature(
        &self,
        full_sig: &[u8],
        pub_key: &[u8],
        sub_script: &Script,
        input_idx: usize,
        sighash_flag: u32,
    ) -> Result<bool, InterpreterError> {
        if full_sig.is_empty() {
            return Ok(false);
        }
        let sig_der = &full_sig[..full_sig.len() - 1];

        let sig = match Signature::from_der(sig_der) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        let key = match PublicKey::from_bytes(pub_key) {
            Ok(key) => key,
            Err(_) => return Ok(false),
        };

        let digest =
            sighash::signature_hash(self.tx, input_idx, sub_script.to_bytes(), sighash_flag)
                .map_err(|e| {
                    InterpreterError::new(InterpreterErrorCode::InvalidParams, e.to_string())
                })?;

        Ok(key.verify(&digest, &sig))
    }
}

/// Verify one input of a transaction against the previous output's
/// locking script.
///
/// Concatenates the input's unlocking script and `prev_locking_script`
/// and executes them through the script interpreter.
///
/// # Arguments
/// * `tx` - The signed transaction.
/// * `input_index` - The input to verify.
/// * `prev_locking_script` - The locking script of the output being spent.
///
/// # Returns
/// `Ok(true)` if execution terminates with a single truthy value,
/// `Ok(false)` for any script-level validation failure (signature
/// mismatch, wrong public key, failed comparison), and `Err` only for
/// scripts that cannot be parsed into opcodes at all.
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    prev_locking_script: &Script,
) -> Result<bool, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let unlocking_script = input.unlocking_script.clone().unwrap_or_default();
    let ctx = SigContext { tx };

    match Engine::new().execute(&unlocking_script, prev_locking_script, Some(&ctx), input_index) {
        Ok(()) => Ok(true),
        Err(e) if e.code == InterpreterErrorCode::MalformedPush => {
            Err(TransactionError::ScriptParse(e.to_string()))
        }
        Err(_) => Ok(false),
    }
}
