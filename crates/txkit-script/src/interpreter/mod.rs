//! Script interpreter for the legacy P2PKH opcode subset.
//!
//! Executes an input's unlocking script followed by the referenced
//! output's locking script against a shared stack machine, and reports
//! whether execution terminates with a single truthy value.
//!
//! # Architecture
//!
//! The interpreter does not depend on the transaction crate. Callers
//! provide a [`TxContext`] trait implementation that handles signature
//! hash computation and ECDSA verification for `OP_CHECKSIG`.

pub mod error;
pub mod parsed_opcode;
pub mod stack;
pub mod thread;

mod ops_crypto;

pub use error::{InterpreterError, InterpreterErrorCode};
pub use parsed_opcode::{ParsedOpcode, ParsedScript};
pub use stack::Stack;
pub use thread::Thread;

use crate::Script;

/// Transaction context trait — provides signature verification without a
/// dependency on the transaction crate.
///
/// Implementors supply the transaction data needed for `OP_CHECKSIG`.
pub trait TxContext {
    /// Verify a signature against a public key for the given input.
    ///
    /// `full_sig` includes the sighash flag byte at the end.
    /// `pub_key` is the SEC1 public key bytes.
    /// `sub_script` is the signed portion of the locking script.
    /// `input_idx` is the input being verified.
    /// `sighash_flag` is the sighash type recovered from the signature.
    ///
    /// Returns Ok(true) if valid, Ok(false) if invalid, Err on failure
    /// to compute the signature hash at all.
    fn verify_signature(
        &self,
        full_sig: &[u8],
        pub_key: &[u8],
        sub_script: &Script,
        input_idx: usize,
        sighash_flag: u32,
    ) -> Result<bool, InterpreterError>;
}

/// The script execution engine.
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Execute unlocking + locking scripts.
    ///
    /// # Arguments
    /// * `unlocking_script` - The input's unlocking (signature) script.
    /// * `locking_script` - The output's locking (pubkey) script.
    /// * `tx_context` - Optional transaction context for checksig operations.
    /// * `input_idx` - The input index being verified.
    ///
    /// # Returns
    /// `Ok(())` if execution finishes with a truthy top-of-stack, or the
    /// interpreter error describing the failure.
    pub fn execute(
        &self,
        unlocking_script: &Script,
        locking_script: &Script,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<(), InterpreterError> {
        let mut thread = Thread::new(unlocking_script, locking_script, tx_context, input_idx)?;
        thread.execute()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;
    use txkit_primitives::hash::hash160;

    #[test]
    fn test_push_equal() {
        let unlock = Script::from_bytes(&[OP_1]);
        let lock = Script::from_bytes(&[OP_1, OP_EQUAL]);
        let engine = Engine::new();
        assert!(engine.execute(&unlock, &lock, None, 0).is_ok());
    }

    #[test]
    fn test_push_equal_mismatch_fails() {
        let unlock = Script::from_bytes(&[OP_1]);
        let lock = Script::from_bytes(&[0x52 /* OP_2 */, OP_EQUAL]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(result.unwrap_err().code, InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn test_p2pkh_hash_path() {
        // Standard P2PKH pattern without the final signature check: push
        // pubkey bytes, duplicate, hash160, compare against the expected
        // hash, then leave a truthy value.
        let pubkey = vec![0x04; 33];
        let pkh = hash160(&pubkey);

        let mut unlock_bytes = vec![pubkey.len() as u8];
        unlock_bytes.extend_from_slice(&pubkey);

        let mut lock_bytes = vec![OP_DUP, OP_HASH160];
        lock_bytes.push(pkh.len() as u8);
        lock_bytes.extend_from_slice(&pkh);
        lock_bytes.push(OP_EQUALVERIFY);
        lock_bytes.push(OP_DROP);
        lock_bytes.push(OP_1);

        let engine = Engine::new();
        let result = engine.execute(
            &Script::from_bytes(&unlock_bytes),
            &Script::from_bytes(&lock_bytes),
            None,
            0,
        );
        assert!(result.is_ok(), "hash path should pass: {:?}", result.err());
    }

    #[test]
    fn test_equalverify_failure() {
        let unlock = Script::from_bytes(&[0x01, 0xAA]);
        let lock = Script::from_bytes(&[0x01, 0xBB, OP_EQUALVERIFY, OP_1]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(result.unwrap_err().code, InterpreterErrorCode::EqualVerify);
    }

    #[test]
    fn test_verify_failure() {
        let unlock = Script::from_bytes(&[OP_0]);
        let lock = Script::from_bytes(&[OP_VERIFY]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(result.unwrap_err().code, InterpreterErrorCode::Verify);
    }

    #[test]
    fn test_op_return_fails() {
        let unlock = Script::from_bytes(&[OP_1]);
        let lock = Script::from_bytes(&[OP_RETURN]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(result.unwrap_err().code, InterpreterErrorCode::EarlyReturn);
    }

    #[test]
    fn test_unsupported_opcode_fails() {
        let unlock = Script::from_bytes(&[OP_1]);
        // 0x93 is OP_ADD, outside the P2PKH subset.
        let lock = Script::from_bytes(&[0x93]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(
            result.unwrap_err().code,
            InterpreterErrorCode::ReservedOpcode
        );
    }

    #[test]
    fn test_empty_both_scripts() {
        let engine = Engine::new();
        let result = engine.execute(&Script::new(), &Script::new(), None, 0);
        assert_eq!(result.unwrap_err().code, InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn test_empty_unlocking_script() {
        let engine = Engine::new();
        let result = engine.execute(&Script::new(), &Script::from_bytes(&[OP_1]), None, 0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_truncated_push_is_malformed() {
        let unlock = Script::from_bytes(&[0x05, 0x00]);
        let lock = Script::from_bytes(&[OP_1]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(
            result.unwrap_err().code,
            InterpreterErrorCode::MalformedPush
        );
    }

    #[test]
    fn test_checksig_without_context_is_rejected() {
        let unlock = Script::from_bytes(&[OP_1]);
        let lock = Script::from_bytes(&[OP_CHECKSIG]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(
            result.unwrap_err().code,
            InterpreterErrorCode::InvalidParams
        );
    }

    #[test]
    fn test_sha256_op() {
        // SHA256 of an empty push, compared against the known digest.
        let digest =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        let unlock = Script::from_bytes(&[OP_0]);
        let mut lock = Script::new();
        lock.append_opcodes(&[OP_SHA256]).unwrap();
        lock.append_push_data(&digest).unwrap();
        lock.append_opcodes(&[OP_EQUAL]).unwrap();

        let engine = Engine::new();
        assert!(engine.execute(&unlock, &lock, None, 0).is_ok());
    }

    #[test]
    fn test_stack_underflow() {
        let unlock = Script::from_bytes(&[OP_1]);
        let lock = Script::from_bytes(&[OP_EQUAL]);
        let engine = Engine::new();
        let result = engine.execute(&unlock, &lock, None, 0);
        assert_eq!(
            result.unwrap_err().code,
            InterpreterErrorCode::InvalidStackOperation
        );
    }
}
