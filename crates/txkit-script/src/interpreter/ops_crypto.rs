//! Crypto operations for the script interpreter.

use crate::opcodes::OP_CODESEPARATOR;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::*;
use super::thread::Thread;

/// Base sighash type mask (ALL / NONE / SINGLE).
const SIGHASH_MASK: u32 = 0x1f;
/// The ANYONECANPAY sighash modifier bit.
const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Half of the secp256k1 curve order (N/2), for the low-S check.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// The hash family applied by the hashing opcodes.
pub(crate) enum HashKind {
    Sha256,
    Hash160,
    Hash256,
}

impl<'a> Thread<'a> {
    /// Pop the top element, hash it, and push the digest.
    pub(crate) fn op_hash(&mut self, kind: HashKind) -> Result<(), InterpreterError> {
        let buf = self.dstack.pop_byte_array()?;
        let result = match kind {
            HashKind::Sha256 => txkit_primitives::hash::sha256(&buf).to_vec(),
            HashKind::Hash160 => txkit_primitives::hash::hash160(&buf).to_vec(),
            HashKind::Hash256 => txkit_primitives::hash::sha256d(&buf).to_vec(),
        };
        self.dstack.push_byte_array(result);
        Ok(())
    }

    /// The subscript covered by signatures: the currently executing script
    /// from just past the most recent OP_CODESEPARATOR.
    pub(crate) fn sub_script(&self) -> ParsedScript {
        let skip = if self.last_code_sep > 0 {
            self.last_code_sep + 1
        } else {
            0
        };
        self.scripts[self.script_idx][skip..].to_vec()
    }

    /// Execute OP_CHECKSIG.
    ///
    /// Pops the public key and the signature (with its trailing sighash
    /// byte), validates their encodings, rebuilds the signed subscript
    /// with the legacy find-and-delete rules, and asks the transaction
    /// context to recompute the sighash and verify the ECDSA signature.
    /// Pushes the boolean outcome.
    pub(crate) fn op_checksig(&mut self) -> Result<(), InterpreterError> {
        let pk_bytes = self.dstack.pop_byte_array()?;
        let full_sig_bytes = self.dstack.pop_byte_array()?;

        if full_sig_bytes.is_empty() {
            self.dstack.push_bool(false);
            return Ok(());
        }

        let ctx = self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                "no tx context for checksig".to_string(),
            )
        })?;

        let shf = *full_sig_bytes.last().unwrap() as u32;
        let sig_bytes = &full_sig_bytes[..full_sig_bytes.len() - 1];

        self.check_hash_type_encoding(shf)?;
        self.check_signature_encoding(sig_bytes)?;
        self.check_pub_key_encoding(&pk_bytes)?;

        // Legacy rules: the signature itself and any code separators are
        // removed from the signed subscript.
        let mut sub_script = self.sub_script();
        sub_script = remove_opcode_by_data(&sub_script, &full_sig_bytes);
        sub_script = remove_opcode(&sub_script, OP_CODESEPARATOR);
        let script = unparse(&sub_script);

        match ctx.verify_signature(&full_sig_bytes, &pk_bytes, &script, self.input_idx, shf) {
            Ok(valid) => {
                self.dstack.push_bool(valid);
                Ok(())
            }
            Err(_) => {
                self.dstack.push_bool(false);
                Ok(())
            }
        }
    }

    /// Validate the sighash type byte: base type must be ALL, NONE, or
    /// SINGLE, optionally with the ANYONECANPAY bit.
    pub(crate) fn check_hash_type_encoding(&self, shf: u32) -> Result<(), InterpreterError> {
        let base = shf & SIGHASH_MASK & !SIGHASH_ANYONECANPAY;
        if !(1..=3).contains(&base) || (shf & !(SIGHASH_MASK | SIGHASH_ANYONECANPAY)) != 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidSigHashType,
                format!("invalid hash type 0x{:x}", shf),
            ));
        }
        Ok(())
    }

    /// Validate the public key encoding: 33-byte compressed (0x02/0x03)
    /// or 65-byte uncompressed (0x04).
    pub(crate) fn check_pub_key_encoding(&self, pub_key: &[u8]) -> Result<(), InterpreterError> {
        if pub_key.len() == 33 && (pub_key[0] == 0x02 || pub_key[0] == 0x03) {
            return Ok(());
        }
        if pub_key.len() == 65 && pub_key[0] == 0x04 {
            return Ok(());
        }
        Err(InterpreterError::new(
            InterpreterErrorCode::PubKeyType,
            "unsupported public key type".to_string(),
        ))
    }

    /// Validate strict DER structure and the low-S rule for a signature
    /// (without its sighash byte). Empty signatures pass; OP_CHECKSIG
    /// turns them into a false result instead.
    pub(crate) fn check_signature_encoding(&self, sig: &[u8]) -> Result<(), InterpreterError> {
        if sig.is_empty() {
            return Ok(());
        }

        let sig_len = sig.len();
        if sig_len < 8 {
            return Err(sig_err(format!("too short: {} < 8", sig_len)));
        }
        if sig_len > 72 {
            return Err(sig_err(format!("too long: {} > 72", sig_len)));
        }
        if sig[0] != 0x30 {
            return Err(sig_err(format!("wrong type: {:#x}", sig[0])));
        }
        if sig[1] as usize != sig_len - 2 {
            return Err(sig_err(format!("bad length: {} != {}", sig[1], sig_len - 2)));
        }

        let r_len = sig[3] as usize;
        let s_type_offset = 4 + r_len;
        let s_len_offset = s_type_offset + 1;

        if s_type_offset >= sig_len {
            return Err(sig_err("S type indicator missing".to_string()));
        }
        if s_len_offset >= sig_len {
            return Err(sig_err("S length missing".to_string()));
        }

        let s_offset = s_len_offset + 1;
        let s_len = sig[s_len_offset] as usize;
        if s_offset + s_len != sig_len {
            return Err(sig_err("invalid S length".to_string()));
        }

        if sig[2] != 0x02 {
            return Err(sig_err(format!("R integer marker: {:#x} != 0x02", sig[2])));
        }
        if r_len == 0 {
            return Err(sig_err("R length is zero".to_string()));
        }
        if sig[4] & 0x80 != 0 {
            return Err(sig_err("R is negative".to_string()));
        }
        if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
            return Err(sig_err("R value has too much padding".to_string()));
        }

        if sig[s_type_offset] != 0x02 {
            return Err(sig_err(format!(
                "S integer marker: {:#x} != 0x02",
                sig[s_type_offset]
            )));
        }
        if s_len == 0 {
            return Err(sig_err("S length is zero".to_string()));
        }
        if sig[s_offset] & 0x80 != 0 {
            return Err(sig_err("S is negative".to_string()));
        }
        if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
            return Err(sig_err("S value has too much padding".to_string()));
        }

        // Low-S check against N/2, big-endian byte comparison.
        let s_value = &sig[s_offset..s_offset + s_len];
        if exceeds_half_order(s_value) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::SigEncoding,
                "signature is not canonical due to unnecessarily high S value".to_string(),
            ));
        }

        Ok(())
    }
}

fn sig_err(detail: String) -> InterpreterError {
    InterpreterError::new(
        InterpreterErrorCode::SigEncoding,
        format!("malformed signature: {}", detail),
    )
}

/// Compare a variable-length big-endian S value against N/2.
fn exceeds_half_order(s: &[u8]) -> bool {
    // Strip leading zeros.
    let mut trimmed = s;
    while trimmed.len() > 1 && trimmed[0] == 0 {
        trimmed = &trimmed[1..];
    }
    if trimmed.len() > 32 {
        return true;
    }
    let mut padded = [0u8; 32];
    padded[32 - trimmed.len()..].copy_from_slice(trimmed);
    // padded > HALF_ORDER ?
    for i in 0..32 {
        if padded[i] > HALF_ORDER[i] {
            return true;
        }
        if padded[i] < HALF_ORDER[i] {
            return false;
        }
    }
    false
}
