//! Legacy (pre-segwit) signature hash computation.
//!
//! The digest signed by ECDSA is the double SHA-256 of a modified
//! serialization of the transaction: every input's unlocking script is
//! emptied, the signed input's script slot carries the previous output's
//! locking script instead, and the 4-byte sighash type is appended. This
//! binds the signature to the exact transaction shape and the specific
//! previous output being spent, preventing reuse across transactions.

use txkit_primitives::hash::sha256d;
use txkit_primitives::util::{VarInt, WireWriter};

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing
/// other inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// Compute the legacy signature hash for a given input.
///
/// A pure function of its arguments: identical inputs always produce the
/// identical digest, and changing `sighash_type` alone changes it.
///
/// # Arguments
/// * `tx`                 - The transaction being signed.
/// * `input_index`        - Index of the input being signed.
/// * `prev_output_script` - The locking script of the output being spent.
/// * `sighash_type`       - The sighash flags (e.g. `SIGHASH_ALL`).
///
/// # Returns
/// A 32-byte double-SHA256 digest to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    // Consensus quirk: SIGHASH_SINGLE with no matching output hashes to
    // the "one" digest instead of a real serialization.
    let base_type = sighash_type & SIGHASH_MASK;
    if base_type == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        let mut one = [0u8; 32];
        one[0] = 0x01;
        return Ok(one);
    }

    let preimage = calc_preimage(tx, input_index, prev_output_script, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Compute the pre-image bytes for the legacy sighash before double-hashing.
///
/// The preimage is a modified wire serialization of the transaction:
/// 1. nVersion (4 bytes LE)
/// 2. input count (VarInt) and inputs: the signed input carries
///    `prev_output_script` in its script slot, all others an empty
///    script; with ANYONECANPAY only the signed input is serialized
/// 3. output count (VarInt) and outputs: all for ALL, none for NONE,
///    truncated to the signed index (with earlier outputs blanked) for
///    SINGLE
/// 4. nLocktime (4 bytes LE)
/// 5. sighashType (4 bytes LE)
///
/// # Returns
/// The raw preimage bytes (not yet hashed).
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    prev_output_script: &[u8],
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let mut writer = WireWriter::with_capacity(256);

    // Version.
    writer.write_u32_le(tx.version);

    // Inputs.
    if anyone_can_pay {
        writer.write_varint(VarInt::from(1u64));
        write_input(&mut writer, tx, input_index, input_index, prev_output_script, base_type);
    } else {
        writer.write_varint(VarInt::from(tx.inputs.len()));
        for i in 0..tx.inputs.len() {
            write_input(&mut writer, tx, i, input_index, prev_output_script, base_type);
        }
    }

    // Outputs.
    match base_type {
        SIGHASH_NONE => {
            writer.write_varint(VarInt::from(0u64));
        }
        SIGHASH_SINGLE => {
            if input_index >= tx.outputs.len() {
                return Err(TransactionError::InvalidTransaction(format!(
                    "SIGHASH_SINGLE input index {} has no matching output",
                    input_index
                )));
            }
            // Outputs up to and including the signed index; earlier
            // outputs are blanked (value -1, empty script).
            writer.write_varint(VarInt::from(input_index + 1));
            for _ in 0..input_index {
                writer.write_i64_le(-1);
                writer.write_varint(VarInt::from(0u64));
            }
            let output = &tx.outputs[input_index];
            writer.write_i64_le(output.value);
            let script_bytes = output.locking_script.to_bytes();
            writer.write_varint(VarInt::from(script_bytes.len()));
            writer.write_bytes(script_bytes);
        }
        _ => {
            writer.write_varint(VarInt::from(tx.outputs.len()));
            for output in &tx.outputs {
                writer.write_i64_le(output.value);
                let script_bytes = output.locking_script.to_bytes();
                writer.write_varint(VarInt::from(script_bytes.len()));
                writer.write_bytes(script_bytes);
            }
        }
    }

    // Locktime.
    writer.write_u32_le(tx.lock_time);

    // Sighash type.
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}

/// Serialize one input into the sighash preimage.
///
/// The input at `signed_index` carries the previous output's locking
/// script; every other input carries an empty script, and its sequence
/// number is zeroed under NONE/SINGLE so other signers can update it.
fn write_input(
    writer: &mut WireWriter,
    tx: &Transaction,
    i: usize,
    signed_index: usize,
    prev_output_script: &[u8],
    base_type: u32,
) {
    let input = &tx.inputs[i];
    writer.write_bytes(input.outpoint.txid.as_bytes());
    writer.write_u32_le(input.outpoint.vout);

    if i == signed_index {
        writer.write_varint(VarInt::from(prev_output_script.len()));
        writer.write_bytes(prev_output_script);
        writer.write_u32_le(input.sequence_number);
    } else {
        writer.write_varint(VarInt::from(0u64));
        let sequence = if base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE {
            0
        } else {
            input.sequence_number
        };
        writer.write_u32_le(sequence);
    }
}
