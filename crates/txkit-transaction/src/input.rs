//! Transaction input referencing a previous output.
//!
//! Contains the outpoint of the spent output, the unlocking script, the
//! sequence number, and an optional back-reference to the source output
//! used during signing. Provides binary serialization following the
//! legacy Bitcoin wire format.

use std::fmt;

use txkit_primitives::chainhash::Hash;
use txkit_primitives::util::{VarInt, WireReader, WireWriter};
use txkit_script::Script;

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A reference to a specific output of a previous transaction.
///
/// The hash is stored in internal (little-endian) byte order, reversed
/// relative to the human-readable hex display. Immutable once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutPoint {
    /// The transaction ID of the output being spent.
    pub txid: Hash,
    /// Index of the output within that transaction.
    pub vout: u32,
}

impl OutPoint {
    /// Create an outpoint from a txid and output index.
    pub fn new(txid: Hash, vout: u32) -> Self {
        OutPoint { txid, vout }
    }

    /// Create an outpoint from a display-order hex txid and output index.
    ///
    /// # Arguments
    /// * `txid_hex` - The transaction ID as displayed (byte-reversed hex).
    /// * `vout` - The output index being spent.
    pub fn from_hex(txid_hex: &str, vout: u32) -> Result<Self, TransactionError> {
        let txid = Hash::from_hex(txid_hex)?;
        Ok(OutPoint { txid, vout })
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// A single input in a legacy transaction.
///
/// Each input references an output from a previous transaction by its
/// `outpoint`. The `unlocking_script` (scriptSig) supplies the data
/// required to satisfy the referenced output's locking script; it is
/// `None` until the input is signed.
///
/// # Wire format
///
/// | Field              | Size             |
/// |--------------------|------------------|
/// | previous txid      | 32 bytes (LE)    |
/// | previous index     | 4 bytes (LE)     |
/// | script length      | VarInt           |
/// | unlocking_script   | variable         |
/// | sequence_number    | 4 bytes (LE)     |
#[derive(Clone, Debug)]
pub struct TransactionInput {
    /// The previous output being spent.
    pub outpoint: OutPoint,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized, no
    /// relative lock-time).
    pub sequence_number: u32,

    /// The unlocking script (scriptSig) that proves authorization.
    /// `None` while the input has not yet been signed.
    pub unlocking_script: Option<Script>,

    /// Optional direct reference to the source output being spent,
    /// carrying its value and locking script for sighash computation
    /// during signing. Not serialized.
    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create a new unsigned input spending the given outpoint.
    pub fn new(outpoint: OutPoint) -> Self {
        TransactionInput {
            outpoint,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: None,
            source_output: None,
        }
    }

    /// Deserialize a `TransactionInput` from a `WireReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `TransactionError` if the
    /// data is truncated.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::SerializationError(format!("reading previous txid: {}", e))
        })?;
        let txid = Hash::from_bytes(txid_bytes)?;

        let vout = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        let unlocking_script = if script_bytes.is_empty() {
            None
        } else {
            Some(Script::from_bytes(script_bytes))
        };

        Ok(TransactionInput {
            outpoint: OutPoint::new(txid, vout),
            sequence_number,
            unlocking_script,
            source_output: None,
        })
    }

    /// Serialize this `TransactionInput` into a `WireWriter`.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_bytes(self.outpoint.txid.as_bytes());
        writer.write_u32_le(self.outpoint.vout);

        match &self.unlocking_script {
            Some(script) => {
                let script_bytes = script.to_bytes();
                writer.write_varint(VarInt::from(script_bytes.len()));
                writer.write_bytes(script_bytes);
            }
            None => {
                writer.write_varint(VarInt::from(0u64));
            }
        }

        writer.write_u32_le(self.sequence_number);
    }

    /// Set a direct source output on this input.
    ///
    /// This provides the value and locking script of the output being
    /// spent, which the signer needs for sighash computation.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// Look up the source transaction output, if available.
    pub fn source_tx_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    /// Return the locking script of the source output, if available.
    pub fn source_tx_script(&self) -> Option<&Script> {
        self.source_tx_output().map(|o| &o.locking_script)
    }

    /// Return the value of the source output in satoshis, if available.
    pub fn source_tx_value(&self) -> Option<i64> {
        self.source_tx_output().map(|o| o.value)
    }
}
