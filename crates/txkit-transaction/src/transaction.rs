//! Core legacy transaction type.
//!
//! Represents a complete transaction with version, inputs, outputs, and
//! lock time. Supports binary and hex serialization, transaction ID
//! computation, single-spend construction, and signature attachment.

use txkit_primitives::hash::sha256d;
use txkit_primitives::util::{VarInt, WireReader, WireWriter};
use txkit_script::Script;

use crate::input::{OutPoint, TransactionInput};
use crate::output::TransactionOutput;
use crate::sighash;
use crate::TransactionError;

/// The legacy transaction format version.
pub const TX_VERSION: u32 = 1;

/// A legacy transaction consisting of a version, a set of inputs, a set
/// of outputs, and a lock time.
///
/// Inputs and outputs preserve insertion order; the order is semantically
/// significant because both the signature hash and the wire serialization
/// are order-dependent. A transaction is "unsigned" while any input's
/// unlocking script is empty, and "signed" once every input's script has
/// been attached.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Transaction format version (the legacy value, 1).
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with the legacy version and lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Construct a single-input, single-output spend skeleton.
    ///
    /// Appends one input referencing `outpoint` with an empty unlocking
    /// script and one output paying `value` satoshis to `locking_script`.
    /// The result is unsigned until a signature is attached.
    ///
    /// # Arguments
    /// * `outpoint` - The previous output being consumed.
    /// * `locking_script` - The destination locking script.
    /// * `value` - The output value in satoshis; must be >= 0. Whether it
    ///   is covered by the spent output is the node's concern at
    ///   submission time, not checked here.
    ///
    /// # Returns
    /// The unsigned transaction, or an error for a negative value.
    pub fn single_spend(
        outpoint: OutPoint,
        locking_script: Script,
        value: i64,
    ) -> Result<Self, TransactionError> {
        if value < 0 {
            return Err(TransactionError::InvalidTransaction(format!(
                "negative output value {}",
                value
            )));
        }
        let mut tx = Transaction::new();
        tx.add_input(TransactionInput::new(outpoint));
        tx.add_output(TransactionOutput::new(value, locking_script));
        Ok(tx)
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of the raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the hex
    /// is invalid or the bytes do not form a valid transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The byte slice must contain exactly one complete transaction with
    /// no trailing data.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `WireReader`.
    ///
    /// Reads the version, input count, inputs, output count, outputs,
    /// and lock time in the legacy wire format.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading input count: {}", e))
        })?;

        let mut inputs = Vec::with_capacity(input_count.value().min(1024) as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading output count: {}", e))
        })?;

        let mut outputs = Vec::with_capacity(output_count.value().min(1024) as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw wire-format bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize this transaction to a lowercase hex string.
    ///
    /// This is the canonical external representation accepted by a
    /// node's raw-transaction endpoints.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Compute the transaction ID (double SHA-256 of serialized bytes).
    ///
    /// The txid bytes are in internal (little-endian) order. For the
    /// conventional display string use `tx_id_hex()`.
    pub fn tx_id(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// Compute the transaction ID as a human-readable hex string.
    ///
    /// Byte-reversed from the internal hash, following Bitcoin's
    /// convention of displaying txids in big-endian order.
    pub fn tx_id_hex(&self) -> String {
        let mut id = self.tx_id();
        id.reverse();
        hex::encode(id)
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Append a `TransactionInput` to this transaction.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append a `TransactionOutput` to this transaction.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Return the number of inputs in the transaction.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of outputs in the transaction.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Return the size of the serialized transaction in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    // -----------------------------------------------------------------
    // Signing state
    // -----------------------------------------------------------------

    /// Attach an unlocking script to the input at `input_index`.
    ///
    /// This is the single mutation point in the signing pipeline; once
    /// every input carries its unlocking script the transaction is signed.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input to finalize.
    /// * `unlocking_script` - The unlocking script produced by a signer.
    pub fn attach_unlocking_script(
        &mut self,
        input_index: usize,
        unlocking_script: Script,
    ) -> Result<(), TransactionError> {
        let input = self.inputs.get_mut(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input index {} out of range",
                input_index
            ))
        })?;
        input.unlocking_script = Some(unlocking_script);
        Ok(())
    }

    /// Whether every input carries a non-empty unlocking script.
    pub fn is_signed(&self) -> bool {
        !self.inputs.is_empty()
            && self.inputs.iter().all(|i| {
                i.unlocking_script
                    .as_ref()
                    .map(|s| !s.is_empty())
                    .unwrap_or(false)
            })
    }

    // -----------------------------------------------------------------
    // Signature hash
    // -----------------------------------------------------------------

    /// Compute the legacy signature hash for a given input.
    ///
    /// Looks up the source output's locking script from the input's
    /// stored source info, then delegates to `sighash::signature_hash`.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input being signed.
    /// * `sighash_type` - The sighash flags (e.g. `SIGHASH_ALL`).
    ///
    /// # Returns
    /// A 32-byte double-SHA256 digest to be signed by ECDSA.
    pub fn calc_input_signature_hash(
        &self,
        input_index: usize,
        sighash_type: u32,
    ) -> Result<[u8; 32], TransactionError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                self.inputs.len()
            ))
        })?;

        let source_output = input.source_tx_output().ok_or_else(|| {
            TransactionError::SigningError(
                "missing source output on input (no previous tx info)".to_string(),
            )
        })?;

        let script_bytes = source_output.locking_script.to_bytes().to_vec();
        sighash::signature_hash(self, input_index, &script_bytes, sighash_type)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
