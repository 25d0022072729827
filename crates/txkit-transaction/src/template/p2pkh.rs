//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Creates standard P2PKH locking scripts (`OP_DUP OP_HASH160 <hash>
//! OP_EQUALVERIFY OP_CHECKSIG`) and unlocking scripts (`<sig> <pubkey>`).

use txkit_primitives::ec::PrivateKey;
use txkit_script::opcodes::*;
use txkit_script::{Address, Network, Script};

use crate::sighash::SIGHASH_ALL;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH locking script from a Bitcoin address.
///
/// Produces: `OP_DUP OP_HASH160 <20-byte pubkey hash> OP_EQUALVERIFY OP_CHECKSIG`
///
/// # Arguments
/// * `address` - The address whose public key hash to lock to.
///
/// # Returns
/// The 25-byte P2PKH locking script.
pub fn lock(address: &Address) -> Script {
    let pkh = &address.public_key_hash;

    let mut bytes = Vec::with_capacity(25);
    bytes.push(OP_DUP);
    bytes.push(OP_HASH160);
    bytes.push(OP_DATA_20);
    bytes.extend_from_slice(pkh);
    bytes.push(OP_EQUALVERIFY);
    bytes.push(OP_CHECKSIG);

    Script::from_bytes(&bytes)
}

/// Resolve a human-readable address into its canonical locking script.
///
/// Decodes the Base58Check string, verifies the embedded checksum, and
/// verifies the version byte matches the expected network before
/// producing the P2PKH template.
///
/// # Arguments
/// * `address` - The Base58Check address string.
/// * `network` - The network the address must belong to.
///
/// # Returns
/// The locking script, `ChecksumMismatch` for a tampered address, or
/// `UnsupportedAddress` for a wrong-network or unknown-prefix address.
pub fn lock_to_address(address: &str, network: Network) -> Result<Script, TransactionError> {
    let addr = Address::from_string_for_network(address, network)?;
    Ok(lock(&addr))
}

/// Create a P2PKH unlocker for signing transaction inputs.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `sighash_flag` - Optional sighash flag. Defaults to `SIGHASH_ALL` (0x01).
///
/// # Returns
/// A `P2pkhUnlocker` implementing `UnlockingScriptTemplate`.
pub fn unlock(private_key: PrivateKey, sighash_flag: Option<u32>) -> P2pkhUnlocker {
    P2pkhUnlocker {
        private_key,
        sighash_flag: sighash_flag.unwrap_or(SIGHASH_ALL),
    }
}

/// P2PKH signing template holding a private key and sighash flag.
///
/// Implements `UnlockingScriptTemplate` to produce unlocking scripts of
/// the form `<DER_signature || sighash_byte> <pubkey>`, with the public
/// key serialized per the key's compressed-encoding flag.
pub struct P2pkhUnlocker {
    /// The private key used for ECDSA signing.
    private_key: PrivateKey,

    /// The sighash flag to use (e.g. `SIGHASH_ALL`).
    sighash_flag: u32,
}

impl UnlockingScriptTemplate for P2pkhUnlocker {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// Computes the legacy signature hash for the input, signs it with
    /// RFC6979 deterministic ECDSA, and constructs the unlocking script:
    /// `<DER_sig || sighash_byte> <pubkey>`.
    fn sign(&self, tx: &Transaction, input_index: u32) -> Result<Script, TransactionError> {
        let idx = input_index as usize;

        if idx >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                idx,
                tx.inputs.len()
            )));
        }

        if tx.inputs[idx].source_tx_output().is_none() {
            return Err(TransactionError::SigningError(
                "missing source output on input (no previous tx info)".to_string(),
            ));
        }

        // Compute the signature hash.
        let sig_hash = tx.calc_input_signature_hash(idx, self.sighash_flag)?;

        // Sign the hash (RFC6979 deterministic ECDSA, low-S).
        let signature = self
            .private_key
            .sign(&sig_hash)
            .map_err(|e| TransactionError::SigningError(e.to_string()))?;

        // Serialize the public key per the key's compression flag.
        let pub_key_bytes = self
            .private_key
            .pub_key()
            .serialize(self.private_key.is_compressed());

        // Build the DER signature with the sighash flag byte appended.
        let der_sig = signature.to_der();
        let mut sig_buf = Vec::with_capacity(der_sig.len() + 1);
        sig_buf.extend_from_slice(&der_sig);
        sig_buf.push(self.sighash_flag as u8);

        // Build the unlocking script: PUSHDATA(sig) PUSHDATA(pubkey).
        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key_bytes)?;

        Ok(script)
    }
}
