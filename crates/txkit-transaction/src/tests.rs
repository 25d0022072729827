//! Tests for the txkit-transaction crate.
//!
//! Covers transaction parsing and serialization roundtrips, single-spend
//! construction, legacy sighash behavior, and the full build → sign →
//! attach → verify pipeline including signature-binding mutations.

use txkit_primitives::ec::PrivateKey;
use txkit_script::{Address, Network, Script};

use crate::input::OutPoint;
use crate::output::TransactionOutput;
use crate::sighash;
use crate::template::p2pkh;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::{Transaction, TX_VERSION};
use crate::verify::verify_input;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Shared fixtures
// -----------------------------------------------------------------------

/// The previous outpoint, destination, and value exercised by the
/// end-to-end scenario.
const PREV_TXID: &str = "4eb8629ffb3bdf1035951d6df78fdb0bf5770a1b6b5744995ad593a52b8c2dc3";
const DEST_ADDRESS: &str = "mrm6soHe9svDVh7YzjtSY26PbGXSBp8eDA";
const SPEND_VALUE: i64 = 4_500_000;
const PREV_VALUE: i64 = 5_000_000;

/// A raw legacy transaction (1 input, 2 outputs, version 1).
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";

/// A raw multi-input transaction (3 inputs, 2 outputs, version 2).
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";

/// A fixed test private key.
fn test_key() -> PrivateKey {
    PrivateKey::from_hex("1111111111111111111111111111111111111111111111111111111111111111")
        .expect("valid scalar")
}

/// A second, different test private key.
fn other_key() -> PrivateKey {
    PrivateKey::from_hex("2222222222222222222222222222222222222222222222222222222222222222")
        .expect("valid scalar")
}

/// The P2PKH locking script of the previous output, paying to `key`.
fn prev_lock_for(key: &PrivateKey) -> Script {
    let addr = Address::from_public_key(&key.pub_key(), key.is_compressed(), Network::Testnet);
    p2pkh::lock(&addr)
}

/// Build, sign, and attach: the full pipeline up to verification.
fn build_signed_spend(key: &PrivateKey, prev_script: &Script) -> Transaction {
    let outpoint = OutPoint::from_hex(PREV_TXID, 0).expect("valid outpoint");
    let destination =
        p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).expect("valid destination");

    let mut tx =
        Transaction::single_spend(outpoint, destination, SPEND_VALUE).expect("valid value");
    tx.inputs[0].set_source_output(Some(TransactionOutput::new(
        PREV_VALUE,
        prev_script.clone(),
    )));

    let unlocker = p2pkh::unlock(key.clone(), None);
    let unlocking_script = unlocker.sign(&tx, 0).expect("signing should succeed");
    tx.attach_unlocking_script(0, unlocking_script)
        .expect("input exists");
    tx
}

// -----------------------------------------------------------------------
// Parsing and serialization
// -----------------------------------------------------------------------

#[test]
fn test_from_hex_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx hex");

    assert_eq!(tx.version, 1);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 0);

    assert_eq!(tx.to_hex(), SOURCE_RAW_TX);
}

#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse multi-input tx");

    assert_eq!(tx.version, 2);
    assert_eq!(tx.input_count(), 3);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 103);

    assert_eq!(tx.to_hex(), MULTI_INPUT_TX_HEX);
}

#[test]
fn test_from_bytes_roundtrip() {
    let original_bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    let tx = Transaction::from_bytes(&original_bytes).expect("should parse from bytes");
    assert_eq!(tx.to_bytes(), original_bytes);
}

#[test]
fn test_trailing_bytes_error() {
    let extended_hex = format!("{}deadbeef", SOURCE_RAW_TX);
    assert!(Transaction::from_hex(&extended_hex).is_err());
}

#[test]
fn test_invalid_hex_error() {
    assert!(Transaction::from_hex("not_valid_hex").is_err());
}

#[test]
fn test_empty_bytes_error() {
    assert!(Transaction::from_bytes(&[]).is_err());
}

#[test]
fn test_tx_id() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse tx");

    let txid_hex = tx.tx_id_hex();
    assert_eq!(txid_hex.len(), 64);

    let mut reversed = tx.tx_id();
    reversed.reverse();
    assert_eq!(hex::encode(reversed), txid_hex);
}

// -----------------------------------------------------------------------
// Single-spend construction
// -----------------------------------------------------------------------

#[test]
fn test_single_spend_skeleton() {
    let outpoint = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let tx = Transaction::single_spend(outpoint, destination, SPEND_VALUE).unwrap();

    assert_eq!(tx.version, TX_VERSION);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 1);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(tx.outputs[0].value, SPEND_VALUE);
    assert!(tx.inputs[0].unlocking_script.is_none());
    assert!(!tx.is_signed());

    // The outpoint txid round-trips through display order.
    assert_eq!(tx.inputs[0].outpoint.txid.to_string(), PREV_TXID);
    assert_eq!(tx.inputs[0].outpoint.vout, 0);
}

#[test]
fn test_single_spend_rejects_negative_value() {
    let outpoint = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let result = Transaction::single_spend(outpoint, destination, -1);
    assert!(matches!(
        result,
        Err(TransactionError::InvalidTransaction(_))
    ));
}

#[test]
fn test_attach_unlocking_script_out_of_range() {
    let mut tx = Transaction::new();
    let result = tx.attach_unlocking_script(0, Script::new());
    assert!(matches!(
        result,
        Err(TransactionError::InvalidTransaction(_))
    ));
}

// -----------------------------------------------------------------------
// Signature hash
// -----------------------------------------------------------------------

#[test]
fn test_sighash_is_pure() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let tx = build_signed_spend(&key, &prev_script);

    let a = sighash::signature_hash(&tx, 0, prev_script.to_bytes(), sighash::SIGHASH_ALL).unwrap();
    let b = sighash::signature_hash(&tx, 0, prev_script.to_bytes(), sighash::SIGHASH_ALL).unwrap();
    assert_eq!(a, b, "identical inputs must produce identical digests");
}

#[test]
fn test_sighash_type_changes_digest() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let tx = build_signed_spend(&key, &prev_script);

    let all = sighash::signature_hash(&tx, 0, prev_script.to_bytes(), sighash::SIGHASH_ALL).unwrap();
    let none =
        sighash::signature_hash(&tx, 0, prev_script.to_bytes(), sighash::SIGHASH_NONE).unwrap();
    let anyone = sighash::signature_hash(
        &tx,
        0,
        prev_script.to_bytes(),
        sighash::SIGHASH_ALL | sighash::SIGHASH_ANYONECANPAY,
    )
    .unwrap();

    assert_ne!(all, none);
    assert_ne!(all, anyone);
    assert_ne!(none, anyone);
}

#[test]
fn test_sighash_excludes_unlocking_script() {
    // The digest covers the modified serialization, so it must be the
    // same before and after the unlocking script is attached.
    let key = test_key();
    let prev_script = prev_lock_for(&key);

    let outpoint = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let mut tx = Transaction::single_spend(outpoint, destination, SPEND_VALUE).unwrap();

    let before =
        sighash::signature_hash(&tx, 0, prev_script.to_bytes(), sighash::SIGHASH_ALL).unwrap();

    tx.attach_unlocking_script(0, Script::from_bytes(&[0x01, 0xAB])).unwrap();
    let after =
        sighash::signature_hash(&tx, 0, prev_script.to_bytes(), sighash::SIGHASH_ALL).unwrap();

    assert_eq!(before, after);
}

#[test]
fn test_sighash_single_out_of_range_is_one_digest() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);

    // Two inputs but only one output: SIGHASH_SINGLE on input 1 has no
    // matching output.
    let outpoint0 = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let outpoint1 = OutPoint::from_hex(PREV_TXID, 1).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let mut tx = Transaction::single_spend(outpoint0, destination, SPEND_VALUE).unwrap();
    tx.add_input(crate::input::TransactionInput::new(outpoint1));

    let digest =
        sighash::signature_hash(&tx, 1, prev_script.to_bytes(), sighash::SIGHASH_SINGLE).unwrap();
    let mut expected = [0u8; 32];
    expected[0] = 0x01;
    assert_eq!(digest, expected);
}

#[test]
fn test_sighash_input_index_out_of_range() {
    let tx = Transaction::new();
    let result = sighash::signature_hash(&tx, 0, &[], sighash::SIGHASH_ALL);
    assert!(result.is_err());
}

#[test]
fn test_calc_input_signature_hash_requires_source_output() {
    let outpoint = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let tx = Transaction::single_spend(outpoint, destination, SPEND_VALUE).unwrap();

    let result = tx.calc_input_signature_hash(0, sighash::SIGHASH_ALL);
    assert!(matches!(result, Err(TransactionError::SigningError(_))));
}

// -----------------------------------------------------------------------
// End-to-end: build, sign, verify
// -----------------------------------------------------------------------

#[test]
fn test_sign_then_verify() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let tx = build_signed_spend(&key, &prev_script);

    assert!(tx.is_signed());
    assert!(verify_input(&tx, 0, &prev_script).expect("no parse error"));

    // The wire serialization is non-empty hex whose first 4 bytes decode
    // to the configured transaction version.
    let raw = tx.to_bytes();
    assert!(!raw.is_empty());
    let version = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    assert_eq!(version, TX_VERSION);

    // And the serialization round-trips.
    let reparsed = Transaction::from_hex(&tx.to_hex()).unwrap();
    assert_eq!(reparsed.to_hex(), tx.to_hex());
}

#[test]
fn test_sign_with_uncompressed_key() {
    let mut key = test_key();
    key.set_compressed(false);
    let prev_script = prev_lock_for(&key);
    let tx = build_signed_spend(&key, &prev_script);
    assert!(verify_input(&tx, 0, &prev_script).expect("no parse error"));
}

#[test]
fn test_wrong_key_fails_verification() {
    // The previous output pays to test_key, but other_key signs.
    let prev_script = prev_lock_for(&test_key());
    let tx = build_signed_spend(&other_key(), &prev_script);

    assert!(!verify_input(&tx, 0, &prev_script).expect("no parse error"));
}

#[test]
fn test_mutated_value_fails_verification() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let mut tx = build_signed_spend(&key, &prev_script);

    tx.outputs[0].value += 1;
    assert!(!verify_input(&tx, 0, &prev_script).expect("no parse error"));
}

#[test]
fn test_mutated_outpoint_fails_verification() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let mut tx = build_signed_spend(&key, &prev_script);

    tx.inputs[0].outpoint.vout = 1;
    assert!(!verify_input(&tx, 0, &prev_script).expect("no parse error"));
}

#[test]
fn test_mutated_destination_fails_verification() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let mut tx = build_signed_spend(&key, &prev_script);

    // Flip one byte of the destination's public key hash.
    let mut script_bytes = tx.outputs[0].locking_script.to_bytes().to_vec();
    script_bytes[5] ^= 0x01;
    tx.outputs[0].locking_script = Script::from_bytes(&script_bytes);

    assert!(!verify_input(&tx, 0, &prev_script).expect("no parse error"));
}

#[test]
fn test_unsigned_input_fails_verification() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);

    let outpoint = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let tx = Transaction::single_spend(outpoint, destination, SPEND_VALUE).unwrap();

    assert!(!verify_input(&tx, 0, &prev_script).expect("no parse error"));
}

#[test]
fn test_malformed_unlocking_script_is_parse_error() {
    let key = test_key();
    let prev_script = prev_lock_for(&key);
    let mut tx = build_signed_spend(&key, &prev_script);

    // A push that claims more bytes than the script holds.
    tx.inputs[0].unlocking_script = Some(Script::from_bytes(&[0x05, 0x00]));

    let result = verify_input(&tx, 0, &prev_script);
    assert!(matches!(result, Err(TransactionError::ScriptParse(_))));
}

#[test]
fn test_verify_input_out_of_range() {
    let tx = Transaction::new();
    let result = verify_input(&tx, 0, &Script::new());
    assert!(matches!(
        result,
        Err(TransactionError::InvalidTransaction(_))
    ));
}

#[test]
fn test_signing_without_source_output_fails() {
    let key = test_key();
    let outpoint = OutPoint::from_hex(PREV_TXID, 0).unwrap();
    let destination = p2pkh::lock_to_address(DEST_ADDRESS, Network::Testnet).unwrap();
    let tx = Transaction::single_spend(outpoint, destination, SPEND_VALUE).unwrap();

    let unlocker = p2pkh::unlock(key, None);
    let result = unlocker.sign(&tx, 0);
    assert!(matches!(result, Err(TransactionError::SigningError(_))));
}
