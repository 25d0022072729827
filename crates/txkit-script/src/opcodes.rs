//! Opcode constants for the legacy P2PKH script universe.
//!
//! Only the opcodes reachable from standard P2PKH spends (push data,
//! duplication, hashing, equality, signature checking) plus a handful of
//! structural opcodes are defined here.

/// Push an empty byte array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;
/// Push the next 1 byte of data.
pub const OP_DATA_1: u8 = 0x01;
/// Push the next 20 bytes of data (public key hash).
pub const OP_DATA_20: u8 = 0x14;
/// Push the next 32 bytes of data.
pub const OP_DATA_32: u8 = 0x20;
/// Push the next 33 bytes of data (compressed public key).
pub const OP_DATA_33: u8 = 0x21;
/// Push the next 65 bytes of data (uncompressed public key).
pub const OP_DATA_65: u8 = 0x41;
/// Push the next 75 bytes of data (largest direct push).
pub const OP_DATA_75: u8 = 0x4b;
/// The next byte is the number of bytes to push.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (LE) are the number of bytes to push.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (LE) are the number of bytes to push.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1 onto the stack.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1 onto the stack.
pub const OP_1: u8 = 0x51;
/// Alias for OP_1.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 16 onto the stack.
pub const OP_16: u8 = 0x60;

/// Do nothing.
pub const OP_NOP: u8 = 0x61;
/// Fail unless the top stack value is truthy; consumes it.
pub const OP_VERIFY: u8 = 0x69;
/// Mark the output as unspendable; terminates execution.
pub const OP_RETURN: u8 = 0x6a;

/// Remove the top stack item.
pub const OP_DROP: u8 = 0x75;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;

/// Pop two items and push whether they are byte-equal.
pub const OP_EQUAL: u8 = 0x87;
/// OP_EQUAL followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;

/// Replace the top item with its SHA-256 hash.
pub const OP_SHA256: u8 = 0xa8;
/// Replace the top item with its Hash160 (RIPEMD160 of SHA-256).
pub const OP_HASH160: u8 = 0xa9;
/// Replace the top item with its double SHA-256 hash.
pub const OP_HASH256: u8 = 0xaa;
/// Marks the start of the signed subscript.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Verify an ECDSA signature against the transaction's signature hash.
pub const OP_CHECKSIG: u8 = 0xac;
/// OP_CHECKSIG followed by OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;

/// Return the canonical name of an opcode.
///
/// Data pushes in the 1-75 byte range report as `OP_DATA_<n>`; any byte
/// outside the defined universe reports as `OP_UNKNOWN_<hex>`.
pub fn opcode_to_string(op: u8) -> String {
    match op {
        OP_0 => "OP_0".to_string(),
        OP_PUSHDATA1 => "OP_PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "OP_PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "OP_PUSHDATA4".to_string(),
        OP_1NEGATE => "OP_1NEGATE".to_string(),
        OP_NOP => "OP_NOP".to_string(),
        OP_VERIFY => "OP_VERIFY".to_string(),
        OP_RETURN => "OP_RETURN".to_string(),
        OP_DROP => "OP_DROP".to_string(),
        OP_DUP => "OP_DUP".to_string(),
        OP_EQUAL => "OP_EQUAL".to_string(),
        OP_EQUALVERIFY => "OP_EQUALVERIFY".to_string(),
        OP_SHA256 => "OP_SHA256".to_string(),
        OP_HASH160 => "OP_HASH160".to_string(),
        OP_HASH256 => "OP_HASH256".to_string(),
        OP_CODESEPARATOR => "OP_CODESEPARATOR".to_string(),
        OP_CHECKSIG => "OP_CHECKSIG".to_string(),
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY".to_string(),
        op if (OP_1..=OP_16).contains(&op) => format!("OP_{}", op - OP_1 + 1),
        op if (OP_DATA_1..=OP_DATA_75).contains(&op) => format!("OP_DATA_{}", op),
        op => format!("OP_UNKNOWN_{:#04x}", op),
    }
}

/// Look up an opcode byte by its canonical name.
///
/// Returns `None` for data-push names and unknown strings; those are
/// handled by the ASM parser as hex pushes.
pub fn string_to_opcode(name: &str) -> Option<u8> {
    match name {
        "OP_0" | "OP_FALSE" => Some(OP_0),
        "OP_1NEGATE" => Some(OP_1NEGATE),
        "OP_1" | "OP_TRUE" => Some(OP_1),
        "OP_NOP" => Some(OP_NOP),
        "OP_VERIFY" => Some(OP_VERIFY),
        "OP_RETURN" => Some(OP_RETURN),
        "OP_DROP" => Some(OP_DROP),
        "OP_DUP" => Some(OP_DUP),
        "OP_EQUAL" => Some(OP_EQUAL),
        "OP_EQUALVERIFY" => Some(OP_EQUALVERIFY),
        "OP_SHA256" => Some(OP_SHA256),
        "OP_HASH160" => Some(OP_HASH160),
        "OP_HASH256" => Some(OP_HASH256),
        "OP_CODESEPARATOR" => Some(OP_CODESEPARATOR),
        "OP_CHECKSIG" => Some(OP_CHECKSIG),
        "OP_CHECKSIGVERIFY" => Some(OP_CHECKSIGVERIFY),
        _ => {
            // OP_2 .. OP_16 small-int pushes.
            if let Some(num) = name.strip_prefix("OP_") {
                if let Ok(n) = num.parse::<u8>() {
                    if (2..=16).contains(&n) {
                        return Some(OP_1 + n - 1);
                    }
                }
            }
            None
        }
    }
}
