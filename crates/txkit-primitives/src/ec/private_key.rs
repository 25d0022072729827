//! secp256k1 private key with Bitcoin-specific functionality.
//!
//! Wraps a k256 signing key and adds WIF and raw-Base58 decoding, the
//! compressed-encoding flag, and the network tag recovered from WIF.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::sha256d;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Mainnet WIF prefix byte.
const MAINNET_PREFIX: u8 = 0x80;

/// Testnet WIF prefix byte.
const TESTNET_PREFIX: u8 = 0xef;

/// Compression flag byte appended to WIF for compressed public keys.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key for transaction signing.
///
/// Wraps a k256 `SigningKey` and carries the public-key serialization
/// flag (compressed vs uncompressed) and the network tag. Both are
/// recovered from WIF when decoding; raw-byte constructors default to
/// compressed/mainnet.
#[derive(Clone, Debug)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
    /// Whether the derived public key serializes in compressed form.
    compressed: bool,
    /// Whether the key is tagged for mainnet (false = testnet).
    mainnet: bool,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        PrivateKey {
            inner: signing_key,
            compressed: true,
            mainnet: true,
        }
    }

    /// Create a private key from a raw 32-byte scalar.
    ///
    /// Defaults to compressed public key serialization and mainnet.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid scalar on secp256k1,
    /// `ScalarOutOfRange` if the scalar is zero or not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyEncoding(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_bytes(k256::FieldBytes::from_slice(bytes))
            .map_err(|_| PrimitivesError::ScalarOutOfRange)?;
        Ok(PrivateKey {
            inner: signing_key,
            compressed: true,
            mainnet: true,
        })
    }

    /// Create a private key from a hexadecimal string.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-character hex string representing the 32-byte scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidKeyEncoding(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str).map_err(|e| PrimitivesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Create a private key from raw Base58-encoded key material.
    ///
    /// This is plain Base58 of the 32 scalar bytes with no version byte
    /// and no checksum. Defaults to compressed/mainnet; callers supply
    /// the target network separately when resolving addresses.
    ///
    /// # Arguments
    /// * `encoded` - The Base58 string of the raw 32-byte scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, `InvalidKeyEncoding` for bad characters or a
    /// payload that is not 32 bytes, `ScalarOutOfRange` for an invalid scalar.
    pub fn from_base58(encoded: &str) -> Result<Self, PrimitivesError> {
        let decoded = base58::decode(encoded)
            .map_err(|e| PrimitivesError::InvalidKeyEncoding(e.to_string()))?;
        if decoded.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyEncoding(format!(
                "raw base58 key decodes to {} bytes, want {}",
                decoded.len(),
                PRIVATE_KEY_BYTES_LEN
            )));
        }
        Self::from_bytes(&decoded)
    }

    /// Create a private key from a WIF (Wallet Import Format) string.
    ///
    /// Decodes the Base58Check-encoded string, validates the checksum,
    /// and recovers the network tag and compression flag along with the
    /// 32-byte scalar.
    ///
    /// # Arguments
    /// * `wif` - A Base58Check-encoded WIF string (compressed or uncompressed).
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, `ChecksumMismatch` if the checksum
    /// fails, `InvalidKeyEncoding` for any other malformation.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let decoded = base58::decode(wif)
            .map_err(|e| PrimitivesError::InvalidKeyEncoding(e.to_string()))?;
        let decoded_len = decoded.len();

        // Determine if compressed based on length:
        // 1 byte prefix + 32 bytes key + 1 byte compress flag + 4 byte checksum = 38
        // 1 byte prefix + 32 bytes key + 4 byte checksum = 37
        let is_compressed = match decoded_len {
            38 => {
                if decoded[33] != COMPRESS_MAGIC {
                    return Err(PrimitivesError::InvalidKeyEncoding(
                        "malformed WIF: invalid compression flag".to_string(),
                    ));
                }
                true
            }
            37 => false,
            _ => {
                return Err(PrimitivesError::InvalidKeyEncoding(format!(
                    "malformed WIF: invalid length {}",
                    decoded_len
                )));
            }
        };

        // Verify checksum: first 4 bytes of sha256d of the payload.
        let payload_end = decoded_len - 4;
        let checksum = sha256d(&decoded[..payload_end]);
        if checksum[..4] != decoded[payload_end..] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        let mainnet = match decoded[0] {
            MAINNET_PREFIX => true,
            TESTNET_PREFIX => false,
            other => {
                return Err(PrimitivesError::InvalidKeyEncoding(format!(
                    "unknown WIF network prefix 0x{:02x}",
                    other
                )));
            }
        };

        let key_bytes = &decoded[1..1 + PRIVATE_KEY_BYTES_LEN];
        let mut key = Self::from_bytes(key_bytes)?;
        key.compressed = is_compressed;
        key.mainnet = mainnet;
        Ok(key)
    }

    /// Encode the private key as a WIF string.
    ///
    /// Uses the key's own network tag and compression flag.
    ///
    /// # Returns
    /// A Base58Check-encoded WIF string.
    pub fn to_wif(&self) -> String {
        let prefix = if self.mainnet {
            MAINNET_PREFIX
        } else {
            TESTNET_PREFIX
        };
        let key_bytes = self.to_bytes();
        let mut payload = Vec::with_capacity(1 + PRIVATE_KEY_BYTES_LEN + 1);
        payload.push(prefix);
        payload.extend_from_slice(&key_bytes);
        if self.compressed {
            payload.push(COMPRESS_MAGIC);
        }
        base58::check_encode(&payload)
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the private key as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Whether the derived public key serializes in compressed form.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Whether the key carries the mainnet WIF tag.
    pub fn is_mainnet(&self) -> bool {
        self.mainnet
    }

    /// Override the compression flag.
    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
    }

    /// Override the network tag.
    pub fn set_mainnet(&mut self, mainnet: bool) {
        self.mainnet = mainnet;
    }

    /// Derive the corresponding public key for this private key.
    ///
    /// Deterministic scalar multiplication against the secp256k1 base
    /// point; a pure function of the key material.
    pub fn pub_key(&self) -> PublicKey {
        let verifying_key = self.inner.verifying_key();
        PublicKey::from_k256_verifying_key(verifying_key)
    }

    /// Sign a 32-byte message hash using deterministic RFC6979 nonces.
    ///
    /// Produces a low-S normalized signature per BIP-0062.
    ///
    /// # Arguments
    /// * `hash` - The message hash to sign (should be 32 bytes).
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if the underlying
    /// cryptographic primitive fails.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        // Overwrite the scalar's byte representation with zeros.
        let mut bytes: [u8; 32] = self.inner.to_bytes().into();
        bytes.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

#[cfg(test)]
mod tests {
    use super::*;

    /// The Bitcoin wiki's WIF reference pair: the same scalar encoded
    /// uncompressed ("5..." prefix) and compressed ("K..." prefix).
    const WIF_UNCOMPRESSED: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
    const WIF_COMPRESSED: &str = "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617";
    const WIF_SCALAR_HEX: &str =
        "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

    #[test]
    fn test_from_wif_uncompressed() {
        let key = PrivateKey::from_wif(WIF_UNCOMPRESSED).unwrap();
        assert_eq!(key.to_hex(), WIF_SCALAR_HEX);
        assert!(!key.is_compressed());
        assert!(key.is_mainnet());
    }

    #[test]
    fn test_from_wif_compressed() {
        let key = PrivateKey::from_wif(WIF_COMPRESSED).unwrap();
        assert_eq!(key.to_hex(), WIF_SCALAR_HEX);
        assert!(key.is_compressed());
        assert!(key.is_mainnet());
    }

    #[test]
    fn test_to_wif_roundtrip() {
        let key = PrivateKey::from_wif(WIF_UNCOMPRESSED).unwrap();
        assert_eq!(key.to_wif(), WIF_UNCOMPRESSED);

        let key = PrivateKey::from_wif(WIF_COMPRESSED).unwrap();
        assert_eq!(key.to_wif(), WIF_COMPRESSED);
    }

    #[test]
    fn test_testnet_wif_roundtrip() {
        let mut key = PrivateKey::from_hex(WIF_SCALAR_HEX).unwrap();
        key.set_mainnet(false);
        let wif = key.to_wif();
        let decoded = PrivateKey::from_wif(&wif).unwrap();
        assert!(!decoded.is_mainnet());
        assert!(decoded.is_compressed());
        assert_eq!(decoded.to_hex(), WIF_SCALAR_HEX);
    }

    #[test]
    fn test_from_wif_tampered_checksum() {
        // Flip the last character of a valid WIF.
        let mut chars: Vec<char> = WIF_COMPRESSED.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '7' { '8' } else { '7' };
        let tampered: String = chars.into_iter().collect();
        let result = PrivateKey::from_wif(&tampered);
        assert!(matches!(result, Err(PrimitivesError::ChecksumMismatch)));
    }

    #[test]
    fn test_from_wif_truncated() {
        let truncated = &WIF_COMPRESSED[..WIF_COMPRESSED.len() - 1];
        assert!(PrivateKey::from_wif(truncated).is_err());
    }

    #[test]
    fn test_from_base58_roundtrip() {
        let key = PrivateKey::from_hex(WIF_SCALAR_HEX).unwrap();
        let encoded = base58::encode(&key.to_bytes());
        let decoded = PrivateKey::from_base58(&encoded).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_from_base58_wrong_length() {
        let encoded = base58::encode(&[0xABu8; 16]);
        assert!(matches!(
            PrivateKey::from_base58(&encoded),
            Err(PrimitivesError::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn test_from_bytes_zero_scalar_rejected() {
        let result = PrivateKey::from_bytes(&[0u8; 32]);
        assert!(matches!(result, Err(PrimitivesError::ScalarOutOfRange)));
    }

    #[test]
    fn test_from_bytes_order_rejected() {
        // The curve order N itself is not a valid scalar.
        let order =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        let result = PrivateKey::from_bytes(&order);
        assert!(matches!(result, Err(PrimitivesError::ScalarOutOfRange)));
    }

    #[test]
    fn test_from_invalid_hex() {
        assert!(PrivateKey::from_hex("").is_err());
        assert!(PrivateKey::from_hex(WIF_COMPRESSED).is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let pk = PrivateKey::new();

        let serialized = pk.to_bytes();
        let deserialized = PrivateKey::from_bytes(&serialized).unwrap();
        assert_eq!(pk, deserialized);

        let hex_str = pk.to_hex();
        let deserialized = PrivateKey::from_hex(&hex_str).unwrap();
        assert_eq!(pk, deserialized);
    }

    #[test]
    fn test_sign_and_verify() {
        let key = PrivateKey::from_hex(WIF_SCALAR_HEX).unwrap();
        let hash = crate::hash::sha256d(b"a message to authorize");
        let sig = key.sign(&hash).unwrap();
        assert!(key.pub_key().verify(&hash, &sig));
    }
}
