/// Bitcoin address handling.
///
/// Supports P2PKH address generation from public key hashes,
/// address validation, and mainnet/testnet discrimination.
/// Uses Base58Check encoding with SHA-256d checksums.

use std::fmt;

use txkit_primitives::base58;
use txkit_primitives::ec::PublicKey;
use txkit_primitives::hash::sha256d;

use crate::ScriptError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;

/// Bitcoin network type for address prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Bitcoin mainnet (address prefix 0x00, starts with '1').
    Mainnet,
    /// Bitcoin testnet (address prefix 0x6f, starts with 'm' or 'n').
    Testnet,
}

/// A Bitcoin P2PKH address.
///
/// Contains the 20-byte public key hash and the network it belongs to.
/// Can be serialized to/from the Base58Check string format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable Base58Check address string.
    pub address_string: String,
    /// The 20-byte RIPEMD-160(SHA-256(pubkey)) hash.
    pub public_key_hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// Decodes the string, validates the checksum, and detects the network
    /// from the version byte (0x00 = mainnet, 0x6f = testnet).
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    ///
    /// # Returns
    /// An `Address`, `ChecksumMismatch` if the embedded checksum fails,
    /// `UnsupportedAddress` for an unrecognized version byte.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = base58::decode(addr)
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char for '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        // Verify checksum: last 4 bytes should equal sha256d of first 21 bytes.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(ScriptError::ChecksumMismatch);
        }

        let network = match decoded[0] {
            MAINNET_P2PKH => Network::Mainnet,
            TESTNET_P2PKH => Network::Testnet,
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };

        let mut pkh = [0u8; 20];
        pkh.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            public_key_hash: pkh,
            network,
        })
    }

    /// Parse an address and require it to belong to a specific network.
    ///
    /// A well-formed address of the wrong network is rejected with
    /// `UnsupportedAddress`.
    ///
    /// # Arguments
    /// * `addr` - The Base58Check address string.
    /// * `expected` - The network the address must belong to.
    pub fn from_string_for_network(addr: &str, expected: Network) -> Result<Self, ScriptError> {
        let address = Self::from_string(addr)?;
        if address.network != expected {
            return Err(ScriptError::UnsupportedAddress(format!(
                "'{}' is a {:?} address, expected {:?}",
                addr, address.network, expected
            )));
        }
        Ok(address)
    }

    /// Create an address from a 20-byte public key hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of the public key.
    /// * `network` - The target network (Mainnet or Testnet).
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let version = match network {
            Network::Mainnet => MAINNET_P2PKH,
            Network::Testnet => TESTNET_P2PKH,
        };

        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(hash);
        let address_string = base58::check_encode(&payload);

        Address {
            address_string,
            public_key_hash: *hash,
            network,
        }
    }

    /// Create an address from a public key.
    ///
    /// Hashes the key's serialization (compressed or uncompressed,
    /// matching how the key will appear in the unlocking script).
    ///
    /// # Arguments
    /// * `pub_key` - The public key.
    /// * `compressed` - Which serialization of the key to hash.
    /// * `network` - The target network.
    pub fn from_public_key(pub_key: &PublicKey, compressed: bool, network: Network) -> Self {
        let h = pub_key.hash160(compressed);
        Self::from_public_key_hash(&h, network)
    }

    /// Create an address from a hex-encoded public key string.
    ///
    /// # Arguments
    /// * `pub_key_hex` - Hex-encoded public key (compressed or uncompressed).
    /// * `network` - The target network.
    ///
    /// # Returns
    /// An `Address`, or an error if the hex or key is invalid.
    pub fn from_public_key_string(pub_key_hex: &str, network: Network) -> Result<Self, ScriptError> {
        let pub_key_bytes =
            hex::decode(pub_key_hex).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        let h = txkit_primitives::hash::hash160(&pub_key_bytes);
        Ok(Self::from_public_key_hash(&h, network))
    }
}

impl fmt::Display for Address {
    /// Display the address as its Base58Check string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
