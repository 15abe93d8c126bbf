//! 256-bit hashes and double SHA-256

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// A 256-bit hash in internal (little-endian) byte order.
///
/// Displayed and parsed in the conventional reversed hex form used by block
/// explorers and RPC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The all-zero hash
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    /// Parse a 64 digit display-order hex string at compile time.
    ///
    /// Panics on malformed input, which turns a bad constant into a build
    /// error when used in a `const` context.
    pub const fn from_display_hex(s: &str) -> Hash256 {
        let mut bytes: [u8; 32] = hex_array(s);
        let mut i = 0;
        while i < 16 {
            let tmp = bytes[i];
            bytes[i] = bytes[31 - i];
            bytes[31 - i] = tmp;
            i += 1;
        }
        Hash256(bytes)
    }

    /// Raw bytes in internal order
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Interpret the hash as a little-endian 256-bit number
    pub fn to_u256(&self) -> U256 {
        U256::from_little_endian(&self.0)
    }

    /// Check for the all-zero hash
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({self})")
    }
}

impl FromStr for Hash256 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 64 {
            return Err(Error::InvalidHash(s.to_string()));
        }
        let decoded = hex::decode(digits).map_err(|_| Error::InvalidHash(s.to_string()))?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        bytes.reverse();
        Ok(Hash256(bytes))
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Double SHA-256 of `data`
pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    Hash256(out)
}

const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit"),
    }
}

/// Decode a hex literal into a fixed-size array at compile time.
pub(crate) const fn hex_array<const N: usize>(s: &str) -> [u8; N] {
    let digits = s.as_bytes();
    assert!(digits.len() == N * 2, "hex literal has wrong length");
    let mut out = [0u8; N];
    let mut i = 0;
    while i < N {
        out[i] = (nibble(digits[2 * i]) << 4) | nibble(digits[2 * i + 1]);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "000004682c5b4dfe735ca02ba9ecb2817ea7cd4822f785a5ad0bf04f357d21c6";

    #[test]
    fn test_display_round_trip() {
        let hash = Hash256::from_display_hex(GENESIS);
        assert_eq!(hash.to_string(), GENESIS);
        assert_eq!(hash.0[31], 0x00);
        assert_eq!(hash.0[0], 0xc6);
        assert_eq!(GENESIS.parse::<Hash256>().unwrap(), hash);
        assert_eq!(format!("0x{GENESIS}").parse::<Hash256>().unwrap(), hash);
    }

    #[test]
    fn test_invalid_hash_strings() {
        assert!("abcd".parse::<Hash256>().is_err());
        let bad = "zz".repeat(32);
        assert!(matches!(bad.parse::<Hash256>(), Err(Error::InvalidHash(_))));
    }

    #[test]
    fn test_sha256d_known_vector() {
        // Double SHA-256 of the empty string
        assert_eq!(
            hex::encode(sha256d(b"").0),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_to_u256_is_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        assert_eq!(Hash256(bytes).to_u256(), U256::one());
        assert!(Hash256::ZERO.is_zero());
    }

    #[test]
    fn test_hex_array() {
        let bytes: [u8; 4] = hex_array("1cbdcb4f");
        assert_eq!(bytes, [0x1c, 0xbd, 0xcb, 0x4f]);
    }
}
