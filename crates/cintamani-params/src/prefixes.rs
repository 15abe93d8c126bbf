//! Base58 address and extended key prefixes

use std::fmt;

use serde::Serialize;

/// Key encoding roles that carry a network prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Base58Type {
    /// Pay-to-pubkey-hash address
    PubkeyAddress,
    /// Pay-to-script-hash address
    ScriptAddress,
    /// WIF private key
    SecretKey,
    /// BIP32 extended public key
    ExtPublicKey,
    /// BIP32 extended private key
    ExtSecretKey,
    /// BIP44 coin type
    ExtCoinType,
}

impl Base58Type {
    /// Every role
    pub const ALL: [Base58Type; 6] = [
        Base58Type::PubkeyAddress,
        Base58Type::ScriptAddress,
        Base58Type::SecretKey,
        Base58Type::ExtPublicKey,
        Base58Type::ExtSecretKey,
        Base58Type::ExtCoinType,
    ];
}

impl fmt::Display for Base58Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Base58Type::PubkeyAddress => "pubkey-address",
            Base58Type::ScriptAddress => "script-address",
            Base58Type::SecretKey => "secret-key",
            Base58Type::ExtPublicKey => "ext-public-key",
            Base58Type::ExtSecretKey => "ext-secret-key",
            Base58Type::ExtCoinType => "ext-coin-type",
        };
        f.write_str(name)
    }
}

/// Prefix bytes for every [`Base58Type`].
///
/// One field per role, so a table cannot be built with a role missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressPrefixes {
    /// Pay-to-pubkey-hash version byte
    pub pubkey_address: [u8; 1],
    /// Pay-to-script-hash version byte
    pub script_address: [u8; 1],
    /// Private key version byte
    pub secret_key: [u8; 1],
    /// Extended public key version
    pub ext_public_key: [u8; 4],
    /// Extended private key version
    pub ext_secret_key: [u8; 4],
    /// Hardened BIP44 coin type, big-endian
    pub ext_coin_type: [u8; 4],
}

impl AddressPrefixes {
    /// Prefix bytes for a role
    pub fn get(&self, role: Base58Type) -> &[u8] {
        match role {
            Base58Type::PubkeyAddress => &self.pubkey_address,
            Base58Type::ScriptAddress => &self.script_address,
            Base58Type::SecretKey => &self.secret_key,
            Base58Type::ExtPublicKey => &self.ext_public_key,
            Base58Type::ExtSecretKey => &self.ext_secret_key,
            Base58Type::ExtCoinType => &self.ext_coin_type,
        }
    }

    /// BIP44 coin type including the hardened bit
    pub fn ext_coin_type(&self) -> u32 {
        u32::from_be_bytes(self.ext_coin_type)
    }
}

impl std::ops::Index<Base58Type> for AddressPrefixes {
    type Output = [u8];

    fn index(&self, role: Base58Type) -> &[u8] {
        self.get(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIXES: AddressPrefixes = AddressPrefixes {
        pubkey_address: [36],
        script_address: [16],
        secret_key: [204],
        ext_public_key: [0x02, 0xfe, 0x52, 0xf8],
        ext_secret_key: [0x02, 0xfe, 0x52, 0xcc],
        ext_coin_type: 0x8000_0005u32.to_be_bytes(),
    };

    #[test]
    fn test_every_role_is_defined() {
        for role in Base58Type::ALL {
            assert!(!PREFIXES.get(role).is_empty(), "{role} missing");
        }
    }

    #[test]
    fn test_index_by_role() {
        assert_eq!(&PREFIXES[Base58Type::PubkeyAddress], &[36]);
        assert_eq!(&PREFIXES[Base58Type::ExtSecretKey], &[0x02, 0xfe, 0x52, 0xcc]);
    }

    #[test]
    fn test_coin_type() {
        assert_eq!(PREFIXES.ext_coin_type(), 0x8000_0005);
        assert_eq!(PREFIXES.ext_coin_type() & 0x7fff_ffff, 5);
    }
}
