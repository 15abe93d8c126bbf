//! Cintamani network identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Network identifier enumeration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NetworkId {
    /// Production network
    #[serde(rename = "main")]
    Main,
    /// Public test network
    #[serde(rename = "test")]
    Testnet,
    /// Local regression test network
    #[serde(rename = "regtest")]
    Regtest,
    /// In-process unit test network
    #[serde(rename = "unittest")]
    UnitTest,
}

impl NetworkId {
    /// Every network, in registry order
    pub const ALL: [NetworkId; 4] = [
        NetworkId::Main,
        NetworkId::Testnet,
        NetworkId::Regtest,
        NetworkId::UnitTest,
    ];

    /// Canonical network name
    pub const fn name(self) -> &'static str {
        match self {
            NetworkId::Main => "main",
            NetworkId::Testnet => "test",
            NetworkId::Regtest => "regtest",
            NetworkId::UnitTest => "unittest",
        }
    }

    /// Check if this network is expected to carry real value
    pub const fn is_production(self) -> bool {
        matches!(self, NetworkId::Main)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(NetworkId::Main),
            "test" | "testnet" => Ok(NetworkId::Testnet),
            "regtest" => Ok(NetworkId::Regtest),
            "unittest" => Ok(NetworkId::UnitTest),
            _ => Err(Error::UnknownNetwork(s.to_string())),
        }
    }
}
