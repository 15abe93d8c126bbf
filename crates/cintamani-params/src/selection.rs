//! Where the node learns which network to run on.
//!
//! Each source resolves to a [`NetworkId`] or a selection error; the
//! registry does the actual selecting.

use std::env::VarError;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::network::NetworkId;
use crate::{Error, Result};

/// Default environment variable read by [`EnvNetworkSource`]
pub const NETWORK_ENV_VAR: &str = "CINTAMANI_NETWORK";

/// Anything that can name the network to select
pub trait NetworkSource {
    /// Resolve the network
    fn resolve(&self) -> Result<NetworkId>;
}

impl NetworkSource for NetworkId {
    fn resolve(&self) -> Result<NetworkId> {
        Ok(*self)
    }
}

/// The `-testnet` and `-regtest` command-line switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandLineFlags {
    /// `-testnet` was set
    pub testnet: bool,
    /// `-regtest` was set
    pub regtest: bool,
}

impl CommandLineFlags {
    /// Scan an argument list.
    ///
    /// Accepts `-name`, `--name`, `-name=1`, `-name=0` and `-noname`. Later
    /// occurrences win. Unrelated arguments are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            let Some(body) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
                continue;
            };
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name, value),
                None => (body, ""),
            };
            let (name, negated) = match name.strip_prefix("no") {
                Some(rest) if rest == "testnet" || rest == "regtest" => (rest, true),
                _ => (name, false),
            };
            let enabled = flag_value(value) != negated;
            match name {
                "testnet" => flags.testnet = enabled,
                "regtest" => flags.regtest = enabled,
                _ => {}
            }
        }
        flags
    }
}

/// Interpret a flag value the way boolean switches are read: empty means on,
/// otherwise any non-zero integer is on
fn flag_value(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    value.trim().parse::<i64>().map(|v| v != 0).unwrap_or(false)
}

impl NetworkSource for CommandLineFlags {
    fn resolve(&self) -> Result<NetworkId> {
        match (self.testnet, self.regtest) {
            (true, true) => Err(Error::ConflictingNetworkFlags),
            (true, false) => Ok(NetworkId::Testnet),
            (false, true) => Ok(NetworkId::Regtest),
            (false, false) => Ok(NetworkId::Main),
        }
    }
}

/// Network named by an environment variable, Main when unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvNetworkSource {
    var: String,
}

impl EnvNetworkSource {
    /// Read from a custom variable
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Variable name
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvNetworkSource {
    fn default() -> Self {
        Self::new(NETWORK_ENV_VAR)
    }
}

impl NetworkSource for EnvNetworkSource {
    fn resolve(&self) -> Result<NetworkId> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            Ok(_) | Err(VarError::NotPresent) => {
                debug!("{} not set, defaulting to main", self.var);
                Ok(NetworkId::Main)
            }
            Err(VarError::NotUnicode(value)) => {
                Err(Error::UnknownNetwork(value.to_string_lossy().into_owned()))
            }
        }
    }
}

/// Network selection stored in a JSON configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network to run on
    pub network: NetworkId,
}

impl NetworkConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: NetworkConfig = serde_json::from_str(&contents)?;
        debug!("Loaded network {} from {}", config.network, path.display());
        Ok(config)
    }

    /// Write as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl NetworkSource for NetworkConfig {
    fn resolve(&self) -> Result<NetworkId> {
        Ok(self.network)
    }
}
