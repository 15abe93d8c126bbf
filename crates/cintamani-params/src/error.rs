//! Error types for chain parameter construction and network selection.

use std::fmt;

use crate::hash::Hash256;
use crate::network::NetworkId;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Chain parameter errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Computed genesis hash disagrees with the network's canonical hash
    #[error("{network} genesis hash mismatch: expected {expected}, computed {computed}")]
    GenesisHashMismatch {
        /// Network being built
        network: NetworkId,
        /// Hard-coded hash
        expected: Hash256,
        /// Hash produced by the header hasher
        computed: Hash256,
    },

    /// Computed genesis merkle root disagrees with the canonical root
    #[error("{network} genesis merkle root mismatch: expected {expected}, computed {computed}")]
    GenesisMerkleMismatch {
        /// Network being built
        network: NetworkId,
        /// Hard-coded merkle root
        expected: Hash256,
        /// Root computed from the coinbase transaction
        computed: Hash256,
    },

    /// Genesis header does not satisfy its own difficulty or the network limit
    #[error("{network} genesis proof of work invalid: {reason}")]
    GenesisProofOfWork {
        /// Network being built
        network: NetworkId,
        /// What was violated
        reason: String,
    },

    /// Checkpoint heights are not strictly increasing
    #[error("{network} checkpoints out of order at height {height}")]
    CheckpointOrder {
        /// Network being built
        network: NetworkId,
        /// First height that is not above its predecessor
        height: u32,
    },

    /// Height 0 checkpoint missing or not the genesis hash
    #[error("{network} checkpoint at height 0 does not match genesis {genesis}")]
    CheckpointGenesisMismatch {
        /// Network being built
        network: NetworkId,
        /// Genesis hash of the network
        genesis: Hash256,
    },

    /// Hex string could not be decoded into a hash
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Network name not recognised
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Both -testnet and -regtest were requested
    #[error("Invalid combination of -regtest and -testnet")]
    ConflictingNetworkFlags,

    /// Active parameters requested before a network was selected
    #[error("No network selected")]
    NoNetworkSelected,

    /// Mutable parameters requested while a non unit-test network is active
    #[error("Parameters of {0} are not modifiable")]
    NotUnitTestNetwork(NetworkId),

    /// Seeder dump or seed address could not be parsed
    #[error("Invalid seed entry: {0}")]
    InvalidSeed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Classify the error following the registry's fault taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::GenesisHashMismatch { .. }
            | Error::GenesisMerkleMismatch { .. }
            | Error::GenesisProofOfWork { .. }
            | Error::CheckpointOrder { .. }
            | Error::CheckpointGenesisMismatch { .. } => ErrorCategory::Integrity,
            Error::UnknownNetwork(_) | Error::ConflictingNetworkFlags => ErrorCategory::Selection,
            Error::NoNetworkSelected | Error::NotUnitTestNetwork(_) => ErrorCategory::Misuse,
            Error::InvalidHash(_) | Error::InvalidSeed(_) | Error::Io(_) | Error::Config(_) => {
                ErrorCategory::Input
            }
        }
    }

    /// Whether the process must not continue after this error.
    ///
    /// Integrity faults mean the build disagrees with the canonical chain and
    /// misuse faults mean the caller would run with undefined parameters.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Integrity | ErrorCategory::Misuse
        )
    }
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Compiled-in constants disagree with the computed values
    Integrity,
    /// Configured network could not be resolved
    Selection,
    /// Registry used out of order
    Misuse,
    /// Malformed external input (files, seed dumps, hex)
    Input,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Integrity => write!(f, "Integrity"),
            ErrorCategory::Selection => write!(f, "Selection"),
            ErrorCategory::Misuse => write!(f, "Misuse"),
            ErrorCategory::Input => write!(f, "Input"),
        }
    }
}
