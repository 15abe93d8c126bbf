//! Cintamani chain parameters
//!
//! This crate defines, for every logical network the node can run on, the
//! consensus constants, genesis block, checkpoints, address prefixes and
//! bootstrap seeds that validation, wallet, networking and RPC code must
//! agree on. Parameters are built once into a [`ChainParamsRegistry`] which
//! is then handed to the rest of the node.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checkpoints;
pub mod consensus;
pub mod error;
pub mod genesis;
pub mod hash;
pub mod network;
pub mod params;
pub mod prefixes;
pub mod registry;
pub mod script;
pub mod seedgen;
pub mod seeds;
pub mod selection;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use checkpoints::{Checkpoint, CheckpointData};
pub use consensus::{ConsensusParams, MajorityThresholds};
pub use error::{Error, ErrorCategory, Result};
pub use genesis::{GenesisBlock, GenesisExpectation, GenesisSpec, HeaderHasher, Sha256dHasher};
pub use hash::Hash256;
pub use network::NetworkId;
pub use params::{
    BuildContext, ChainParams, DnsSeed, FeatureFlag, FeatureFlags, MasternodeParams, ParamOverride,
};
pub use prefixes::{AddressPrefixes, Base58Type};
pub use registry::ChainParamsRegistry;
pub use seeds::{NetAddress, SeedSpec6};
pub use selection::{CommandLineFlags, EnvNetworkSource, NetworkConfig, NetworkSource};

#[cfg(any(test, feature = "test-helpers"))]
pub use registry::UnitTestParams;
