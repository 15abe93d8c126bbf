//! Per-network chain parameters.
//!
//! Main is defined in full. Testnet is Main plus a list of overrides, Regtest
//! is Testnet plus overrides and UnitTest is Main plus overrides; each list is
//! applied by [`ChainParams::derive_from`].

use primitive_types::U256;
use rand::RngCore;
use serde::Serialize;
use tracing::debug;

use crate::checkpoints::{Checkpoint, CheckpointData};
use crate::consensus::{ConsensusParams, MajorityThresholds};
use crate::genesis::{GenesisBlock, GenesisExpectation, GenesisSpec, HeaderHasher, COIN};
use crate::hash::{hex_array, Hash256};
use crate::network::NetworkId;
use crate::prefixes::{AddressPrefixes, Base58Type};
use crate::seeds::{convert_seed6, NetAddress, SeedSpec6, MAIN_SEEDS, TESTNET_SEEDS};
use crate::Result;

/// Everything needed to materialize parameters: the header hash function,
/// the current time and a random source for seed timestamps.
pub struct BuildContext<'a> {
    /// Proof-of-work header hash
    pub hasher: &'a dyn HeaderHasher,
    /// Current Unix time in seconds
    pub now: i64,
    /// Randomness for fixed seed "last seen" times
    pub rng: &'a mut dyn RngCore,
}

/// A DNS seed: display name and resolvable host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DnsSeed {
    /// Human readable label
    pub name: &'static str,
    /// Host to resolve
    pub host: &'static str,
}

/// Boolean behaviour switches of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    /// RPC server refuses to start without a password
    RequireRpcPassword,
    /// Built-in miner waits for peers
    MiningRequiresPeers,
    /// Blocks may use the minimum difficulty after a long gap
    AllowMinDifficultyBlocks,
    /// Expensive consistency checks are on by default
    DefaultConsistencyChecks,
    /// Only standard transactions are relayed and mined
    RequireStandard,
    /// Blocks are produced on RPC request
    MineBlocksOnDemand,
    /// Proof of work is not checked
    SkipProofOfWorkCheck,
    /// RPC still reports the deprecated `testnet` field
    TestnetToBeDeprecatedFieldRpc,
}

/// Feature flags of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeatureFlags {
    /// RPC server refuses to start without a password
    pub require_rpc_password: bool,
    /// Built-in miner waits for peers
    pub mining_requires_peers: bool,
    /// Blocks may use the minimum difficulty after a long gap
    pub allow_min_difficulty_blocks: bool,
    /// Expensive consistency checks are on by default
    pub default_consistency_checks: bool,
    /// Only standard transactions are relayed and mined
    pub require_standard: bool,
    /// Blocks are produced on RPC request
    pub mine_blocks_on_demand: bool,
    /// Proof of work is not checked
    pub skip_proof_of_work_check: bool,
    /// RPC still reports the deprecated `testnet` field
    pub testnet_to_be_deprecated_field_rpc: bool,
}

impl FeatureFlags {
    fn slot(&mut self, flag: FeatureFlag) -> &mut bool {
        match flag {
            FeatureFlag::RequireRpcPassword => &mut self.require_rpc_password,
            FeatureFlag::MiningRequiresPeers => &mut self.mining_requires_peers,
            FeatureFlag::AllowMinDifficultyBlocks => &mut self.allow_min_difficulty_blocks,
            FeatureFlag::DefaultConsistencyChecks => &mut self.default_consistency_checks,
            FeatureFlag::RequireStandard => &mut self.require_standard,
            FeatureFlag::MineBlocksOnDemand => &mut self.mine_blocks_on_demand,
            FeatureFlag::SkipProofOfWorkCheck => &mut self.skip_proof_of_work_check,
            FeatureFlag::TestnetToBeDeprecatedFieldRpc => {
                &mut self.testnet_to_be_deprecated_field_rpc
            }
        }
    }

    /// Read one flag
    pub fn get(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::RequireRpcPassword => self.require_rpc_password,
            FeatureFlag::MiningRequiresPeers => self.mining_requires_peers,
            FeatureFlag::AllowMinDifficultyBlocks => self.allow_min_difficulty_blocks,
            FeatureFlag::DefaultConsistencyChecks => self.default_consistency_checks,
            FeatureFlag::RequireStandard => self.require_standard,
            FeatureFlag::MineBlocksOnDemand => self.mine_blocks_on_demand,
            FeatureFlag::SkipProofOfWorkCheck => self.skip_proof_of_work_check,
            FeatureFlag::TestnetToBeDeprecatedFieldRpc => self.testnet_to_be_deprecated_field_rpc,
        }
    }

    /// Set one flag
    pub fn set(&mut self, flag: FeatureFlag, value: bool) {
        *self.slot(flag) = value;
    }
}

/// Mixing pool and masternode payment parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MasternodeParams {
    /// Maximum transactions in a mixing pool round
    pub pool_max_transactions: u32,
    /// Public key authorizing signed network-wide switches
    #[serde(with = "hex_bytes")]
    pub spork_key: &'static [u8],
    /// Public key authorizing masternode payment schedules
    #[serde(with = "hex_bytes")]
    pub masternode_payments_key: &'static [u8],
    /// Placeholder address used by the mixing pool
    pub pool_dummy_address: &'static str,
    /// Unix time masternode payments begin
    pub start_masternode_payments: i64,
}

/// Full parameter set of one network
#[derive(Debug, Clone, PartialEq)]
pub struct ChainParams {
    /// Network identifier
    pub network: NetworkId,
    /// Network name
    pub name: &'static str,
    /// Magic bytes prefixed to every P2P message
    pub message_start: [u8; 4],
    /// P2P listen port
    pub default_port: u16,
    /// Public key authorizing network alerts
    pub alert_pubkey: &'static [u8],
    /// Consensus constants
    pub consensus: ConsensusParams,
    /// Default number of miner threads, 0 meaning all cores
    pub default_miner_threads: u32,
    /// Genesis block
    pub genesis: GenesisBlock,
    /// Cached genesis hash
    pub genesis_hash: Hash256,
    /// Checkpoint table, shared between networks where identical
    pub checkpoints: &'static CheckpointData,
    /// Base58 prefixes
    pub prefixes: AddressPrefixes,
    /// Fixed bootstrap peers
    pub fixed_seeds: Vec<NetAddress>,
    /// DNS bootstrap seeds
    pub dns_seeds: Vec<DnsSeed>,
    /// Feature flags
    pub flags: FeatureFlags,
    /// Mixing and masternode parameters
    pub masternode: MasternodeParams,
}

/// A single-field change applied on top of a base network
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamOverride {
    /// Message start bytes
    MessageStart([u8; 4]),
    /// P2P port
    DefaultPort(u16),
    /// Alert key
    AlertPubkey(&'static [u8]),
    /// Proof-of-work limit
    PowLimit(U256),
    /// Subsidy halving interval
    SubsidyHalvingInterval(u32),
    /// Majority thresholds
    Majority(MajorityThresholds),
    /// Retarget timespan
    TargetTimespan(i64),
    /// Block spacing
    TargetSpacing(i64),
    /// Default miner threads
    MinerThreads(u32),
    /// Genesis header fields and the hash they must produce
    Genesis {
        /// Header timestamp
        time: u32,
        /// Header compact difficulty
        bits: u32,
        /// Header nonce
        nonce: u32,
        /// Canonical hash
        hash: Hash256,
    },
    /// Checkpoint table
    Checkpoints(&'static CheckpointData),
    /// Address prefixes
    Prefixes(AddressPrefixes),
    /// Fixed seed table
    FixedSeeds(&'static [SeedSpec6]),
    /// DNS seeds
    DnsSeeds(&'static [DnsSeed]),
    /// One feature flag
    Flag(FeatureFlag, bool),
    /// Mixing pool size
    PoolMaxTransactions(u32),
    /// Mixing pool placeholder address
    PoolDummyAddress(&'static str),
    /// Masternode payment start
    StartMasternodePayments(i64),
}

impl ChainParams {
    /// Derive a network from `base` by applying `overrides` in order.
    ///
    /// The genesis block is re-verified against the resulting difficulty limit
    /// (and rebuilt when overridden), and the checkpoint table is validated
    /// against the resulting genesis hash.
    pub fn derive_from(
        base: &ChainParams,
        network: NetworkId,
        overrides: &[ParamOverride],
        ctx: &mut BuildContext<'_>,
    ) -> Result<ChainParams> {
        let mut params = base.clone();
        params.network = network;
        params.name = network.name();

        let mut expected = GenesisExpectation {
            hash: base.genesis_hash,
            merkle_root: base.genesis.header().merkle_root,
        };
        let mut genesis_spec = None;

        for change in overrides {
            match *change {
                ParamOverride::Genesis {
                    time,
                    bits,
                    nonce,
                    hash,
                } => {
                    genesis_spec = Some(GenesisSpec {
                        time,
                        bits,
                        nonce,
                        ..*base.genesis.spec()
                    });
                    expected.hash = hash;
                }
                other => params.apply(other, ctx),
            }
        }

        if let Some(spec) = genesis_spec {
            params.genesis = GenesisBlock::build(spec, ctx.hasher);
            params.genesis_hash = params.genesis.hash();
        }
        params
            .genesis
            .verify(network, &expected, params.consensus.pow_limit)?;
        params.checkpoints.validate(network, params.genesis_hash)?;

        debug!(
            "Derived {} parameters from {} with {} overrides",
            network,
            base.network,
            overrides.len()
        );
        Ok(params)
    }

    fn apply(&mut self, change: ParamOverride, ctx: &mut BuildContext<'_>) {
        match change {
            ParamOverride::MessageStart(magic) => self.message_start = magic,
            ParamOverride::DefaultPort(port) => self.default_port = port,
            ParamOverride::AlertPubkey(key) => self.alert_pubkey = key,
            ParamOverride::PowLimit(limit) => self.consensus.pow_limit = limit,
            ParamOverride::SubsidyHalvingInterval(interval) => {
                self.consensus.subsidy_halving_interval = interval
            }
            ParamOverride::Majority(majority) => self.consensus.majority = majority,
            ParamOverride::TargetTimespan(timespan) => self.consensus.target_timespan = timespan,
            ParamOverride::TargetSpacing(spacing) => self.consensus.target_spacing = spacing,
            ParamOverride::MinerThreads(threads) => self.default_miner_threads = threads,
            // Handled by derive_from, which must rebuild after all overrides
            ParamOverride::Genesis { .. } => {}
            ParamOverride::Checkpoints(data) => self.checkpoints = data,
            ParamOverride::Prefixes(prefixes) => self.prefixes = prefixes,
            ParamOverride::FixedSeeds(table) => {
                self.fixed_seeds = convert_seed6(table, ctx.now, &mut *ctx.rng)
            }
            ParamOverride::DnsSeeds(seeds) => self.dns_seeds = seeds.to_vec(),
            ParamOverride::Flag(flag, value) => self.flags.set(flag, value),
            ParamOverride::PoolMaxTransactions(max) => self.masternode.pool_max_transactions = max,
            ParamOverride::PoolDummyAddress(address) => {
                self.masternode.pool_dummy_address = address
            }
            ParamOverride::StartMasternodePayments(time) => {
                self.masternode.start_masternode_payments = time
            }
        }
    }

    /// Blocks between difficulty retargets
    pub fn retarget_interval(&self) -> i64 {
        self.consensus.retarget_interval()
    }

    /// Prefix bytes for an encoding role
    pub fn prefix(&self, role: Base58Type) -> &[u8] {
        self.prefixes.get(role)
    }

    /// Whether the network is a test network of any kind
    pub fn is_test_chain(&self) -> bool {
        !self.network.is_production()
    }
}

// ---------------------------------------------------------------------------
// Shared constants
// ---------------------------------------------------------------------------

const GENESIS_TIMESTAMP: &str = "Wired 14/06/2019 The Grand coin CINTAMANI";

const GENESIS_OUTPUT_PUBKEY: [u8; 65] = hex_array(
    "042c9e4af8340dbe3302e147d9acce84f5b05d7371f52891e0d742d1832efe111b6ab9d56f335ffde117623b4a001fdb314d33e289cfeab026629c329f2ba96ef7",
);

const ALERT_PUBKEY: [u8; 65] = hex_array(
    "04aa8b558014909bf61c7af0a34424b46202c3d7d3a23208f1b411b114b1a8ac0d4e5183c58d716ebae6918e6c4bd0a629ec22bf87ab20220cf1d50ea8692075e8",
);

const SPORK_PUBKEY: [u8; 65] = hex_array(
    "04fdc1ed26a03359ba415feba7c9b01bee493378ac3aaa8a239b13746ff3d9384fc359e4e29040872b56fb8df2e77e91df95f5b2e79efc1fd549e6df5a52eeb2a3",
);

const GENESIS_MERKLE_ROOT: Hash256 =
    Hash256::from_display_hex("99d50e4f28f32592e5c9aca9fa6c71bfb508e1d51e3e282492743a224f41ecb8");

// ---------------------------------------------------------------------------
// Main network
// ---------------------------------------------------------------------------

/// Main network genesis inputs
pub const MAIN_GENESIS: GenesisSpec = GenesisSpec {
    timestamp: GENESIS_TIMESTAMP,
    reward: 50 * COIN,
    output_pubkey: &GENESIS_OUTPUT_PUBKEY,
    version: 1,
    time: 1_560_805_200,
    bits: 0x1e0f_fff0,
    nonce: 1_430_390,
};

/// Main network genesis hash
pub const MAIN_GENESIS_HASH: Hash256 =
    Hash256::from_display_hex("000004682c5b4dfe735ca02ba9ecb2817ea7cd4822f785a5ad0bf04f357d21c6");

/// Main network genesis expectations
pub const MAIN_GENESIS_EXPECTED: GenesisExpectation = GenesisExpectation {
    hash: MAIN_GENESIS_HASH,
    merkle_root: GENESIS_MERKLE_ROOT,
};

/// Main network checkpoints
pub static MAIN_CHECKPOINTS: CheckpointData = CheckpointData::new(
    &[Checkpoint {
        height: 0,
        hash: MAIN_GENESIS_HASH,
    }],
    1_560_805_200,
    0,
    2_800.0,
);

static MAIN_DNS_SEEDS: [DnsSeed; 3] = [
    DnsSeed {
        name: "cintamani.io",
        host: "18.218.20.171",
    },
    DnsSeed {
        name: "cintamani.qa",
        host: "18.191.138.58",
    },
    DnsSeed {
        name: "masternode.io",
        host: "192.168.0.161",
    },
];

const MAIN_PREFIXES: AddressPrefixes = AddressPrefixes {
    // Addresses start with 'F'
    pubkey_address: [36],
    script_address: [16],
    secret_key: [204],
    ext_public_key: [0x02, 0xfe, 0x52, 0xf8],
    ext_secret_key: [0x02, 0xfe, 0x52, 0xcc],
    ext_coin_type: 0x8000_0005u32.to_be_bytes(),
};

/// Build the main network parameters
pub fn main_params(ctx: &mut BuildContext<'_>) -> Result<ChainParams> {
    let consensus = ConsensusParams {
        pow_limit: U256::max_value() >> 20u32,
        subsidy_halving_interval: 210_000,
        majority: MajorityThresholds {
            enforce_upgrade: 750,
            reject_outdated: 950,
            window: 1_000,
        },
        target_timespan: 24 * 60 * 60,
        target_spacing: 150,
    };

    let genesis = GenesisBlock::build(MAIN_GENESIS, ctx.hasher);
    genesis.verify(NetworkId::Main, &MAIN_GENESIS_EXPECTED, consensus.pow_limit)?;
    MAIN_CHECKPOINTS.validate(NetworkId::Main, genesis.hash())?;

    Ok(ChainParams {
        network: NetworkId::Main,
        name: NetworkId::Main.name(),
        message_start: [0x1c, 0xbd, 0xcb, 0x4f],
        default_port: 1993,
        alert_pubkey: &ALERT_PUBKEY,
        consensus,
        default_miner_threads: 0,
        genesis_hash: genesis.hash(),
        genesis,
        checkpoints: &MAIN_CHECKPOINTS,
        prefixes: MAIN_PREFIXES,
        fixed_seeds: convert_seed6(MAIN_SEEDS, ctx.now, &mut *ctx.rng),
        dns_seeds: MAIN_DNS_SEEDS.to_vec(),
        flags: FeatureFlags {
            require_rpc_password: true,
            mining_requires_peers: true,
            allow_min_difficulty_blocks: false,
            default_consistency_checks: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            skip_proof_of_work_check: false,
            testnet_to_be_deprecated_field_rpc: false,
        },
        masternode: MasternodeParams {
            pool_max_transactions: 3,
            spork_key: &SPORK_PUBKEY,
            masternode_payments_key: &SPORK_PUBKEY,
            pool_dummy_address: "Xq19GqFvajRrEdDHYRKGYjTsQfpV5jyipF",
            start_masternode_payments: 1_560_805_200,
        },
    })
}

// ---------------------------------------------------------------------------
// Test network
// ---------------------------------------------------------------------------

/// Test network genesis hash
pub const TESTNET_GENESIS_HASH: Hash256 =
    Hash256::from_display_hex("00000ff9e72fe256798843c62c51ec73bdcdc26d1651fd07f151d20ca48db45f");

/// Test network checkpoints
pub static TESTNET_CHECKPOINTS: CheckpointData = CheckpointData::new(
    &[Checkpoint {
        height: 0,
        hash: TESTNET_GENESIS_HASH,
    }],
    1_560_805_201,
    0,
    500.0,
);

const TESTNET_PREFIXES: AddressPrefixes = AddressPrefixes {
    // Addresses start with 'x' or 'y'
    pubkey_address: [139],
    script_address: [19],
    secret_key: [239],
    ext_public_key: [0x3a, 0x80, 0x61, 0xa0],
    ext_secret_key: [0x3a, 0x80, 0x58, 0x37],
    ext_coin_type: 0x8000_0001u32.to_be_bytes(),
};

/// Changes from Main to Testnet
pub fn testnet_overrides() -> Vec<ParamOverride> {
    vec![
        ParamOverride::MessageStart([0xce, 0xe2, 0xca, 0xff]),
        ParamOverride::DefaultPort(11_993),
        ParamOverride::Majority(MajorityThresholds {
            enforce_upgrade: 51,
            reject_outdated: 75,
            window: 100,
        }),
        ParamOverride::TargetTimespan(10 * 60 * 60),
        ParamOverride::TargetSpacing(60),
        ParamOverride::Genesis {
            time: 1_560_805_201,
            bits: 0x1e0f_fff0,
            nonce: 1_363_257,
            hash: TESTNET_GENESIS_HASH,
        },
        ParamOverride::Checkpoints(&TESTNET_CHECKPOINTS),
        ParamOverride::Prefixes(TESTNET_PREFIXES),
        ParamOverride::FixedSeeds(TESTNET_SEEDS),
        ParamOverride::DnsSeeds(&[]),
        ParamOverride::Flag(FeatureFlag::AllowMinDifficultyBlocks, true),
        ParamOverride::Flag(FeatureFlag::RequireStandard, false),
        ParamOverride::Flag(FeatureFlag::TestnetToBeDeprecatedFieldRpc, true),
        ParamOverride::PoolMaxTransactions(2),
        ParamOverride::PoolDummyAddress("y1EZuxhhNMAUofTBEeLqGE1bJrpC2TWRNp"),
        ParamOverride::StartMasternodePayments(1_560_805_201),
    ]
}

// ---------------------------------------------------------------------------
// Regression test network
// ---------------------------------------------------------------------------

/// Regression test genesis hash
pub const REGTEST_GENESIS_HASH: Hash256 =
    Hash256::from_display_hex("54b0062e37c08985e9a15562cf86fbe786c1217b83d4c0a7998abb8178289026");

/// Regression test checkpoints
pub static REGTEST_CHECKPOINTS: CheckpointData = CheckpointData::new(
    &[Checkpoint {
        height: 0,
        hash: REGTEST_GENESIS_HASH,
    }],
    0,
    0,
    0.0,
);

/// Changes from Testnet to Regtest
pub fn regtest_overrides() -> Vec<ParamOverride> {
    vec![
        ParamOverride::MessageStart([0xfc, 0xc1, 0xb7, 0xdc]),
        ParamOverride::DefaultPort(19_931),
        ParamOverride::SubsidyHalvingInterval(150),
        ParamOverride::Majority(MajorityThresholds {
            enforce_upgrade: 750,
            reject_outdated: 950,
            window: 1_000,
        }),
        ParamOverride::MinerThreads(1),
        ParamOverride::PowLimit(U256::max_value() >> 1u32),
        ParamOverride::Genesis {
            time: 1_560_805_202,
            bits: 0x207f_ffff,
            nonce: 0,
            hash: REGTEST_GENESIS_HASH,
        },
        ParamOverride::Checkpoints(&REGTEST_CHECKPOINTS),
        ParamOverride::FixedSeeds(&[]),
        ParamOverride::DnsSeeds(&[]),
        ParamOverride::Flag(FeatureFlag::RequireRpcPassword, false),
        ParamOverride::Flag(FeatureFlag::MiningRequiresPeers, false),
        ParamOverride::Flag(FeatureFlag::DefaultConsistencyChecks, true),
        ParamOverride::Flag(FeatureFlag::MineBlocksOnDemand, true),
        ParamOverride::Flag(FeatureFlag::TestnetToBeDeprecatedFieldRpc, false),
    ]
}

// ---------------------------------------------------------------------------
// Unit test network
// ---------------------------------------------------------------------------

/// Changes from Main to UnitTest. Checkpoints stay shared with Main.
pub fn unittest_overrides() -> Vec<ParamOverride> {
    vec![
        ParamOverride::MessageStart([0xfa, 0xbf, 0xb5, 0xda]),
        ParamOverride::DefaultPort(18_445),
        ParamOverride::FixedSeeds(&[]),
        ParamOverride::DnsSeeds(&[]),
        ParamOverride::Flag(FeatureFlag::RequireRpcPassword, false),
        ParamOverride::Flag(FeatureFlag::MiningRequiresPeers, false),
        ParamOverride::Flag(FeatureFlag::DefaultConsistencyChecks, true),
        ParamOverride::Flag(FeatureFlag::AllowMinDifficultyBlocks, false),
        ParamOverride::Flag(FeatureFlag::MineBlocksOnDemand, true),
    ]
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &&'static [u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::KnownGenesisHasher;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build_main() -> ChainParams {
        let mut rng = StdRng::seed_from_u64(11);
        let mut ctx = BuildContext {
            hasher: &KnownGenesisHasher,
            now: 1_700_000_000,
            rng: &mut rng,
        };
        main_params(&mut ctx).unwrap()
    }

    #[test]
    fn test_main_params() {
        let main = build_main();
        assert_eq!(main.network, NetworkId::Main);
        assert_eq!(main.name, "main");
        assert_eq!(main.default_port, 1993);
        assert_eq!(main.genesis_hash, MAIN_GENESIS_HASH);
        assert_eq!(main.retarget_interval(), 576);
        assert_eq!(main.prefix(Base58Type::PubkeyAddress), &[36]);
        assert_eq!(main.prefixes.ext_coin_type() & 0x7fff_ffff, 5);
        assert_eq!(main.dns_seeds.len(), 3);
        assert_eq!(main.fixed_seeds.len(), MAIN_SEEDS.len());
        assert!(!main.is_test_chain());
    }

    #[test]
    fn test_main_rejects_wrong_hasher() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut ctx = BuildContext {
            hasher: &crate::genesis::Sha256dHasher,
            now: 0,
            rng: &mut rng,
        };
        let err = main_params(&mut ctx).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, crate::Error::GenesisHashMismatch { .. }));
    }

    #[test]
    fn test_derive_applies_only_listed_fields() {
        let main = build_main();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = BuildContext {
            hasher: &KnownGenesisHasher,
            now: 1_700_000_000,
            rng: &mut rng,
        };
        let derived = ChainParams::derive_from(
            &main,
            NetworkId::UnitTest,
            &[ParamOverride::DefaultPort(4242)],
            &mut ctx,
        )
        .unwrap();

        assert_eq!(derived.network, NetworkId::UnitTest);
        assert_eq!(derived.name, "unittest");
        assert_eq!(derived.default_port, 4242);
        assert_eq!(derived.message_start, main.message_start);
        assert_eq!(derived.consensus, main.consensus);
        assert_eq!(derived.genesis, main.genesis);
        assert_eq!(derived.fixed_seeds, main.fixed_seeds);
    }

    #[test]
    fn test_derive_rejects_wrong_genesis_hash() {
        let main = build_main();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = BuildContext {
            hasher: &KnownGenesisHasher,
            now: 0,
            rng: &mut rng,
        };
        let result = ChainParams::derive_from(
            &main,
            NetworkId::Testnet,
            &[ParamOverride::Genesis {
                time: 1_560_805_201,
                bits: 0x1e0f_fff0,
                nonce: 1_363_258,
                hash: TESTNET_GENESIS_HASH,
            }],
            &mut ctx,
        );
        assert!(matches!(
            result,
            Err(crate::Error::GenesisHashMismatch {
                network: NetworkId::Testnet,
                ..
            })
        ));
    }

    #[test]
    fn test_derive_validates_checkpoints_against_genesis() {
        let main = build_main();
        let mut rng = StdRng::seed_from_u64(5);
        let mut ctx = BuildContext {
            hasher: &KnownGenesisHasher,
            now: 0,
            rng: &mut rng,
        };
        let result = ChainParams::derive_from(
            &main,
            NetworkId::Testnet,
            &[ParamOverride::Checkpoints(&TESTNET_CHECKPOINTS)],
            &mut ctx,
        );
        assert!(matches!(
            result,
            Err(crate::Error::CheckpointGenesisMismatch { .. })
        ));
    }

    #[test]
    fn test_feature_flag_access() {
        let mut flags = FeatureFlags::default();
        flags.set(FeatureFlag::MineBlocksOnDemand, true);
        assert!(flags.mine_blocks_on_demand);
        assert!(flags.get(FeatureFlag::MineBlocksOnDemand));
        assert!(!flags.get(FeatureFlag::RequireStandard));
    }

    #[test]
    fn test_feature_flag_get_reads_each_field() {
        let all = [
            FeatureFlag::RequireRpcPassword,
            FeatureFlag::MiningRequiresPeers,
            FeatureFlag::AllowMinDifficultyBlocks,
            FeatureFlag::DefaultConsistencyChecks,
            FeatureFlag::RequireStandard,
            FeatureFlag::MineBlocksOnDemand,
            FeatureFlag::SkipProofOfWorkCheck,
            FeatureFlag::TestnetToBeDeprecatedFieldRpc,
        ];
        for flag in all {
            let mut flags = FeatureFlags::default();
            flags.set(flag, true);
            for other in all {
                assert_eq!(flags.get(other), other == flag, "{flag:?} vs {other:?}");
            }
        }

        let main = build_main().flags;
        assert!(main.get(FeatureFlag::RequireRpcPassword));
        assert!(main.get(FeatureFlag::MiningRequiresPeers));
        assert!(!main.get(FeatureFlag::MineBlocksOnDemand));
    }

    #[test]
    fn test_masternode_keys_serialize_as_hex() {
        let main = build_main();
        let json = serde_json::to_value(main.masternode).unwrap();
        assert_eq!(json["pool_max_transactions"], 3);
        assert!(json["spork_key"].as_str().unwrap().starts_with("04fdc1ed"));
    }
}
