//! Registry of every network's parameters plus the active selection.
//!
//! The registry is an ordinary value built once at startup and passed to
//! whoever needs parameters. Selecting a network records which parameter set
//! [`ChainParamsRegistry::active`] returns.

use chrono::Utc;
use tracing::{info, warn};

use crate::genesis::HeaderHasher;
use crate::network::NetworkId;
use crate::params::{
    main_params, regtest_overrides, testnet_overrides, unittest_overrides, BuildContext,
    ChainParams,
};
use crate::selection::NetworkSource;
use crate::{Error, Result};

/// All four parameter sets and the active network
#[derive(Debug, Clone)]
pub struct ChainParamsRegistry {
    main: ChainParams,
    testnet: ChainParams,
    regtest: ChainParams,
    unittest: ChainParams,
    active: Option<NetworkId>,
}

impl ChainParamsRegistry {
    /// Build every network using the current time and thread-local randomness
    pub fn build(hasher: &dyn HeaderHasher) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let mut ctx = BuildContext {
            hasher,
            now: Utc::now().timestamp(),
            rng: &mut rng,
        };
        Self::build_with(&mut ctx)
    }

    /// Build every network from an explicit context.
    ///
    /// Fails on the first network whose genesis block or checkpoints
    /// disagree with the compiled-in values.
    pub fn build_with(ctx: &mut BuildContext<'_>) -> Result<Self> {
        let main = main_params(ctx)?;
        let testnet = ChainParams::derive_from(&main, NetworkId::Testnet, &testnet_overrides(), ctx)?;
        let regtest =
            ChainParams::derive_from(&testnet, NetworkId::Regtest, &regtest_overrides(), ctx)?;
        let unittest =
            ChainParams::derive_from(&main, NetworkId::UnitTest, &unittest_overrides(), ctx)?;

        info!(
            "Built chain parameters for {} networks (main genesis {})",
            NetworkId::ALL.len(),
            main.genesis_hash
        );

        Ok(Self {
            main,
            testnet,
            regtest,
            unittest,
            active: None,
        })
    }

    /// Parameters of a network, regardless of selection
    pub fn params_for(&self, network: NetworkId) -> &ChainParams {
        match network {
            NetworkId::Main => &self.main,
            NetworkId::Testnet => &self.testnet,
            NetworkId::Regtest => &self.regtest,
            NetworkId::UnitTest => &self.unittest,
        }
    }

    #[cfg(any(test, feature = "test-helpers"))]
    fn params_for_mut(&mut self, network: NetworkId) -> &mut ChainParams {
        match network {
            NetworkId::Main => &mut self.main,
            NetworkId::Testnet => &mut self.testnet,
            NetworkId::Regtest => &mut self.regtest,
            NetworkId::UnitTest => &mut self.unittest,
        }
    }

    /// Make `network` the active network
    pub fn select(&mut self, network: NetworkId) -> &ChainParams {
        match self.active {
            Some(previous) if previous != network => {
                warn!("Switching active network from {} to {}", previous, network)
            }
            Some(_) => {}
            None => info!("Selected network {}", network),
        }
        self.active = Some(network);
        self.params_for(network)
    }

    /// Resolve a network from `source` and select it
    pub fn select_from_source(&mut self, source: &dyn NetworkSource) -> Result<&ChainParams> {
        let network = source.resolve()?;
        Ok(self.select(network))
    }

    /// Parameters of the active network
    pub fn active(&self) -> Result<&ChainParams> {
        self.active
            .map(|network| self.params_for(network))
            .ok_or(Error::NoNetworkSelected)
    }

    /// Active network, if one was selected
    pub fn active_network(&self) -> Option<NetworkId> {
        self.active
    }

    /// Mutable view of the active parameters; only the unit test network
    /// may be modified
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn modifiable_active(&mut self) -> Result<UnitTestParams<'_>> {
        match self.active {
            Some(NetworkId::UnitTest) => Ok(UnitTestParams {
                params: self.params_for_mut(NetworkId::UnitTest),
            }),
            Some(network) => Err(Error::NotUnitTestNetwork(network)),
            None => Err(Error::NoNetworkSelected),
        }
    }
}

/// Mutator for the unit test network's parameters
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug)]
pub struct UnitTestParams<'a> {
    params: &'a mut ChainParams,
}

#[cfg(any(test, feature = "test-helpers"))]
impl UnitTestParams<'_> {
    /// Override the subsidy halving interval
    pub fn set_subsidy_halving_interval(&mut self, interval: u32) {
        self.params.consensus.subsidy_halving_interval = interval;
    }

    /// Override the block count required to enforce upgraded rules
    pub fn set_enforce_block_upgrade_majority(&mut self, count: u32) {
        self.params.consensus.majority.enforce_upgrade = count;
    }

    /// Override the block count required to reject outdated blocks
    pub fn set_reject_block_outdated_majority(&mut self, count: u32) {
        self.params.consensus.majority.reject_outdated = count;
    }

    /// Override the upgrade voting window
    pub fn set_to_check_block_upgrade_majority(&mut self, window: u32) {
        self.params.consensus.majority.window = window;
    }

    /// Toggle default consistency checks
    pub fn set_default_consistency_checks(&mut self, value: bool) {
        self.params.flags.default_consistency_checks = value;
    }

    /// Toggle minimum difficulty blocks
    pub fn set_allow_min_difficulty_blocks(&mut self, value: bool) {
        self.params.flags.allow_min_difficulty_blocks = value;
    }

    /// Toggle proof-of-work checking
    pub fn set_skip_proof_of_work_check(&mut self, value: bool) {
        self.params.flags.skip_proof_of_work_check = value;
    }

    /// Current parameters
    pub fn params(&self) -> &ChainParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::KnownGenesisHasher;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> ChainParamsRegistry {
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = BuildContext {
            hasher: &KnownGenesisHasher,
            now: 1_700_000_000,
            rng: &mut rng,
        };
        ChainParamsRegistry::build_with(&mut ctx).unwrap()
    }

    #[test]
    fn test_params_for_returns_requested_network() {
        let registry = registry();
        for network in NetworkId::ALL {
            assert_eq!(registry.params_for(network).network, network);
        }
    }

    #[test]
    fn test_active_requires_selection() {
        let mut registry = registry();
        assert!(matches!(registry.active(), Err(Error::NoNetworkSelected)));
        assert_eq!(registry.active_network(), None);

        registry.select(NetworkId::Regtest);
        assert_eq!(registry.active().unwrap().network, NetworkId::Regtest);

        registry.select(NetworkId::Main);
        assert_eq!(registry.active_network(), Some(NetworkId::Main));
    }

    #[test]
    fn test_modifiable_active_only_for_unittest() {
        let mut registry = registry();
        assert!(matches!(
            registry.modifiable_active(),
            Err(Error::NoNetworkSelected)
        ));

        registry.select(NetworkId::Main);
        let err = registry.modifiable_active().unwrap_err();
        assert!(matches!(err, Error::NotUnitTestNetwork(NetworkId::Main)));
        assert!(err.is_fatal());

        registry.select(NetworkId::UnitTest);
        let mut params = registry.modifiable_active().unwrap();
        params.set_subsidy_halving_interval(10);
        params.set_skip_proof_of_work_check(true);
        assert_eq!(params.params().consensus.subsidy_halving_interval, 10);

        let active = registry.active().unwrap();
        assert_eq!(active.consensus.subsidy_halving_interval, 10);
        assert!(active.flags.skip_proof_of_work_check);
        assert_eq!(
            registry.params_for(NetworkId::Main).consensus.subsidy_halving_interval,
            210_000
        );
    }
}
