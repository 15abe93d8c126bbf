//! Property-based tests for cintamani-params
//!
//! Uses proptest to verify invariants across randomized inputs

use cintamani_params::consensus::compact_to_target;
use cintamani_params::seeds::{convert_seed6, NODE_NETWORK, ONE_WEEK};
use cintamani_params::{CommandLineFlags, Error, NetworkSource, SeedSpec6};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Strategies
// ============================================================================

/// Seed tables of up to 64 entries
fn seed_table_strategy() -> impl Strategy<Value = Vec<SeedSpec6>> {
    prop::collection::vec(
        (any::<[u8; 16]>(), any::<u16>()).prop_map(|(addr, port)| SeedSpec6::new(addr, port)),
        0..64,
    )
}

/// Plausible Unix times
fn now_strategy() -> impl Strategy<Value = i64> {
    2 * ONE_WEEK..4_000_000_000i64
}

/// Unrelated node arguments
fn other_args_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("-(daemon|server|datadir=[a-z]{1,8}|port=[0-9]{1,5})").unwrap(),
        0..6,
    )
}

// ============================================================================
// Seed conversion
// ============================================================================

proptest! {
    /// Property: conversion keeps every entry, in order, inside the window
    #[test]
    fn prop_seed_conversion_window(
        table in seed_table_strategy(),
        now in now_strategy(),
        rng_seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let converted = convert_seed6(&table, now, &mut rng);

        prop_assert_eq!(converted.len(), table.len());
        for (seed, addr) in table.iter().zip(&converted) {
            prop_assert_eq!(addr.ip.octets(), seed.addr);
            prop_assert_eq!(addr.port, seed.port);
            prop_assert_eq!(addr.services, NODE_NETWORK);
            prop_assert!(addr.time > now - 2 * ONE_WEEK);
            prop_assert!(addr.time < now - ONE_WEEK);
        }
    }
}

// ============================================================================
// Network selection
// ============================================================================

proptest! {
    /// Property: both switches on is always a selection error, wherever they appear
    #[test]
    fn prop_conflicting_flags_rejected(
        mut args in other_args_strategy(),
        testnet_at in 0usize..7,
        regtest_at in 0usize..8,
    ) {
        args.insert(testnet_at.min(args.len()), "-testnet".to_string());
        args.insert(regtest_at.min(args.len()), "--regtest=1".to_string());

        let result = CommandLineFlags::from_args(&args).resolve();
        prop_assert!(matches!(result, Err(Error::ConflictingNetworkFlags)));
    }

    /// Property: unrelated arguments never change the selected network
    #[test]
    fn prop_unrelated_args_select_main(args in other_args_strategy()) {
        let flags = CommandLineFlags::from_args(&args);
        prop_assert_eq!(flags, CommandLineFlags::default());
    }
}

// ============================================================================
// Compact targets
// ============================================================================

proptest! {
    /// Property: positive exponents 3..=29 with a non-zero mantissa decode
    #[test]
    fn prop_compact_target_decodes(exponent in 3u32..=29, mantissa in 1u32..0x80_0000) {
        let bits = (exponent << 24) | mantissa;
        let target = compact_to_target(bits);
        prop_assert!(target.is_some());
        prop_assert!(!target.unwrap().is_zero());
    }
}
