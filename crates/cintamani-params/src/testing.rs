//! Test doubles.
//!
//! The real proof-of-work hash (X11) lives with the node. Tests that need the
//! canonical genesis blocks to verify use [`KnownGenesisHasher`], which
//! returns the recorded hash for each canonical genesis header and plain
//! double SHA-256 for anything else.

use crate::genesis::{HeaderHasher, HEADER_SIZE};
use crate::hash::{hex_array, sha256d, Hash256};
use crate::params::{MAIN_GENESIS_HASH, REGTEST_GENESIS_HASH, TESTNET_GENESIS_HASH};

const MAIN_HEADER: [u8; HEADER_SIZE] = hex_array(
    "010000000000000000000000000000000000000000000000000000000000000000000000b8ec414f223a749224283e1ed5e108b5bf716cfaa9acc9e59225f3284f0ed59950ff075df0ff0f1e76d31500",
);

const TESTNET_HEADER: [u8; HEADER_SIZE] = hex_array(
    "010000000000000000000000000000000000000000000000000000000000000000000000b8ec414f223a749224283e1ed5e108b5bf716cfaa9acc9e59225f3284f0ed59951ff075df0ff0f1e39cd1400",
);

const REGTEST_HEADER: [u8; HEADER_SIZE] = hex_array(
    "010000000000000000000000000000000000000000000000000000000000000000000000b8ec414f223a749224283e1ed5e108b5bf716cfaa9acc9e59225f3284f0ed59952ff075dffff7f2000000000",
);

/// Header hasher that knows the proof-of-work hashes of the canonical
/// genesis headers
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownGenesisHasher;

impl HeaderHasher for KnownGenesisHasher {
    fn hash_header(&self, header: &[u8; HEADER_SIZE]) -> Hash256 {
        if header == &MAIN_HEADER {
            MAIN_GENESIS_HASH
        } else if header == &TESTNET_HEADER {
            TESTNET_GENESIS_HASH
        } else if header == &REGTEST_HEADER {
            REGTEST_GENESIS_HASH
        } else {
            sha256d(header)
        }
    }
}
