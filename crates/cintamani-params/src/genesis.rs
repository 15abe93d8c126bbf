//! Genesis block construction and self-verification.
//!
//! The genesis block is rebuilt from compiled-in constants on every start and
//! checked against the canonical hash and merkle root before any parameters
//! are handed out.

use primitive_types::U256;
use tracing::debug;

use crate::consensus::compact_to_target;
use crate::hash::{sha256d, Hash256};
use crate::network::NetworkId;
use crate::script::{Script, OP_CHECKSIG};
use crate::{Error, Result};

/// Serialized block header size in bytes
pub const HEADER_SIZE: usize = 80;

/// Smallest currency unit per coin
pub const COIN: i64 = 100_000_000;

/// Compact bits pushed at the start of the genesis coinbase script
const COINBASE_BITS_TAG: i64 = 486_604_799;

/// Small numeric tag pushed after the bits
const COINBASE_EXTRA_NONCE: i64 = 4;

/// Proof-of-work hash of a serialized block header.
///
/// The chain's header hash is supplied by the caller; this crate only
/// needs it to check the genesis block against its canonical hash.
pub trait HeaderHasher {
    /// Hash the 80-byte consensus serialization of a header
    fn hash_header(&self, header: &[u8; HEADER_SIZE]) -> Hash256;
}

impl<F> HeaderHasher for F
where
    F: Fn(&[u8; HEADER_SIZE]) -> Hash256,
{
    fn hash_header(&self, header: &[u8; HEADER_SIZE]) -> Hash256 {
        self(header)
    }
}

/// Double SHA-256 header hashing.
///
/// Not the chain's proof-of-work hash: the canonical genesis blocks do not
/// verify with it, so it is only useful for non-canonical test headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256dHasher;

impl HeaderHasher for Sha256dHasher {
    fn hash_header(&self, header: &[u8; HEADER_SIZE]) -> Hash256 {
        sha256d(header)
    }
}

/// Inputs that fully determine a genesis block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenesisSpec {
    /// Human readable text embedded in the coinbase input
    pub timestamp: &'static str,
    /// Coinbase output value
    pub reward: i64,
    /// Public key the coinbase output pays to
    pub output_pubkey: &'static [u8],
    /// Block version
    pub version: i32,
    /// Header timestamp
    pub time: u32,
    /// Header compact difficulty
    pub bits: u32,
    /// Header nonce
    pub nonce: u32,
}

/// Canonical values a built genesis block must reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenesisExpectation {
    /// Header hash
    pub hash: Hash256,
    /// Merkle root of the coinbase
    pub merkle_root: Hash256,
}

/// The single coinbase transaction of the genesis block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinbaseTransaction {
    /// Transaction version
    pub version: i32,
    /// Unlock script of the only input
    pub script_sig: Script,
    /// Input sequence number
    pub sequence: u32,
    /// Value of the only output
    pub value: i64,
    /// Lock script of the only output
    pub script_pubkey: Script,
    /// Transaction lock time
    pub lock_time: u32,
}

impl CoinbaseTransaction {
    fn from_spec(spec: &GenesisSpec) -> Self {
        Self {
            version: 1,
            script_sig: Script::new()
                .push_int(COINBASE_BITS_TAG)
                .push_num(COINBASE_EXTRA_NONCE)
                .push_slice(spec.timestamp.as_bytes()),
            sequence: u32::MAX,
            value: spec.reward,
            script_pubkey: Script::new()
                .push_slice(spec.output_pubkey)
                .push_opcode(OP_CHECKSIG),
            lock_time: 0,
        }
    }

    /// Consensus serialization
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.script_sig.len() + self.script_pubkey.len());
        out.extend_from_slice(&self.version.to_le_bytes());

        // Inputs: a single input spending the null outpoint
        write_compact_size(&mut out, 1);
        out.extend_from_slice(Hash256::ZERO.as_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        write_compact_size(&mut out, self.script_sig.len() as u64);
        out.extend_from_slice(self.script_sig.as_bytes());
        out.extend_from_slice(&self.sequence.to_le_bytes());

        write_compact_size(&mut out, 1);
        out.extend_from_slice(&self.value.to_le_bytes());
        write_compact_size(&mut out, self.script_pubkey.len() as u64);
        out.extend_from_slice(self.script_pubkey.as_bytes());

        out.extend_from_slice(&self.lock_time.to_le_bytes());
        out
    }

    /// Transaction id
    pub fn txid(&self) -> Hash256 {
        sha256d(&self.serialize())
    }
}

/// Genesis block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version
    pub version: i32,
    /// Previous block hash, all zero for genesis
    pub prev_block: Hash256,
    /// Merkle root of the block's transactions
    pub merkle_root: Hash256,
    /// Block timestamp
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    /// Nonce
    pub nonce: u32,
}

impl BlockHeader {
    /// Consensus serialization
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(self.prev_block.as_bytes());
        out[36..68].copy_from_slice(self.merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }
}

/// A fully constructed genesis block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisBlock {
    spec: GenesisSpec,
    header: BlockHeader,
    coinbase: CoinbaseTransaction,
    hash: Hash256,
}

impl GenesisBlock {
    /// Build the genesis block described by `spec`
    pub fn build(spec: GenesisSpec, hasher: &dyn HeaderHasher) -> Self {
        let coinbase = CoinbaseTransaction::from_spec(&spec);
        // A single transaction tree has the txid as its root
        let merkle_root = coinbase.txid();
        let header = BlockHeader {
            version: spec.version,
            prev_block: Hash256::ZERO,
            merkle_root,
            time: spec.time,
            bits: spec.bits,
            nonce: spec.nonce,
        };
        let hash = hasher.hash_header(&header.serialize());

        debug!(
            "Built genesis block {} (time={}, bits={:#010x}, nonce={})",
            hash, spec.time, spec.bits, spec.nonce
        );

        Self {
            spec,
            header,
            coinbase,
            hash,
        }
    }

    /// Check the block against its canonical values and difficulty limit
    pub fn verify(
        &self,
        network: NetworkId,
        expected: &GenesisExpectation,
        pow_limit: U256,
    ) -> Result<()> {
        if self.header.merkle_root != expected.merkle_root {
            return Err(Error::GenesisMerkleMismatch {
                network,
                expected: expected.merkle_root,
                computed: self.header.merkle_root,
            });
        }
        if self.hash != expected.hash {
            return Err(Error::GenesisHashMismatch {
                network,
                expected: expected.hash,
                computed: self.hash,
            });
        }

        let target = compact_to_target(self.header.bits)
            .filter(|target| !target.is_zero())
            .ok_or_else(|| Error::GenesisProofOfWork {
                network,
                reason: format!("bits {:#010x} do not encode a target", self.header.bits),
            })?;
        if target > pow_limit {
            return Err(Error::GenesisProofOfWork {
                network,
                reason: format!("bits {:#010x} exceed the proof-of-work limit", self.header.bits),
            });
        }
        if self.hash.to_u256() > target {
            return Err(Error::GenesisProofOfWork {
                network,
                reason: format!("hash {} above target", self.hash),
            });
        }
        Ok(())
    }

    /// Recompute the header hash from the stored fields
    pub fn recompute_hash(&self, hasher: &dyn HeaderHasher) -> Hash256 {
        hasher.hash_header(&self.header.serialize())
    }

    /// Recompute the merkle root from the stored coinbase
    pub fn recompute_merkle_root(&self) -> Hash256 {
        self.coinbase.txid()
    }

    /// Inputs the block was built from
    pub fn spec(&self) -> &GenesisSpec {
        &self.spec
    }

    /// Block header
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Coinbase transaction
    pub fn coinbase(&self) -> &CoinbaseTransaction {
        &self.coinbase
    }

    /// Header hash computed at build time
    pub fn hash(&self) -> Hash256 {
        self.hash
    }
}

fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}
