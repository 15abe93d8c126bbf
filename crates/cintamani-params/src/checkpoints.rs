//! Blockchain checkpoints
//!
//! What makes a good checkpoint block: it is surrounded by blocks with
//! reasonable timestamps and contains no unusual transactions.

use serde::Serialize;

use crate::hash::Hash256;
use crate::network::NetworkId;
use crate::{Error, Result};

/// A blockchain checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    /// Block height
    pub height: u32,
    /// Expected block hash
    pub hash: Hash256,
}

/// Checkpoints of one network plus sync progress statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointData {
    checkpoints: &'static [Checkpoint],
    /// Unix timestamp of the last checkpoint block
    pub last_checkpoint_time: i64,
    /// Transactions between genesis and the last checkpoint
    pub transactions_to_last_checkpoint: u64,
    /// Estimated transactions per day after the last checkpoint
    pub transactions_per_day: f64,
}

impl CheckpointData {
    /// Create checkpoint data from a height-ordered table
    pub const fn new(
        checkpoints: &'static [Checkpoint],
        last_checkpoint_time: i64,
        transactions_to_last_checkpoint: u64,
        transactions_per_day: f64,
    ) -> Self {
        Self {
            checkpoints,
            last_checkpoint_time,
            transactions_to_last_checkpoint,
            transactions_per_day,
        }
    }

    /// Check ordering and that height 0 is the genesis block
    pub fn validate(&self, network: NetworkId, genesis: Hash256) -> Result<()> {
        for pair in self.checkpoints.windows(2) {
            if pair[1].height <= pair[0].height {
                return Err(Error::CheckpointOrder {
                    network,
                    height: pair[1].height,
                });
            }
        }
        match self.get(0) {
            Some(hash) if hash == genesis => Ok(()),
            _ => Err(Error::CheckpointGenesisMismatch { network, genesis }),
        }
    }

    /// Expected hash at exactly `height`
    pub fn get(&self, height: u32) -> Option<Hash256> {
        self.checkpoints
            .binary_search_by_key(&height, |cp| cp.height)
            .ok()
            .map(|index| self.checkpoints[index].hash)
    }

    /// Get all checkpoints
    pub fn checkpoints(&self) -> &'static [Checkpoint] {
        self.checkpoints
    }

    /// Checkpointed heights in ascending order
    pub fn heights(&self) -> impl Iterator<Item = u32> + '_ {
        self.checkpoints.iter().map(|cp| cp.height)
    }

    /// Get latest checkpoint
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Get checkpoint count
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: Hash256 = Hash256::from_display_hex(
        "000004682c5b4dfe735ca02ba9ecb2817ea7cd4822f785a5ad0bf04f357d21c6",
    );
    const OTHER: Hash256 = Hash256::from_display_hex(
        "00000ff9e72fe256798843c62c51ec73bdcdc26d1651fd07f151d20ca48db45f",
    );

    static ORDERED: [Checkpoint; 3] = [
        Checkpoint { height: 0, hash: GENESIS },
        Checkpoint { height: 500, hash: OTHER },
        Checkpoint { height: 1_000, hash: OTHER },
    ];

    static UNORDERED: [Checkpoint; 3] = [
        Checkpoint { height: 0, hash: GENESIS },
        Checkpoint { height: 1_000, hash: OTHER },
        Checkpoint { height: 1_000, hash: OTHER },
    ];

    static NO_GENESIS: [Checkpoint; 1] = [Checkpoint { height: 10, hash: OTHER }];

    #[test]
    fn test_checkpoint_lookup() {
        let data = CheckpointData::new(&ORDERED, 1_560_805_200, 0, 2_800.0);
        assert_eq!(data.get(0), Some(GENESIS));
        assert_eq!(data.get(500), Some(OTHER));
        assert_eq!(data.get(501), None);
        assert_eq!(data.latest().unwrap().height, 1_000);
        assert_eq!(data.heights().collect::<Vec<_>>(), vec![0, 500, 1_000]);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_validate_accepts_ordered_table() {
        let data = CheckpointData::new(&ORDERED, 0, 0, 0.0);
        assert!(data.validate(NetworkId::Main, GENESIS).is_ok());
    }

    #[test]
    fn test_validate_rejects_repeated_height() {
        let data = CheckpointData::new(&UNORDERED, 0, 0, 0.0);
        assert!(matches!(
            data.validate(NetworkId::Main, GENESIS),
            Err(Error::CheckpointOrder { height: 1_000, .. })
        ));
    }

    #[test]
    fn test_validate_requires_genesis_checkpoint() {
        let data = CheckpointData::new(&NO_GENESIS, 0, 0, 0.0);
        assert!(matches!(
            data.validate(NetworkId::Testnet, GENESIS),
            Err(Error::CheckpointGenesisMismatch { .. })
        ));

        let data = CheckpointData::new(&ORDERED, 0, 0, 0.0);
        assert!(data.validate(NetworkId::Testnet, OTHER).is_err());
    }
}
