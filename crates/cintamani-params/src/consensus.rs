//! Consensus parameters for Cintamani

use primitive_types::U256;
use serde::Serialize;

/// Block version majority thresholds over a sliding window of recent blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MajorityThresholds {
    /// Blocks in the window that must signal before new-version rules are enforced
    pub enforce_upgrade: u32,
    /// Blocks in the window that must signal before outdated versions are rejected
    pub reject_outdated: u32,
    /// Number of recent blocks examined
    pub window: u32,
}

/// Consensus parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusParams {
    /// Easiest allowed proof-of-work target
    pub pow_limit: U256,
    /// Block subsidy reduction interval
    pub subsidy_halving_interval: u32,
    /// Version upgrade voting thresholds
    pub majority: MajorityThresholds,
    /// Difficulty retarget period in seconds
    pub target_timespan: i64,
    /// Desired time between blocks in seconds
    pub target_spacing: i64,
}

impl ConsensusParams {
    /// Number of blocks between difficulty retargets
    pub fn retarget_interval(&self) -> i64 {
        self.target_timespan / self.target_spacing
    }

    /// Check that `bits` decodes to a target no easier than the network limit
    pub fn bits_within_limit(&self, bits: u32) -> bool {
        match compact_to_target(bits) {
            Some(target) => !target.is_zero() && target <= self.pow_limit,
            None => false,
        }
    }
}

/// Decode a compact difficulty encoding into a full target.
///
/// Returns `None` for negative or overflowing encodings.
pub fn compact_to_target(bits: u32) -> Option<U256> {
    let size = bits >> 24;
    let mut word = bits & 0x007f_ffff;
    if bits & 0x0080_0000 != 0 && word != 0 {
        return None;
    }
    if word == 0 {
        return Some(U256::zero());
    }

    let value = if size <= 3 {
        word >>= 8 * (3 - size);
        U256::from(word)
    } else {
        if size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32) {
            return None;
        }
        U256::from(word) << (8 * (size - 3))
    };

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConsensusParams {
        ConsensusParams {
            pow_limit: U256::max_value() >> 20u32,
            subsidy_halving_interval: 210_000,
            majority: MajorityThresholds {
                enforce_upgrade: 750,
                reject_outdated: 950,
                window: 1000,
            },
            target_timespan: 24 * 60 * 60,
            target_spacing: 150,
        }
    }

    #[test]
    fn test_retarget_interval() {
        assert_eq!(params().retarget_interval(), 576);
    }

    #[test]
    fn test_compact_to_target() {
        let target = compact_to_target(0x1e0f_fff0).unwrap();
        assert_eq!(target, U256::from(0x0f_fff0u32) << (8 * 27u32));

        let regtest = compact_to_target(0x207f_ffff).unwrap();
        assert_eq!(regtest, U256::from(0x7f_ffffu32) << (8 * 29u32));

        assert_eq!(compact_to_target(0x0300_0001).unwrap(), U256::one());
        assert!(compact_to_target(0x0480_0001).is_none());
        assert!(compact_to_target(0xff12_3456).is_none());
    }

    #[test]
    fn test_bits_within_limit() {
        let params = params();
        assert!(params.bits_within_limit(0x1e0f_fff0));
        assert!(!params.bits_within_limit(0x207f_ffff));
        assert!(!params.bits_within_limit(0));
    }
}
