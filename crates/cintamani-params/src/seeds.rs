//! Compiled-in bootstrap seeds.
//!
//! Fixed seeds are only used when DNS seeding yields nothing. A node will
//! connect to one or two of them and then learn a pile of addresses with
//! newer timestamps, so the seeds are given a "last seen" time between one
//! and two weeks ago.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// One week in seconds
pub const ONE_WEEK: i64 = 7 * 24 * 60 * 60;

/// Service bit advertising a full node
pub const NODE_NETWORK: u64 = 1;

/// A compiled-in seed: IPv6 (or IPv4-mapped) address and port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedSpec6 {
    /// Address in network byte order
    pub addr: [u8; 16],
    /// TCP port
    pub port: u16,
}

impl SeedSpec6 {
    /// Create a seed entry
    pub const fn new(addr: [u8; 16], port: u16) -> Self {
        Self { addr, port }
    }
}

/// A peer address record handed to the bootstrap layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetAddress {
    /// Peer address
    pub ip: Ipv6Addr,
    /// Peer port
    pub port: u16,
    /// Advertised services
    pub services: u64,
    /// Last seen time (Unix seconds)
    pub time: i64,
}

impl NetAddress {
    /// Socket address, unmapping IPv4-mapped addresses
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = match self.ip.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(self.ip),
        };
        SocketAddr::new(ip, self.port)
    }
}

/// Convert a seed table into address records with randomized "last seen" times.
///
/// Every record's time lies strictly between `now - 2 weeks` and
/// `now - 1 week`.
pub fn convert_seed6<R: Rng + ?Sized>(table: &[SeedSpec6], now: i64, rng: &mut R) -> Vec<NetAddress> {
    let addresses: Vec<NetAddress> = table
        .iter()
        .map(|seed| NetAddress {
            ip: Ipv6Addr::from(seed.addr),
            port: seed.port,
            services: NODE_NETWORK,
            time: now - ONE_WEEK - rng.gen_range(1..ONE_WEEK),
        })
        .collect();
    debug!("Converted {} fixed seeds", addresses.len());
    addresses
}

const fn ipv4_mapped(a: u8, b: u8, c: u8, d: u8) -> [u8; 16] {
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, a, b, c, d]
}

/// Main network fixed seeds
pub static MAIN_SEEDS: &[SeedSpec6] = &[SeedSpec6::new(ipv4_mapped(18, 191, 138, 58), 1993)];

/// Test network fixed seeds
pub static TESTNET_SEEDS: &[SeedSpec6] = &[SeedSpec6::new(ipv4_mapped(18, 191, 138, 58), 11993)];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::net::Ipv4Addr;

    #[test]
    fn test_convert_preserves_order_and_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = 1_700_000_000;
        let converted = convert_seed6(MAIN_SEEDS, now, &mut rng);

        assert_eq!(converted.len(), MAIN_SEEDS.len());
        for (seed, addr) in MAIN_SEEDS.iter().zip(&converted) {
            assert_eq!(addr.ip.octets(), seed.addr);
            assert_eq!(addr.port, seed.port);
            assert_eq!(addr.services, NODE_NETWORK);
            assert!(addr.time > now - 2 * ONE_WEEK);
            assert!(addr.time < now - ONE_WEEK);
        }
    }

    #[test]
    fn test_empty_table() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(convert_seed6(&[], 0, &mut rng).is_empty());
    }

    #[test]
    fn test_socket_addr_unmaps_ipv4() {
        let mut rng = StdRng::seed_from_u64(3);
        let converted = convert_seed6(TESTNET_SEEDS, 1_000_000_000, &mut rng);
        assert_eq!(
            converted[0].socket_addr(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(18, 191, 138, 58)), 11993)
        );

        let v6 = NetAddress {
            ip: Ipv6Addr::LOCALHOST,
            port: 1993,
            services: NODE_NETWORK,
            time: 0,
        };
        assert!(v6.socket_addr().is_ipv6());
    }
}
