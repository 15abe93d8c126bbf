//! Fixed seed list maintenance.
//!
//! Turns a DNS seeder dump into a short list of reliable IPv4 peers, and
//! renders an address list into a [`SeedSpec6`](crate::SeedSpec6) table
//! that can be pasted into [`seeds`](crate::seeds).

use std::collections::HashMap;
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Maximum number of seeds kept
pub const NSEEDS: usize = 512;

/// Maximum number of seeds kept per autonomous system
pub const MAX_SEEDS_PER_ASN: usize = 2;

/// Minimum chain height a node must report
pub const MIN_BLOCKS: u64 = 200_000;

/// Hosts observed behaving strangely, such as connecting to every node
pub const SUSPICIOUS_HOSTS: [Ipv4Addr; 4] = [
    Ipv4Addr::new(18, 218, 20, 171),
    Ipv4Addr::new(18, 191, 141, 168),
    Ipv4Addr::new(10, 211, 55, 7),
    Ipv4Addr::new(127, 0, 0, 1),
];

static KNOWN_AGENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(/Satoshi:0\.8\.6/|/Satoshi:0\.9\.(2|3)/|/Core:0\.1(0|1|2)\.\d{1,2}\.\d{1,2}/)$")
        .expect("agent pattern is valid")
});

/// One node from a seeder dump
#[derive(Debug, Clone, PartialEq)]
pub struct SeederEntry {
    /// Node address
    pub ip: Ipv4Addr,
    /// Unix time of the last successful connection
    pub last_success: i64,
    /// 30-day uptime percentage
    pub uptime30: f64,
    /// Reported chain height
    pub blocks: u64,
    /// Advertised service bits
    pub services: u64,
    /// Protocol version
    pub version: u32,
    /// User agent without the surrounding quotes
    pub agent: String,
}

/// Filtering thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPolicy {
    /// Port nodes must listen on
    pub port: u16,
    /// Global limit
    pub max_seeds: usize,
    /// Per-ASN limit
    pub max_per_asn: usize,
    /// Minimum reported height
    pub min_blocks: u64,
    /// 30-day uptime must exceed this percentage
    pub min_uptime: f64,
    /// Hosts that are always dropped
    pub suspicious_hosts: Vec<Ipv4Addr>,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            port: 1993,
            max_seeds: NSEEDS,
            max_per_asn: MAX_SEEDS_PER_ASN,
            min_blocks: MIN_BLOCKS,
            min_uptime: 50.0,
            suspicious_hosts: SUSPICIOUS_HOSTS.to_vec(),
        }
    }
}

/// Parse one seeder dump line.
///
/// Returns `Ok(None)` for lines that are not candidates: comments, short
/// lines, non-IPv4 addresses, other ports, the unspecified address and nodes
/// the seeder flags as bad. Malformed numeric columns are errors.
pub fn parse_seeder_line(line: &str, port: u16) -> Result<Option<SeederEntry>> {
    let line = line.trim();
    if line.starts_with('#') {
        return Ok(None);
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 12 {
        return Ok(None);
    }

    let Ok(addr) = fields[0].parse::<SocketAddr>() else {
        return Ok(None);
    };
    let ip = match addr.ip() {
        IpAddr::V4(ip) if addr.port() == port && !ip.is_unspecified() => ip,
        _ => return Ok(None),
    };
    if fields[1] == "0" {
        return Ok(None);
    }

    let uptime = fields[7].trim_end_matches('%');
    let agent = fields[11].trim_matches('"');

    Ok(Some(SeederEntry {
        ip,
        last_success: parse_field(fields[2], "last success")?,
        uptime30: parse_field(uptime, "uptime")?,
        blocks: parse_field(fields[8], "blocks")?,
        services: u64::from_str_radix(fields[9], 16)
            .map_err(|_| Error::InvalidSeed(format!("bad services {:?}", fields[9])))?,
        version: parse_field(fields[10], "version")?,
        agent: agent.to_string(),
    }))
}

fn parse_field<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidSeed(format!("bad {what} {value:?}")))
}

/// Whether a user agent belongs to a known, recent client
pub fn is_known_agent(agent: &str) -> bool {
    KNOWN_AGENT.is_match(agent)
}

/// Select seeds from a seeder dump.
///
/// Applies the policy filters, ranks by uptime then last success, caps the
/// result per ASN and globally, and returns the survivors sorted by address.
/// Nodes whose ASN cannot be resolved are skipped.
pub fn select_seeds<'a, I, F>(lines: I, asn_lookup: F, policy: &SeedPolicy) -> Result<Vec<SeederEntry>>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(Ipv4Addr) -> Option<u32>,
{
    let mut candidates = Vec::new();
    for line in lines {
        if let Some(entry) = parse_seeder_line(line, policy.port)? {
            candidates.push(entry);
        }
    }
    let parsed = candidates.len();

    candidates.retain(|entry| {
        !policy.suspicious_hosts.contains(&entry.ip)
            && entry.blocks >= policy.min_blocks
            && entry.services & 1 == 1
            && entry.uptime30 > policy.min_uptime
            && is_known_agent(&entry.agent)
    });
    candidates.sort_by(|a, b| {
        b.uptime30
            .total_cmp(&a.uptime30)
            .then(b.last_success.cmp(&a.last_success))
            .then(b.ip.cmp(&a.ip))
    });

    let mut selected = Vec::new();
    let mut per_asn: HashMap<u32, usize> = HashMap::new();
    for entry in candidates {
        if selected.len() == policy.max_seeds {
            break;
        }
        let Some(asn) = asn_lookup(entry.ip) else {
            warn!("Could not resolve ASN for {}", entry.ip);
            continue;
        };
        let count = per_asn.entry(asn).or_default();
        if *count == policy.max_per_asn {
            continue;
        }
        *count += 1;
        selected.push(entry);
    }
    selected.sort_by_key(|entry| entry.ip);

    debug!("Selected {} of {} seeder entries", selected.len(), parsed);
    Ok(selected)
}

/// Parse `ip`, `ip:port`, `[ipv6]:port` or bare IPv6, using `default_port`
/// when none is given
pub fn parse_seed_address(input: &str, default_port: u16) -> Result<SocketAddr> {
    let input = input.trim();
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    input
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, default_port))
        .map_err(|_| Error::InvalidSeed(format!("cannot parse address {input:?}")))
}

/// Render address lines as a Rust seed table.
///
/// Blank lines and `#` comments are skipped; IPv4 addresses are written
/// IPv4-mapped.
pub fn render_seed_table<'a, I>(name: &str, lines: I, default_port: u16) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    writeln!(out, "pub static {name}: &[SeedSpec6] = &[").ok();
    for line in lines {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let addr = parse_seed_address(line, default_port)?;
        let octets = match addr.ip() {
            IpAddr::V4(ip) => ip.to_ipv6_mapped().octets(),
            IpAddr::V6(ip) => ip.octets(),
        };
        let bytes: Vec<String> = octets.iter().map(|b| format!("0x{b:02x}")).collect();
        writeln!(
            out,
            "    SeedSpec6::new([{}], {}),",
            bytes.join(", "),
            addr.port()
        )
        .ok();
    }
    out.push_str("];\n");
    Ok(out)
}
