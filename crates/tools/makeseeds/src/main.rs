//! Fixed seed list maintenance tool
//!
//! - `filter` reduces a DNS seeder dump to reliable IPv4 peers
//! - `generate` turns an address list into a seed table for the params crate

use std::collections::HashMap;
use std::io::Read;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cintamani_params::seedgen::{render_seed_table, select_seeds, SeedPolicy};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "makeseeds")]
#[command(about = "Cintamani fixed seed list tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a seeder dump (file or stdin) down to good seeds
    Filter {
        /// Seeder dump, stdin when omitted
        input: Option<PathBuf>,

        /// File of `ip asn` lines used for the per-ASN limit
        #[arg(short, long)]
        asn_map: Option<PathBuf>,

        /// Port seeds must listen on
        #[arg(short, long, default_value = "1993")]
        port: u16,

        /// Maximum number of seeds
        #[arg(short, long, default_value = "512")]
        max_seeds: usize,
    },

    /// Render an address list as a seed table
    Generate {
        /// Name of the generated static
        #[arg(short, long, default_value = "MAIN_SEEDS")]
        name: String,

        /// Port used for addresses without one
        #[arg(short, long, default_value = "1993")]
        port: u16,

        /// Address list, one `ip[:port]` per line
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            input,
            asn_map,
            port,
            max_seeds,
        } => run_filter(input.as_deref(), asn_map.as_deref(), port, max_seeds),
        Commands::Generate { name, port, file } => run_generate(&name, port, &file),
    }
}

fn run_filter(
    input: Option<&Path>,
    asn_map: Option<&Path>,
    port: u16,
    max_seeds: usize,
) -> anyhow::Result<()> {
    let dump = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let asns = match asn_map {
        Some(path) => Some(load_asn_map(path)?),
        None => {
            warn!("No ASN map given; every address counts as its own ASN");
            None
        }
    };
    let lookup = |ip: Ipv4Addr| match &asns {
        Some(map) => map.get(&ip).copied(),
        None => Some(u32::from(ip)),
    };

    let policy = SeedPolicy {
        port,
        max_seeds,
        ..SeedPolicy::default()
    };
    let seeds = select_seeds(dump.lines(), lookup, &policy)?;
    info!("Selected {} seeds", seeds.len());

    for seed in seeds {
        println!("{}", seed.ip);
    }
    Ok(())
}

fn load_asn_map(path: &Path) -> anyhow::Result<HashMap<Ipv4Addr, u32>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut map = HashMap::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(ip), Some(asn)) = (fields.next(), fields.next()) else {
            anyhow::bail!("{}:{}: expected `ip asn`", path.display(), number + 1);
        };
        let ip: Ipv4Addr = ip
            .parse()
            .with_context(|| format!("{}:{}: bad address", path.display(), number + 1))?;
        let asn: u32 = asn
            .trim_start_matches("AS")
            .parse()
            .with_context(|| format!("{}:{}: bad ASN", path.display(), number + 1))?;
        map.insert(ip, asn);
    }
    info!("Loaded {} ASN entries", map.len());
    Ok(map)
}

fn run_generate(name: &str, port: u16, file: &Path) -> anyhow::Result<()> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let table = render_seed_table(name, contents.lines(), port)?;
    print!("{table}");
    Ok(())
}
