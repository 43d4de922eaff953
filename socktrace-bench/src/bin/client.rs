//! bench-client - benchmark timing client entry point
//!
//! Usage:
//!   bench-client --addr 10.0.0.2 --port 4000 --experiment-port 5201 \
//!       --size 4096 --count 1000 --output timings.csv

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use socktrace_bench::{run_client, ClientConfig};

/// Payload round-trip client with per-round timing output
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Server address
    #[clap(long)]
    addr: IpAddr,

    /// Server control port (1-65535)
    #[clap(long, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Port the server should open for the experiment (1-65535)
    #[clap(long, value_parser = clap::value_parser!(u16).range(1..))]
    experiment_port: u16,

    /// Payload size in bytes per exchange
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Number of exchanges
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// CSV output file for per-round timestamps
    #[clap(long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = ClientConfig {
        payload_len: args.size,
        exchange_count: args.count,
        experiment_port: args.experiment_port,
        output: args.output,
    };
    run_client(SocketAddr::new(args.addr, args.port), &config).await
}
