//! bench-server - benchmark echo server entry point
//!
//! Usage:
//!   bench-server --port 4000

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

/// Echo server for payload round-trip experiments
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Control port to listen on (1-65535)
    #[clap(long, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let listener = TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind control port {}", args.port))?;
    info!("Listening on control port {}", args.port);

    socktrace_bench::serve(listener).await
}
