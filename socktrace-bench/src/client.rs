//! Benchmark timing client
//!
//! Negotiates an experiment, runs payload round-trips against the echo
//! server, and writes one CSV row of wall-clock microsecond timestamps
//! per round. Rows line up with the kernel-side event stream by port and
//! time range during analysis.

use std::fs::File;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use log::info;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::proto::{self, NegStatus, Negotiation};

/// Byte value the payload is filled with.
const PAYLOAD_FILL: u8 = b'P';

/// Client-side experiment parameters.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub payload_len: u32,
    pub exchange_count: u32,
    pub experiment_port: u16,
    pub output: PathBuf,
}

/// Run one experiment against the server's control address.
pub async fn run_client(control_addr: SocketAddr, config: &ClientConfig) -> Result<()> {
    let mut control = TcpStream::connect(control_addr)
        .await
        .with_context(|| format!("Failed to connect to control address {}", control_addr))?;

    let neg = Negotiation {
        payload_len: config.payload_len,
        exchange_count: config.exchange_count,
        experiment_port: config.experiment_port,
    };
    proto::write_negotiation(&mut control, &neg).await?;
    let status = proto::read_status(&mut control).await?;
    ensure!(
        status == NegStatus::Ok,
        "Server failed experiment setup at {} step",
        status.label()
    );

    let exp_addr = SocketAddr::new(control_addr.ip(), config.experiment_port);
    let mut exp = TcpStream::connect(exp_addr)
        .await
        .with_context(|| format!("Failed to connect to experiment address {}", exp_addr))?;

    let mut csv = File::create(&config.output)
        .with_context(|| format!("Failed to create output file: {:?}", config.output))?;
    writeln!(csv, "seq,send_entry_us,send_exit_us,recv_entry_us")?;

    let mut payload = vec![PAYLOAD_FILL; config.payload_len as usize];
    info!(
        "Running {} exchanges of {} bytes against {}",
        config.exchange_count, config.payload_len, exp_addr
    );

    for seq in 0..config.exchange_count {
        let send_entry = unix_micros();
        exp.write_all(&payload)
            .await
            .context("Failed to send payload")?;
        let send_exit = unix_micros();
        exp.read_exact(&mut payload)
            .await
            .context("Failed to receive echoed payload")?;
        let recv_entry = unix_micros();
        writeln!(csv, "{},{},{},{}", seq, send_entry, send_exit, recv_entry)?;
    }

    info!("Wrote {:?}", config.output);
    Ok(())
}

/// Wall clock in microseconds since the Unix epoch.
fn unix_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_micros() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server;
    use tokio::net::TcpListener;

    /// Bind an ephemeral port and release it so the server can claim it a
    /// moment later.
    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn loopback_session_writes_ordered_csv() {
        let control = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let control_addr = control.local_addr().unwrap();
        let server_task = tokio::spawn(async move { server::serve(control).await });

        let config = ClientConfig {
            payload_len: 64,
            exchange_count: 5,
            experiment_port: free_port(),
            output: std::env::temp_dir().join(format!(
                "socktrace-bench-test-{}.csv",
                std::process::id()
            )),
        };
        run_client(control_addr, &config).await.unwrap();
        server_task.await.unwrap().unwrap();

        let csv = std::fs::read_to_string(&config.output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "seq,send_entry_us,send_exit_us,recv_entry_us");
        assert_eq!(lines.len(), 6);
        for (i, line) in lines[1..].iter().enumerate() {
            let cols: Vec<u64> = line.split(',').map(|c| c.parse().unwrap()).collect();
            assert_eq!(cols.len(), 4);
            assert_eq!(cols[0], i as u64);
            assert!(cols[1] <= cols[2], "send timestamps out of order: {line}");
            assert!(cols[2] <= cols[3], "recv before send completed: {line}");
        }
        std::fs::remove_file(&config.output).ok();
    }
}
