//! Benchmark echo server
//!
//! Serves one session: accept a control connection, read the negotiation,
//! open the experiment listener on the requested port, then echo payload
//! on the experiment connection until the client hangs up.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use crate::proto::{self, NegStatus};

/// Read buffer for the echo loop.
const ECHO_BUF_BYTES: usize = 64 * 1024;

/// Serve one complete benchmark session on `control`.
pub async fn serve(control: TcpListener) -> Result<()> {
    let (mut conn, peer) = control
        .accept()
        .await
        .context("Failed to accept control connection")?;
    info!("Client connected from {}", peer);

    let neg = proto::read_negotiation(&mut conn).await?;
    info!(
        "Negotiated: {} bytes x {} exchanges, experiment port {}",
        neg.payload_len, neg.exchange_count, neg.experiment_port
    );

    let listener = match experiment_listener(neg.experiment_port) {
        Ok(listener) => {
            proto::write_status(&mut conn, NegStatus::Ok).await?;
            listener
        }
        Err(status) => {
            // Report the failing step before giving up so the client can
            // print it instead of a bare connection reset.
            proto::write_status(&mut conn, status).await?;
            bail!("Experiment listener setup failed at {} step", status.label());
        }
    };

    let (mut exp, exp_peer) = listener
        .accept()
        .await
        .context("Failed to accept experiment connection")?;
    info!("Experiment connection from {}", exp_peer);

    echo(&mut exp).await?;
    info!("Experiment finished");
    Ok(())
}

/// Build the experiment listener step by step so every failure maps to
/// its negotiation status code.
fn experiment_listener(port: u16) -> std::result::Result<TcpListener, NegStatus> {
    let socket = TcpSocket::new_v4().map_err(|_| NegStatus::Socket)?;
    socket.set_reuseaddr(true).map_err(|_| NegStatus::Setsockopt)?;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    socket.bind(addr).map_err(|_| NegStatus::Bind)?;
    socket.listen(1).map_err(|_| NegStatus::Listen)
}

/// Echo everything back until EOF.
async fn echo(stream: &mut TcpStream) -> Result<()> {
    let mut buf = vec![0u8; ECHO_BUF_BYTES];
    loop {
        let n = stream
            .read(&mut buf)
            .await
            .context("Failed to read payload")?;
        if n == 0 {
            return Ok(());
        }
        stream
            .write_all(&buf[..n])
            .await
            .context("Failed to echo payload")?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_setup_reports_the_bind_step() {
        // Hold the port so the experiment listener cannot bind it.
        let holder = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = holder.local_addr().unwrap().port();
        match experiment_listener(port) {
            Err(NegStatus::Bind) => {}
            other => panic!("expected bind failure, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn listener_setup_succeeds_on_a_free_port() {
        let listener = experiment_listener(0).expect("ephemeral bind should succeed");
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
