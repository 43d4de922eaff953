//! Control-channel negotiation protocol
//!
//! One fixed-size request in network byte order, answered by a single
//! status byte. Nonzero status codes name the server-side setup step that
//! failed, so the client can report the exact failure point.

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Wire length of a negotiation request.
pub const NEGOTIATION_LEN: usize = 10;

/// Experiment parameters sent once over the control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiation {
    /// Payload bytes per exchange round.
    pub payload_len: u32,
    /// Number of send/echo rounds.
    pub exchange_count: u32,
    /// Port the server must open for the experiment connection.
    pub experiment_port: u16,
}

impl Negotiation {
    /// Encode to wire format (network byte order).
    pub fn encode(&self) -> [u8; NEGOTIATION_LEN] {
        let mut buf = [0u8; NEGOTIATION_LEN];
        buf[0..4].copy_from_slice(&self.payload_len.to_be_bytes());
        buf[4..8].copy_from_slice(&self.exchange_count.to_be_bytes());
        buf[8..10].copy_from_slice(&self.experiment_port.to_be_bytes());
        buf
    }

    /// Decode from wire format.
    pub fn decode(buf: &[u8; NEGOTIATION_LEN]) -> Self {
        Self {
            payload_len: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            exchange_count: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            experiment_port: u16::from_be_bytes([buf[8], buf[9]]),
        }
    }
}

/// Status byte answering a negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NegStatus {
    Ok = 0,
    Socket = 1,
    Setsockopt = 2,
    Bind = 3,
    Listen = 4,
}

impl NegStatus {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(NegStatus::Ok),
            1 => Some(NegStatus::Socket),
            2 => Some(NegStatus::Setsockopt),
            3 => Some(NegStatus::Bind),
            4 => Some(NegStatus::Listen),
            _ => None,
        }
    }

    /// Name of the setup step this status reports on.
    pub fn label(&self) -> &'static str {
        match self {
            NegStatus::Ok => "ok",
            NegStatus::Socket => "socket",
            NegStatus::Setsockopt => "setsockopt",
            NegStatus::Bind => "bind",
            NegStatus::Listen => "listen",
        }
    }
}

pub async fn write_negotiation<W>(writer: &mut W, neg: &Negotiation) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(&neg.encode())
        .await
        .context("Failed to send negotiation")?;
    Ok(())
}

pub async fn read_negotiation<R>(reader: &mut R) -> Result<Negotiation>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; NEGOTIATION_LEN];
    reader
        .read_exact(&mut buf)
        .await
        .context("Failed to read negotiation")?;
    Ok(Negotiation::decode(&buf))
}

pub async fn write_status<W>(writer: &mut W, status: NegStatus) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(&[status as u8])
        .await
        .context("Failed to send negotiation status")?;
    Ok(())
}

pub async fn read_status<R>(reader: &mut R) -> Result<NegStatus>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .await
        .context("Failed to read negotiation status")?;
    NegStatus::from_raw(buf[0])
        .with_context(|| format!("Unknown negotiation status code {}", buf[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_network_byte_order() {
        let neg = Negotiation {
            payload_len: 1,
            exchange_count: 0x0102_0304,
            experiment_port: 5201,
        };
        let buf = neg.encode();
        assert_eq!(buf[0..4], [0, 0, 0, 1]);
        assert_eq!(buf[4..8], [1, 2, 3, 4]);
        assert_eq!(buf[8..10], 5201u16.to_be_bytes());
    }

    #[test]
    fn decode_inverts_encode() {
        let neg = Negotiation {
            payload_len: 4096,
            exchange_count: 100,
            experiment_port: 5201,
        };
        assert_eq!(Negotiation::decode(&neg.encode()), neg);
    }

    #[tokio::test]
    async fn negotiation_round_trips_over_a_stream() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let neg = Negotiation {
            payload_len: 512,
            exchange_count: 10,
            experiment_port: 9000,
        };
        write_negotiation(&mut client, &neg).await.unwrap();
        assert_eq!(read_negotiation(&mut server).await.unwrap(), neg);

        write_status(&mut server, NegStatus::Ok).await.unwrap();
        assert_eq!(read_status(&mut client).await.unwrap(), NegStatus::Ok);
    }

    #[tokio::test]
    async fn failure_status_survives_the_wire() {
        let (mut client, mut server) = tokio::io::duplex(8);
        write_status(&mut server, NegStatus::Bind).await.unwrap();
        let status = read_status(&mut client).await.unwrap();
        assert_eq!(status, NegStatus::Bind);
        assert_eq!(status.label(), "bind");
    }

    #[tokio::test]
    async fn unknown_status_code_is_rejected() {
        let (mut client, mut server) = tokio::io::duplex(8);
        server.write_all(&[9u8]).await.unwrap();
        let err = read_status(&mut client).await.unwrap_err();
        assert!(err.to_string().contains("status code 9"), "err: {err}");
    }
}
