//! Shared constants for the socktrace probes
//!
//! Used by both the kernel programs and the userspace daemon to keep the
//! wire contract and map sizing in one place.

// ============================================================================
// Event Types (for SockEvent.event_type)
// ============================================================================

/// Send operation began (fentry/tcp_sendmsg)
pub const EVENT_TYPE_SEND_ENTRY: u8 = 1;

/// Inbound segment processed on an established connection (fentry/tcp_rcv_established)
pub const EVENT_TYPE_RECV_ENTRY: u8 = 2;

/// Send operation completed (fexit/tcp_sendmsg)
pub const EVENT_TYPE_SEND_EXIT: u8 = 3;

/// Receive returned data to its caller (fexit/tcp_recvmsg)
pub const EVENT_TYPE_RECV_EXIT: u8 = 4;

// ============================================================================
// Address Families (from linux/socket.h)
// ============================================================================

/// Unspecified address family
pub const AF_UNSPEC: u16 = 0;

/// IPv4
pub const AF_INET: u16 = 2;

/// IPv6
pub const AF_INET6: u16 = 10;

/// Number of 32-bit words in an IPv6 address
pub const ADDR_V6_WORDS: usize = 4;

// ============================================================================
// Ring Transport
// ============================================================================

/// Ring buffer capacity in bytes (16 MiB)
///
/// Once exhausted, reservations fail and events are silently dropped until
/// the consumer frees space.
pub const EVENT_RING_BYTES: u32 = 16 * 1024 * 1024;

// ============================================================================
// Config Map Keys
// ============================================================================

/// Key in the SRTT_OFFSET map holding the byte offset of the smoothed-RTT
/// field inside the kernel TCP socket struct. Value 0 disables the read.
pub const SRTT_OFFSET_KEY: u32 = 0;
