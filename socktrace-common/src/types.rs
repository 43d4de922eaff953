//! Shared data structures between kernel and userspace
//!
//! The event record must be repr(C) so the kernel programs and the userspace
//! daemon see an identical memory layout on both sides of the ring buffer.

/// One observed TCP operation transition
///
/// Written by the kernel probes into the ring buffer and decoded by the
/// userspace consumer. Exactly 64 bytes; the layout is compile-time checked
/// below. Ports are host byte order at rest; the address words are raw
/// network-order 32-bit words (word 0 carries the IPv4 address, all four
/// words carry IPv6).
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct SockEvent {
    /// Monotonic kernel clock at capture time (nanoseconds)
    pub timestamp_ns: u64,
    /// Raw identity of the kernel socket object.
    ///
    /// Ephemeral identity, reused after deallocation: valid only as a
    /// correlation key within one capture session, never as a persistent
    /// socket handle.
    pub sock_id: u64,
    /// PID (thread-group id) of the process driving the operation
    pub pid: u32,
    /// Smoothed round-trip time in microseconds, 0 if unavailable
    pub srtt_us: u32,
    /// Local address words (network byte order)
    pub local_addr: [u32; 4],
    /// Remote address words (network byte order)
    pub remote_addr: [u32; 4],
    /// Local port, host byte order
    pub sport: u16,
    /// Remote port, host byte order
    pub dport: u16,
    /// Raw address family (AF_INET, AF_INET6, anything else is unknown)
    pub family: u16,
    /// Which transition fired (see EVENT_TYPE_* constants)
    pub event_type: u8,
    /// Explicit tail padding
    pub _pad: u8,
}

// Compile-time layout checks
// These will fail to compile if the wire contract drifts
const _: () = {
    assert!(core::mem::size_of::<SockEvent>() == 64);
    assert!(core::mem::align_of::<SockEvent>() == 8);
    assert!(core::mem::offset_of!(SockEvent, timestamp_ns) == 0);
    assert!(core::mem::offset_of!(SockEvent, sock_id) == 8);
    assert!(core::mem::offset_of!(SockEvent, pid) == 16);
    assert!(core::mem::offset_of!(SockEvent, srtt_us) == 20);
    assert!(core::mem::offset_of!(SockEvent, local_addr) == 24);
    assert!(core::mem::offset_of!(SockEvent, remote_addr) == 40);
    assert!(core::mem::offset_of!(SockEvent, sport) == 56);
    assert!(core::mem::offset_of!(SockEvent, dport) == 58);
    assert!(core::mem::offset_of!(SockEvent, family) == 60);
    assert!(core::mem::offset_of!(SockEvent, event_type) == 62);
};

// Implement Aya's Pod trait for userspace usage
#[cfg(feature = "userspace")]
mod userspace_impls {
    use super::*;

    // Pod marks the record safe to reinterpret from raw ring buffer bytes
    unsafe impl aya::Pod for SockEvent {}
}
