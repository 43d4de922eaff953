//! BPF map definitions for the socktrace probes
//!
//! Defines the ring buffer carrying events to userspace and the config map
//! userspace writes before attaching.

use aya_ebpf::{
    macros::map,
    maps::{HashMap, RingBuf},
};
use socktrace_common::constants::EVENT_RING_BYTES;

/// Ring buffer carrying SockEvent records to userspace
///
/// Reservation can fail once the ring is full; the producers then drop the
/// event silently rather than stall the instrumented kernel path.
#[map]
pub static EVENTS: RingBuf = RingBuf::with_byte_size(EVENT_RING_BYTES, 0);

/// Byte offset of srtt_us inside the kernel TCP socket struct
///
/// Key: SRTT_OFFSET_KEY
/// Value: offset in bytes, 0 = srtt read disabled
///
/// Written once by the daemon before attachment. The offset is kernel
/// version dependent, so it is supplied from userspace instead of being
/// hardcoded here.
#[map]
pub static SRTT_OFFSET: HashMap<u32, u32> = HashMap::with_max_entries(1, 0);
