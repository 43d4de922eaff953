//! Probe handlers for TCP send/receive tracing
//!
//! The four entry points attach to the kernel's TCP send and receive paths
//! and emit one event record per observed transition. Handlers are stateless
//! and reentrant; all cross-core coordination lives in the ring buffer map.

use aya_ebpf::{
    macros::{fentry, fexit},
    programs::{FEntryContext, FExitContext},
};
use core::ptr::{addr_of_mut, write};
use socktrace_common::{constants::*, SockEvent};

use crate::{helpers::*, maps::*, socket_parser::*};

/// Send operation begins
///
/// Attached to: fentry/tcp_sendmsg
#[fentry(function = "tcp_sendmsg")]
pub fn tcp_send_entry(ctx: FEntryContext) -> u32 {
    let sk: *const sock = unsafe { ctx.arg(0) };
    emit_sock_event(sk, EVENT_TYPE_SEND_ENTRY);
    0
}

/// Send operation completes
///
/// Attached to: fexit/tcp_sendmsg
#[fexit(function = "tcp_sendmsg")]
pub fn tcp_send_exit(ctx: FExitContext) -> u32 {
    let sk: *const sock = unsafe { ctx.arg(0) };
    emit_sock_event(sk, EVENT_TYPE_SEND_EXIT);
    0
}

/// Inbound segment processed on an established connection
///
/// Attached to: fentry/tcp_rcv_established
#[fentry(function = "tcp_rcv_established")]
pub fn tcp_recv_entry(ctx: FEntryContext) -> u32 {
    let sk: *const sock = unsafe { ctx.arg(0) };
    emit_sock_event(sk, EVENT_TYPE_RECV_ENTRY);
    0
}

/// Receive returns data to its caller
///
/// Attached to: fexit/tcp_recvmsg
#[fexit(function = "tcp_recvmsg")]
pub fn tcp_recv_exit(ctx: FExitContext) -> u32 {
    let sk: *const sock = unsafe { ctx.arg(0) };
    emit_sock_event(sk, EVENT_TYPE_RECV_EXIT);
    0
}

/// Build and publish one event record
///
/// Reserve, populate, submit: the record becomes visible to the consumer
/// only on submit, never partially. A failed reservation means the ring is
/// full; the event is dropped silently since probes have no error channel
/// and must not block.
#[inline(always)]
fn emit_sock_event(sk: *const sock, event_type: u8) {
    let timestamp_ns = now_ns();
    let pid = current_pid();

    let Some(mut entry) = EVENTS.reserve::<SockEvent>(0) else {
        return;
    };

    let srtt_offset = unsafe { SRTT_OFFSET.get(&SRTT_OFFSET_KEY) }
        .copied()
        .unwrap_or(0);
    let meta = read_sock_meta(sk, srtt_offset);

    // Field-by-field writes keep the generated code free of memcpy
    // relocations the BPF loader cannot resolve.
    let event = entry.as_mut_ptr();
    unsafe {
        write(addr_of_mut!((*event).timestamp_ns), timestamp_ns);
        write(addr_of_mut!((*event).sock_id), sk as u64);
        write(addr_of_mut!((*event).pid), pid);
        write(addr_of_mut!((*event).srtt_us), meta.srtt_us);
        let local = addr_of_mut!((*event).local_addr) as *mut u32;
        let remote = addr_of_mut!((*event).remote_addr) as *mut u32;
        for i in 0..ADDR_V6_WORDS {
            write(local.add(i), meta.local_addr[i]);
            write(remote.add(i), meta.remote_addr[i]);
        }
        write(addr_of_mut!((*event).sport), meta.sport);
        write(addr_of_mut!((*event).dport), meta.dport);
        write(addr_of_mut!((*event).family), meta.family);
        write(addr_of_mut!((*event).event_type), event_type);
        write(addr_of_mut!((*event)._pad), 0);
    }
    entry.submit(0);
}
