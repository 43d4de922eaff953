//! socktrace - Kernel Space Programs
//!
//! eBPF programs that observe TCP send/receive transitions and stream one
//! fixed-layout event per transition to userspace through a ring buffer.
//!
//! Four probes attach via BTF trampolines:
//!
//! ```text
//! fentry/tcp_sendmsg         -> send_entry event
//! fexit/tcp_sendmsg          -> send_exit event
//! fentry/tcp_rcv_established -> recv_entry event
//! fexit/tcp_recvmsg          -> recv_exit event
//! ```
//!
//! Each fire reserves a slot in the EVENTS ring buffer, populates it from
//! the socket, and submits it. A full ring means the event is silently
//! dropped; probes never block or retry.
//!
//! ## Usage
//!
//! This program must be compiled for the bpfel-unknown-none target:
//!
//! ```bash
//! cargo xtask build-ebpf --release
//! ```
//!
//! The compiled bytecode is then loaded by the userspace daemon.

#![no_std]
#![no_main]

mod handlers;
mod helpers;
mod maps;
mod socket_parser;

// Re-export program functions so they're visible to the loader
pub use handlers::{tcp_recv_entry, tcp_recv_exit, tcp_send_entry, tcp_send_exit};

// Re-export maps for verification
pub use maps::{EVENTS, SRTT_OFFSET};

// fentry/fexit trampolines require a GPL-compatible license
#[no_mangle]
#[link_section = "license"]
pub static _license: [u8; 4] = *b"GPL\0";

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    // eBPF programs cannot panic - this should never be reached
    loop {}
}
