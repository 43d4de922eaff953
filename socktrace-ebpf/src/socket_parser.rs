//! Socket structure parsing
//!
//! Reads connection metadata out of the kernel's socket structures with
//! bpf_probe_read_kernel. The layout below mirrors the head of struct
//! sock_common on 64-bit kernels; every field up to the IPv6 addresses is
//! present so the offsets line up, and reads are done field-by-field so a
//! fault in one read degrades that field instead of killing the record.

#![allow(non_camel_case_types)]

use aya_ebpf::helpers::bpf_probe_read_kernel;
use core::ptr::addr_of;
use socktrace_common::constants::{ADDR_V6_WORDS, AF_INET, AF_INET6, AF_UNSPEC};

/// Kernel struct sock representation (partial)
///
/// sock_common sits at the very start of struct sock, so a *const sock is
/// also a pointer to its sock_common.
#[repr(C)]
pub struct sock {
    pub __sk_common: sock_common,
}

/// Kernel struct sock_common head, 64-bit layout
///
/// Field order and sizes must match the kernel exactly; the checks below
/// pin the offsets this module depends on.
#[repr(C)]
pub struct sock_common {
    skc_daddr: u32,             // Remote address (network byte order)
    skc_rcv_saddr: u32,         // Local address (network byte order)
    skc_hash: u32,              // Hash value, shares a union with skc_u16hashes
    skc_dport: u16,             // Remote port (network byte order)
    skc_num: u16,               // Local port (host byte order)
    skc_family: u16,            // Address family (AF_INET, AF_INET6)
    skc_state: u8,              // Connection state
    skc_flags: u8,              // reuse/reuseport/ipv6only bitfield byte
    skc_bound_dev_if: i32,      // Bound device index
    skc_bind_node: [u64; 2],    // hlist_node (two pointers)
    skc_prot: u64,              // struct proto *
    skc_net: u64,               // possible_net_t
    skc_v6_daddr: [u32; 4],     // Remote IPv6 address
    skc_v6_rcv_saddr: [u32; 4], // Local IPv6 address
}

const _: () = {
    assert!(core::mem::size_of::<sock_common>() == 88);
    assert!(core::mem::offset_of!(sock_common, skc_daddr) == 0);
    assert!(core::mem::offset_of!(sock_common, skc_rcv_saddr) == 4);
    assert!(core::mem::offset_of!(sock_common, skc_hash) == 8);
    assert!(core::mem::offset_of!(sock_common, skc_dport) == 12);
    assert!(core::mem::offset_of!(sock_common, skc_num) == 14);
    assert!(core::mem::offset_of!(sock_common, skc_family) == 16);
    assert!(core::mem::offset_of!(sock_common, skc_v6_daddr) == 56);
    assert!(core::mem::offset_of!(sock_common, skc_v6_rcv_saddr) == 72);
};

/// Connection metadata pulled from one socket
///
/// Zeroed fields mean the corresponding read faulted or did not apply;
/// family AF_UNSPEC marks the whole address block as meaningless.
pub struct SockMeta {
    pub family: u16,
    pub sport: u16,
    pub dport: u16,
    pub local_addr: [u32; 4],
    pub remote_addr: [u32; 4],
    pub srtt_us: u32,
}

impl SockMeta {
    const fn empty() -> Self {
        Self {
            family: AF_UNSPEC,
            sport: 0,
            dport: 0,
            local_addr: [0; 4],
            remote_addr: [0; 4],
            srtt_us: 0,
        }
    }
}

/// Read connection metadata from a kernel socket
///
/// `srtt_offset` is the byte offset of srtt_us inside the kernel TCP socket
/// struct as published by userspace; 0 disables the read. The raw kernel
/// value is scaled by 8, so it is shifted down here.
#[inline(always)]
pub fn read_sock_meta(sk: *const sock, srtt_offset: u32) -> SockMeta {
    let mut meta = SockMeta::empty();
    if sk.is_null() {
        return meta;
    }

    unsafe {
        let common = addr_of!((*sk).__sk_common);

        meta.family = bpf_probe_read_kernel(addr_of!((*common).skc_family)).unwrap_or(AF_UNSPEC);
        meta.sport = bpf_probe_read_kernel(addr_of!((*common).skc_num)).unwrap_or(0);
        // dport is stored in network byte order; the record carries host order
        meta.dport =
            u16::from_be(bpf_probe_read_kernel(addr_of!((*common).skc_dport)).unwrap_or(0));

        if meta.family == AF_INET {
            meta.local_addr[0] =
                bpf_probe_read_kernel(addr_of!((*common).skc_rcv_saddr)).unwrap_or(0);
            meta.remote_addr[0] = bpf_probe_read_kernel(addr_of!((*common).skc_daddr)).unwrap_or(0);
        } else if meta.family == AF_INET6 {
            let local = addr_of!((*common).skc_v6_rcv_saddr) as *const u32;
            let remote = addr_of!((*common).skc_v6_daddr) as *const u32;
            for i in 0..ADDR_V6_WORDS {
                meta.local_addr[i] = bpf_probe_read_kernel(local.add(i)).unwrap_or(0);
                meta.remote_addr[i] = bpf_probe_read_kernel(remote.add(i)).unwrap_or(0);
            }
        }

        if srtt_offset != 0 {
            let srtt_ptr = (sk as *const u8).add(srtt_offset as usize) as *const u32;
            meta.srtt_us = bpf_probe_read_kernel(srtt_ptr).unwrap_or(0) >> 3;
        }
    }

    meta
}
