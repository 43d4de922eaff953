//! Helper functions for the eBPF programs
//!
//! Thin wrappers around the BPF helper calls used at every probe fire.

use aya_ebpf::helpers::{bpf_get_current_pid_tgid, bpf_ktime_get_ns};

/// Get current monotonic timestamp in nanoseconds
#[inline(always)]
pub fn now_ns() -> u64 {
    unsafe { bpf_ktime_get_ns() }
}

/// Get current process ID (thread-group id)
#[inline(always)]
pub fn current_pid() -> u32 {
    let pid_tgid = unsafe { bpf_get_current_pid_tgid() };
    (pid_tgid >> 32) as u32
}
