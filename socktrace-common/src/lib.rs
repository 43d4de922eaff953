//! Shared types and constants for the socktrace probes
//!
//! This crate defines the event record written by the kernel programs and
//! parsed by the userspace daemon. Both sides must agree exactly on field
//! offsets, sizes, and byte order, so everything here is repr(C) with
//! compile-time layout checks.

#![no_std]

pub mod constants;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use types::SockEvent;
