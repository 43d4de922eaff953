//! Benchmark traffic generator
//!
//! Client/server pair that negotiates an experiment over a control
//! connection, then runs fixed-size payload round-trips over a second
//! connection while the client records per-round wall-clock timestamps.
//! Exists to generate TCP traffic the kernel probes can observe and to
//! produce userspace timings the captured events line up against.

pub mod client;
pub mod proto;
pub mod server;

pub use client::{run_client, ClientConfig};
pub use proto::{NegStatus, Negotiation};
pub use server::serve;
