//! Node bridge messaging client.
//!
//! The external messaging library runs inside a Node.js child process (the
//! bridge script); this module owns the Rust side: process lifecycle, the
//! JSON-line RPC protocol, and fan-out of lifecycle events.

pub mod client;
pub mod protocol;

pub use client::BridgeClient;
