//! Core logic for chatharvest.
//!
//! This crate defines the "ports" the infrastructure layer implements
//! (`MessagingClient`, `SessionStore`) and the logic built on top of them:
//! the session lifecycle state machine, the QR login flow, and the message
//! extraction pipeline. It never talks to a real browser or bridge process,
//! which keeps every flow testable against in-memory fakes.

pub mod client;
pub mod extract;
pub mod qr;
pub mod session;
