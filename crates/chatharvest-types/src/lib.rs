//! Shared domain types for chatharvest.
//!
//! This crate contains the types used across the chatharvest tools:
//! session lifecycle states and client events, message records, analysis
//! criteria, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod analysis;
pub mod config;
pub mod error;
pub mod message;
pub mod session;
