//! Infrastructure layer for chatharvest.
//!
//! Contains the concrete implementations of the ports defined in
//! `chatharvest-core`: the Node bridge messaging client, the Chromium
//! provisioner (snapshot download, launch, DevTools handshake), the local
//! session store, and the TOML config loader.

pub mod bridge;
pub mod browser;
pub mod config;
pub mod session;
