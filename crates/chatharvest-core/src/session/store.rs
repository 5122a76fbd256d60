//! SessionStore trait for the persisted authentication directory.
//!
//! The session directory is opaque: it is created implicitly by the
//! external client and only ever deleted as a whole by chatharvest.
//! Defined here so the lifecycle drivers can clear sessions without
//! depending on a concrete filesystem implementation.

use std::path::Path;

/// Abstraction over the persisted session directory for one client id.
pub trait SessionStore: Send + Sync {
    /// Location of the session directory.
    fn root(&self) -> &Path;

    /// Whether a persisted session currently exists.
    fn exists(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Recursively delete the session directory.
    ///
    /// Idempotent: clearing an absent directory is a no-op, not an error.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;
}
