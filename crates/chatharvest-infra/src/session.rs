//! Local filesystem session store.
//!
//! The session directory itself is opaque: the external client writes its
//! credentials under it. This store only answers existence checks and
//! performs whole-directory deletion.

use std::path::{Path, PathBuf};

use chatharvest_core::session::SessionStore;

/// Session store backed by a directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalSessionStore {
    root: PathBuf,
}

impl LocalSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SessionStore for LocalSessionStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.root).await.unwrap_or(false)
    }

    async fn clear(&self) -> Result<(), std::io::Error> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            // Absence is the desired end state, not an error.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn clear_removes_nested_contents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("session");
        tokio::fs::create_dir_all(root.join("Default/Cache"))
            .await
            .unwrap();
        tokio::fs::write(root.join("Default/creds.json"), "{}")
            .await
            .unwrap();

        let store = LocalSessionStore::new(&root);
        assert!(store.exists().await);

        store.clear().await.unwrap();
        assert!(!store.exists().await);
    }

    #[tokio::test]
    async fn clear_is_idempotent_on_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSessionStore::new(tmp.path().join("never-created"));

        assert!(!store.exists().await);
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}
