//! Chromium snapshot download.
//!
//! Pulls the latest build from the chromium-browser-snapshots bucket for
//! the host platform and unpacks it into the cache directory. Snapshots are
//! keyed by revision, so an already-extracted build is reused as-is.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chatharvest_types::error::ProvisionError;

const SNAPSHOT_BASE: &str = "https://storage.googleapis.com/chromium-browser-snapshots";

/// Bucket layout for one host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotPlatform {
    /// Bucket directory, e.g. `Linux_x64`.
    pub dir: &'static str,
    /// Archive file name within a revision.
    pub archive: &'static str,
    /// Browser binary path relative to the extraction root.
    pub binary: &'static str,
}

const LINUX_X64: SnapshotPlatform = SnapshotPlatform {
    dir: "Linux_x64",
    archive: "chrome-linux.zip",
    binary: "chrome-linux/chrome",
};

const MAC_ARM: SnapshotPlatform = SnapshotPlatform {
    dir: "Mac_Arm",
    archive: "chrome-mac.zip",
    binary: "chrome-mac/Chromium.app/Contents/MacOS/Chromium",
};

const MAC_X64: SnapshotPlatform = SnapshotPlatform {
    dir: "Mac",
    archive: "chrome-mac.zip",
    binary: "chrome-mac/Chromium.app/Contents/MacOS/Chromium",
};

const WIN_X64: SnapshotPlatform = SnapshotPlatform {
    dir: "Win_x64",
    archive: "chrome-win.zip",
    binary: "chrome-win/chrome.exe",
};

/// Bucket layout for the compilation target.
pub fn host_platform() -> Result<SnapshotPlatform, ProvisionError> {
    if cfg!(all(target_os = "linux", target_arch = "x86_64")) {
        Ok(LINUX_X64)
    } else if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        Ok(MAC_ARM)
    } else if cfg!(target_os = "macos") {
        Ok(MAC_X64)
    } else if cfg!(target_os = "windows") {
        Ok(WIN_X64)
    } else {
        Err(ProvisionError::Download(format!(
            "no snapshot builds for {}/{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )))
    }
}

fn last_change_url(platform: &SnapshotPlatform) -> String {
    format!("{SNAPSHOT_BASE}/{}/LAST_CHANGE", platform.dir)
}

fn archive_url(platform: &SnapshotPlatform, revision: &str) -> String {
    format!(
        "{SNAPSHOT_BASE}/{}/{}/{}",
        platform.dir, revision, platform.archive
    )
}

/// Ensure a Chromium binary exists under `cache_root`, downloading the
/// latest snapshot if no cached revision is present.
pub async fn ensure_chromium(cache_root: &Path) -> Result<PathBuf, ProvisionError> {
    let platform = host_platform()?;

    let revision = fetch_text(&last_change_url(&platform)).await?;
    let revision = revision.trim().to_string();
    let install_dir = cache_root.join(format!("chromium-{revision}"));
    let binary = install_dir.join(platform.binary);

    if tokio::fs::try_exists(&binary).await.unwrap_or(false) {
        tracing::debug!(revision, "reusing cached chromium build");
        return Ok(binary);
    }

    tracing::info!(revision, "downloading chromium snapshot");
    let bytes = fetch_bytes(&archive_url(&platform, &revision)).await?;

    let dest = install_dir.clone();
    tokio::task::spawn_blocking(move || extract_archive(&bytes, &dest))
        .await
        .map_err(|e| ProvisionError::Extract(e.to_string()))??;

    if !tokio::fs::try_exists(&binary).await.unwrap_or(false) {
        return Err(ProvisionError::Extract(format!(
            "archive did not contain expected binary {}",
            platform.binary
        )));
    }

    Ok(binary)
}

async fn fetch_text(url: &str) -> Result<String, ProvisionError> {
    reqwest::get(url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| ProvisionError::Download(e.to_string()))?
        .text()
        .await
        .map_err(|e| ProvisionError::Download(e.to_string()))
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ProvisionError> {
    let bytes = reqwest::get(url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| ProvisionError::Download(e.to_string()))?
        .bytes()
        .await
        .map_err(|e| ProvisionError::Download(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Unpack a zip archive into `dest`, preserving unix file modes.
fn extract_archive(bytes: &[u8], dest: &Path) -> Result<(), ProvisionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ProvisionError::Extract(e.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ProvisionError::Extract(e.to_string()))?;
        // Entries with unsafe paths (absolute, `..`) are skipped.
        let Some(rel_path) = entry.enclosed_name().map(Path::to_path_buf) else {
            continue;
        };
        let out_path = dest.join(rel_path);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|e| ProvisionError::Extract(e.to_string()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ProvisionError::Extract(e.to_string()))?;
        }
        let mut out_file =
            std::fs::File::create(&out_path).map_err(|e| ProvisionError::Extract(e.to_string()))?;
        std::io::copy(&mut entry, &mut out_file)
            .map_err(|e| ProvisionError::Extract(e.to_string()))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                .map_err(|e| ProvisionError::Extract(e.to_string()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;

    fn sample_archive() -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .add_directory("chrome-linux/", FileOptions::default())
                .unwrap();
            writer
                .start_file(
                    "chrome-linux/chrome",
                    FileOptions::default().unix_permissions(0o755),
                )
                .unwrap();
            writer.write_all(b"#!/bin/sh\necho chromium\n").unwrap();
            writer
                .start_file("chrome-linux/version", FileOptions::default())
                .unwrap();
            writer.write_all(b"1337").unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_snapshot_urls() {
        assert_eq!(
            last_change_url(&LINUX_X64),
            "https://storage.googleapis.com/chromium-browser-snapshots/Linux_x64/LAST_CHANGE"
        );
        assert_eq!(
            archive_url(&LINUX_X64, "1337"),
            "https://storage.googleapis.com/chromium-browser-snapshots/Linux_x64/1337/chrome-linux.zip"
        );
    }

    #[test]
    fn test_extract_archive_writes_files() {
        let tmp = TempDir::new().unwrap();
        extract_archive(&sample_archive(), tmp.path()).unwrap();

        let binary = tmp.path().join("chrome-linux/chrome");
        assert!(binary.is_file());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("chrome-linux/version")).unwrap(),
            "1337"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_archive_preserves_exec_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        extract_archive(&sample_archive(), tmp.path()).unwrap();

        let mode = tmp
            .path()
            .join("chrome-linux/chrome")
            .metadata()
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_extract_archive_rejects_garbage() {
        let tmp = TempDir::new().unwrap();
        let err = extract_archive(b"definitely not a zip", tmp.path()).unwrap_err();
        assert!(matches!(err, ProvisionError::Extract(_)));
    }
}
