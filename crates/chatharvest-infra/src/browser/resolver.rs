//! Locating an already-installed browser executable.
//!
//! Resolution order: config override, `CHATHARVEST_BROWSER` env var, then a
//! `PATH` search over well-known binary names. Returning `None` sends the
//! provisioner down the snapshot-download path.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chatharvest_types::config::BrowserConfig;

/// Environment variable overriding the browser executable.
pub const ENV_EXECUTABLE: &str = "CHATHARVEST_BROWSER";

const KNOWN_BINARIES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Resolve a browser executable without downloading anything.
pub fn resolve_executable(config: &BrowserConfig) -> Option<PathBuf> {
    if let Some(path) = &config.executable_path {
        return Some(path.clone());
    }
    if let Some(path) = std::env::var_os(ENV_EXECUTABLE) {
        return Some(PathBuf::from(path));
    }
    find_in_path(KNOWN_BINARIES, std::env::var_os("PATH").as_deref())
}

/// Search each `PATH` entry for the first matching executable name.
fn find_in_path(names: &[&str], path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    for dir in std::env::split_paths(path_var) {
        for name in names {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_config_override_wins() {
        let config = BrowserConfig {
            executable_path: Some(PathBuf::from("/opt/chrome/chrome")),
            ..BrowserConfig::default()
        };
        assert_eq!(
            resolve_executable(&config),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn test_find_in_path_without_path_var() {
        assert_eq!(find_in_path(KNOWN_BINARIES, None), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_path_locates_known_binary() {
        let tmp = TempDir::new().unwrap();
        make_executable(&tmp.path().join("chromium"));

        let path_var = std::env::join_paths([tmp.path()]).unwrap();
        let found = find_in_path(KNOWN_BINARIES, Some(path_var.as_os_str())).unwrap();
        assert_eq!(found, tmp.path().join("chromium"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_path_skips_non_executable_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("chromium"), "not runnable").unwrap();

        let path_var = std::env::join_paths([tmp.path()]).unwrap();
        assert_eq!(find_in_path(KNOWN_BINARIES, Some(path_var.as_os_str())), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_path_respects_dir_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(&first.path().join("google-chrome"));
        make_executable(&second.path().join("chromium"));

        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
        let found = find_in_path(KNOWN_BINARIES, Some(path_var.as_os_str())).unwrap();
        assert_eq!(found, first.path().join("google-chrome"));
    }
}
