//! Runtime configuration
//!
//! The server is launched by an MCP host, so everything comes from the environment.

use std::path::{Path, PathBuf};

/// Overrides the cache database location
pub const CACHE_PATH_ENV: &str = "BAKECOST_CACHE_PATH";

const CACHE_FILE: &str = "bakecost.db";

/// Cache database path from `BAKECOST_CACHE_PATH`, or `<project>/data/bakecost.db`
pub fn cache_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    resolve_cache_path(std::env::var(CACHE_PATH_ENV).ok(), exe_dir.as_deref())
}

fn resolve_cache_path(override_path: Option<String>, exe_dir: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    let mut path = exe_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(Path::parent) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push(CACHE_FILE);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let path = resolve_cache_path(Some("/tmp/cache.db".to_string()), Some(Path::new("/opt/bin")));
        assert_eq!(path, PathBuf::from("/tmp/cache.db"));
    }

    #[test]
    fn test_blank_override_ignored() {
        let path = resolve_cache_path(Some("  ".to_string()), Some(Path::new("/opt/bin")));
        assert_eq!(path, PathBuf::from("/opt/bin/data/bakecost.db"));
    }

    #[test]
    fn test_target_dir_resolves_to_project_root() {
        let path = resolve_cache_path(None, Some(Path::new("/work/bakecost/target/release")));
        assert_eq!(path, PathBuf::from("/work/bakecost/data/bakecost.db"));
    }
}
