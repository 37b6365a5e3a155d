//! Path utilities for config and device paths

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{DiscRipperError, DiscRipperResult};

/// User home directory from `$HOME`
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expand a leading `~` or `~/` against the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match (path, home_dir()) {
        ("~", Some(home)) => home,
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

/// Expand `~` and make the path absolute against `base`
pub fn resolve_against(path: &str, base: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Check that `device` exists and can be opened for reading
pub fn ensure_readable_device(device: &str) -> DiscRipperResult<PathBuf> {
    let not_detected = || DiscRipperError::DiscNotDetected {
        device: device.to_string(),
    };

    if device.trim().is_empty() {
        return Err(not_detected());
    }

    let path = expand_home(device);
    if !path.exists() {
        return Err(not_detected());
    }
    File::open(&path).map_err(|_| not_detected())?;
    Ok(path)
}
