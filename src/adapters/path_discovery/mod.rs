// PATH discovery adapter - Locates external commands on the search path

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::ports::ToolDiscovery;

/// Tool discovery scanning the directories of a `PATH`-style list
#[derive(Debug, Clone, Default)]
pub struct PathToolDiscovery {
    search_path: Option<OsString>,
}

impl PathToolDiscovery {
    /// Discovery over the process `PATH`
    pub fn new() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Discovery over an explicit search path
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ToolDiscovery for PathToolDiscovery {
    fn locate(&self, command: &str) -> Option<PathBuf> {
        if command.contains(std::path::MAIN_SEPARATOR) {
            let path = PathBuf::from(command);
            return is_executable(&path).then_some(path);
        }

        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .map(|dir| dir.join(command))
            .find(|candidate| is_executable(candidate))
    }
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
