use dirs::home_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveRootError {
    #[error("home directory not found")]
    HomeDirNotFound,
}

pub fn resolve_sessions_dir() -> Result<PathBuf, ResolveRootError> {
    if let Some(override_dir) = std::env::var_os("CODEX_SESSIONS_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = home_dir() else {
        return Err(ResolveRootError::HomeDirNotFound);
    };

    Ok(home.join(".codex").join("sessions"))
}

pub fn resolve_archived_sessions_dir() -> Result<PathBuf, ResolveRootError> {
    if let Some(override_dir) = std::env::var_os("CODEX_ARCHIVED_SESSIONS_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let Some(home) = home_dir() else {
        return Err(ResolveRootError::HomeDirNotFound);
    };

    Ok(home.join(".codex").join("archived_sessions"))
}

/// Not-found, permission denied, and not-a-directory all collapse to
/// `false`: an unusable root degrades to an empty listing.
pub fn dir_exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn probe_is_true_only_for_directories() {
        let dir = tempdir().expect("tempdir");
        assert!(dir_exists(dir.path()));
        assert!(!dir_exists(&dir.path().join("missing")));

        let file_path = dir.path().join("f.jsonl");
        std::fs::write(&file_path, "{}").expect("write");
        assert!(!dir_exists(&file_path));
    }
}
