use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("session file not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not a regular file: {0}")]
    IsADirectory(String),

    #[error("failed to delete {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Unlinks one session file. The caller is responsible for refreshing the
/// catalog afterwards; this function knows nothing about it.
pub fn delete_session_file(path: &Path) -> Result<(), DeleteError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(DeleteError::IsADirectory(path.display().to_string()));
        }
        Ok(_) => {}
        Err(error) => return Err(classify(path, error)),
    }

    fs::remove_file(path).map_err(|error| classify(path, error))
}

fn classify(path: &Path, error: io::Error) -> DeleteError {
    let display = path.display().to_string();
    match error.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(display),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(display),
        _ => DeleteError::Io {
            path: display,
            source: error,
        },
    }
}
