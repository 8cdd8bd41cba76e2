// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the MME log window.
///
/// These never cross the facade boundary — `MmeLogMonitor` catches them,
/// logs, and degrades to an empty result. They exist so the reader and
/// internal helpers can use `?` and so tests can assert on the exact
/// failure class.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("MME log not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading MME log: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MonitorError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}
