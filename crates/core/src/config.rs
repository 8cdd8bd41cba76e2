// crates/core/src/config.rs
//! Monitor configuration: log location and trailing-window sizes.

use std::path::PathBuf;

use serde::Deserialize;

/// Where Open5GS writes the MME log in the Docker deployment.
pub const DEFAULT_LOG_PATH: &str = "/var/log/open5gs/mme.log";

// The connection scan and the session scan keep independently sized
// windows; connection events are far rarer than attach traffic.
const DEFAULT_CONNECTION_WINDOW_LINES: usize = 1000;
const DEFAULT_SESSION_WINDOW_LINES: usize = 2000;

/// Configuration for [`MmeLogMonitor`](crate::monitor::MmeLogMonitor).
///
/// Host applications deserialize this from their own config file; every
/// field falls back to the deployment default when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub log_path: PathBuf,
    pub connection_window_lines: usize,
    pub session_window_lines: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            connection_window_lines: DEFAULT_CONNECTION_WINDOW_LINES,
            session_window_lines: DEFAULT_SESSION_WINDOW_LINES,
        }
    }
}

impl MonitorConfig {
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    pub fn with_connection_window(mut self, lines: usize) -> Self {
        self.connection_window_lines = lines;
        self
    }

    pub fn with_session_window(mut self, lines: usize) -> Self {
        self.session_window_lines = lines;
        self
    }
}
