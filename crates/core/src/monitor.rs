// crates/core/src/monitor.rs
//! Query facade over the MME log.
//!
//! Every query re-runs the full pipeline — window read, event extraction,
//! fold — and returns a fresh snapshot. Nothing is carried between calls
//! except an advisory last-result cache, overwritten at the end of each
//! pass; concurrent callers each get a self-consistent result and the cache
//! settles last-writer-wins.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use mme_view_types::{EnbStatus, S1apConnection, S1apStatusSummary, UeSession, UeStatusSummary};

use crate::config::MonitorConfig;
use crate::connection::fold_connections;
use crate::event::LogPatterns;
use crate::session::{fold_sessions, SessionSnapshot};
use crate::tail::tail_lines;

/// Reconstructs live S1AP and UE state from the MME log on demand.
///
/// Owned by the embedding application's composition root; cheap to share
/// behind an `Arc`. A missing or unreadable log is a normal outcome (the
/// core may be stopped, or this deployment may not run an MME at all) and
/// degrades to empty results, never an error.
pub struct MmeLogMonitor {
    config: MonitorConfig,
    patterns: LogPatterns,
    last_connections: RwLock<HashMap<String, S1apConnection>>,
    last_sessions: RwLock<SessionSnapshot>,
}

impl MmeLogMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            patterns: LogPatterns::new(),
            last_connections: RwLock::new(HashMap::new()),
            last_sessions: RwLock::new(SessionSnapshot::default()),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Whether the MME log exists and is a regular file.
    pub fn is_available(&self) -> bool {
        self.config.log_path.is_file()
    }

    /// Read the trailing window, degrading any failure to an empty vec.
    async fn read_window(&self, lines: usize) -> Vec<String> {
        if !self.is_available() {
            tracing::warn!(path = %self.config.log_path.display(), "MME log not available");
            return Vec::new();
        }
        match tail_lines(&self.config.log_path, lines).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!(
                    path = %self.config.log_path.display(),
                    error = %e,
                    "Error reading MME log"
                );
                Vec::new()
            }
        }
    }

    /// Re-scan for S1AP connections and refresh the advisory cache.
    pub async fn scan_connections(&self) -> HashMap<String, S1apConnection> {
        let lines = self.read_window(self.config.connection_window_lines).await;
        let connections = fold_connections(&self.patterns.parse_lines(&lines));
        *self.last_connections.write().await = connections.clone();
        connections
    }

    /// Re-scan for UE sessions and refresh the advisory cache.
    pub async fn scan_sessions(&self) -> SessionSnapshot {
        let lines = self.read_window(self.config.session_window_lines).await;
        let snapshot = fold_sessions(&self.patterns.parse_lines(&lines));
        *self.last_sessions.write().await = snapshot.clone();
        snapshot
    }

    /// Currently connected eNodeBs, ordered by address.
    pub async fn connected_enbs(&self) -> Vec<EnbStatus> {
        let connections = self.scan_connections().await;
        let mut enbs: Vec<EnbStatus> = connections.values().map(EnbStatus::from).collect();
        enbs.sort_by(|a, b| a.ip.cmp(&b.ip));
        enbs
    }

    /// Count of currently connected eNodeBs.
    pub async fn enb_count(&self) -> usize {
        self.scan_connections().await.len()
    }

    /// Currently attached UE sessions, ordered by IMSI.
    pub async fn attached_ues(&self) -> Vec<UeSession> {
        let snapshot = self.scan_sessions().await;
        let mut sessions: Vec<UeSession> = snapshot.sessions.into_values().collect();
        sessions.sort_by(|a, b| a.imsi.cmp(&b.imsi));
        sessions
    }

    /// The MME's last-reported eNB-UE counter. Counts radio contexts, not
    /// attached sessions.
    pub async fn ue_count(&self) -> u64 {
        self.scan_sessions().await.enb_ue_count
    }

    /// The MME's last-reported session counter. Counts core PDN sessions,
    /// not attached sessions.
    pub async fn session_count(&self) -> u64 {
        self.scan_sessions().await.mme_session_count
    }

    /// Availability, count, and connected list in one round trip.
    pub async fn connection_summary(&self) -> S1apStatusSummary {
        let enodebs = self.connected_enbs().await;
        S1apStatusSummary {
            available: self.is_available(),
            timestamp: Utc::now(),
            total_connected: enodebs.len(),
            enodebs,
            log_path: self.config.log_path.display().to_string(),
        }
    }

    /// Availability, both counters, and the attached list in one round trip.
    pub async fn session_summary(&self) -> UeStatusSummary {
        let snapshot = self.scan_sessions().await;
        let mut sessions: Vec<UeSession> = snapshot.sessions.into_values().collect();
        sessions.sort_by(|a, b| a.imsi.cmp(&b.imsi));
        UeStatusSummary {
            available: self.is_available(),
            timestamp: Utc::now(),
            enb_ue_count: snapshot.enb_ue_count,
            session_count: snapshot.mme_session_count,
            attached_ues: sessions.len(),
            sessions,
        }
    }

    /// Advisory copy of the last connection scan. Not a consistency
    /// guarantee — always prefer the return value of a scan.
    pub async fn last_connection_snapshot(&self) -> HashMap<String, S1apConnection> {
        self.last_connections.read().await.clone()
    }

    /// Advisory copy of the last session scan.
    pub async fn last_session_snapshot(&self) -> SessionSnapshot {
        self.last_sessions.read().await.clone()
    }
}
