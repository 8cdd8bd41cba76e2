// crates/types/src/lib.rs
//! Entity and summary types for MME live-state reconstruction.
//!
//! Everything here is a plain data carrier: the core crate produces these,
//! downstream consumers (REST layer, operator dashboards) serialize them.
//! Field names follow the MME's own vocabulary, so the JSON shape matches
//! what operators already see in the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An S1AP control-plane connection from an eNodeB, keyed by IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S1apConnection {
    pub ip_address: String,
    pub port: u16,
    /// When the MME accepted the connection. `None` when the accept line
    /// carried no timestamp token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    pub is_connected: bool,
    /// SCTP outbound stream count, reported on a separate log line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sctp_streams: Option<u32>,
}

impl S1apConnection {
    pub fn accepted(ip: impl Into<String>, port: u16, connected_at: Option<DateTime<Utc>>) -> Self {
        Self {
            ip_address: ip.into(),
            port,
            connected_at,
            is_connected: true,
            sctp_streams: None,
        }
    }
}

/// Attach lifecycle of a UE as far as the log window shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Attaching,
    Attached,
    Detached,
}

/// A UE attach/session, keyed by the 15-digit IMSI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeSession {
    pub imsi: String,
    /// Data network name. The MME only names it on teardown, so until a
    /// `Removed Session` line is seen this stays at the default.
    pub apn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enb_ue_s1ap_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mme_ue_s1ap_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_at: Option<DateTime<Utc>>,
    pub state: SessionState,
}

pub const DEFAULT_APN: &str = "internet";

impl UeSession {
    pub fn new(imsi: impl Into<String>) -> Self {
        Self {
            imsi: imsi.into(),
            apn: DEFAULT_APN.to_string(),
            enb_ue_s1ap_id: None,
            mme_ue_s1ap_id: None,
            attached_at: None,
            state: SessionState::Attaching,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.state == SessionState::Attached
    }
}

/// eNodeB entry as exposed to callers, with display fields derived from
/// the connection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnbStatus {
    /// Stable identifier derived from the address: `eNB-10-0-1-5`.
    pub id: String,
    pub ip: String,
    pub port: u16,
    /// Human-readable label: `eNodeB @ 10.0.1.5`.
    pub name: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sctp_streams: Option<u32>,
}

impl From<&S1apConnection> for EnbStatus {
    fn from(conn: &S1apConnection) -> Self {
        Self {
            id: format!("eNB-{}", conn.ip_address.replace('.', "-")),
            ip: conn.ip_address.clone(),
            port: conn.port,
            name: format!("eNodeB @ {}", conn.ip_address),
            connected: conn.is_connected,
            connected_at: conn.connected_at,
            sctp_streams: conn.sctp_streams,
        }
    }
}

/// One-round-trip S1AP status for callers that want availability, counts,
/// and the connected list together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S1apStatusSummary {
    pub available: bool,
    pub timestamp: DateTime<Utc>,
    pub total_connected: usize,
    pub enodebs: Vec<EnbStatus>,
    pub log_path: String,
}

/// One-round-trip UE status. `enb_ue_count` and `session_count` come from
/// the MME's own counter lines and track a different layer than the
/// attached list — they are reported side by side, never reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeStatusSummary {
    pub available: bool,
    pub timestamp: DateTime<Utc>,
    pub enb_ue_count: u64,
    pub session_count: u64,
    pub attached_ues: usize,
    pub sessions: Vec<UeSession>,
}
