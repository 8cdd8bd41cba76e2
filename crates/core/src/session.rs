// crates/core/src/session.rs
//! UE attach/session reconstruction.
//!
//! Per-IMSI state machine folded over the window in file order:
//! absent → attaching (Attach request) → attached (Attach complete) →
//! detached (Detach request or Removed Session). S1AP context ids arrive on
//! separate lines, so they park in a pending side-table until the next
//! attach event for that IMSI claims them.

use std::collections::HashMap;

use mme_view_types::{SessionState, UeSession};

use crate::event::{CounterKind, LogEvent, ParsedLine};

/// Result of one session fold over a window.
///
/// `enb_ue_count` and `mme_session_count` are the MME's own last-reported
/// counters. They track radio contexts and core sessions respectively, not
/// the attach state machine, and routinely disagree with `sessions.len()`.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Sessions currently in the attached state, keyed by IMSI.
    pub sessions: HashMap<String, UeSession>,
    pub enb_ue_count: u64,
    pub mme_session_count: u64,
}

/// Fold a parsed window into the attached-session snapshot.
pub fn fold_sessions(lines: &[ParsedLine]) -> SessionSnapshot {
    let mut sessions: HashMap<String, UeSession> = HashMap::new();
    // IMSI → (eNB-side id, MME-side id), consumed at most once.
    let mut pending_context: HashMap<String, (u32, u32)> = HashMap::new();
    let mut enb_ue_count = 0u64;
    let mut mme_session_count = 0u64;

    for line in lines {
        for event in &line.events {
            match event {
                LogEvent::ContextAssigned {
                    imsi,
                    enb_ue_s1ap_id,
                    mme_ue_s1ap_id,
                } => {
                    pending_context.insert(imsi.clone(), (*enb_ue_s1ap_id, *mme_ue_s1ap_id));
                }
                LogEvent::AttachRequested { imsi } => {
                    let session = sessions
                        .entry(imsi.clone())
                        .or_insert_with(|| UeSession::new(imsi.clone()));
                    session.state = SessionState::Attaching;
                    claim_pending_context(session, &mut pending_context);
                }
                LogEvent::AttachCompleted { imsi } => {
                    let session = sessions
                        .entry(imsi.clone())
                        .or_insert_with(|| UeSession::new(imsi.clone()));
                    session.state = SessionState::Attached;
                    session.attached_at = line.timestamp;
                    claim_pending_context(session, &mut pending_context);
                }
                LogEvent::DetachRequested { imsi } => {
                    if let Some(session) = sessions.get_mut(imsi) {
                        session.state = SessionState::Detached;
                    }
                }
                LogEvent::SessionRemoved { imsi, apn } => {
                    // Teardown is the one place the MME names the APN.
                    if let Some(session) = sessions.get_mut(imsi) {
                        session.apn = apn.clone();
                        session.state = SessionState::Detached;
                    }
                }
                LogEvent::CounterUpdate { kind, value } => match kind {
                    CounterKind::EnbUe => enb_ue_count = *value,
                    CounterKind::MmeSession => mme_session_count = *value,
                },
                // Connection-side events are handled by the connection fold.
                LogEvent::ConnectionAccepted { .. }
                | LogEvent::ConnectionRefused { .. }
                | LogEvent::StreamInfo { .. } => {}
            }
        }
    }

    sessions.retain(|_, session| session.state == SessionState::Attached);
    SessionSnapshot {
        sessions,
        enb_ue_count,
        mme_session_count,
    }
}

/// Copy a parked context pair onto the session and drop it from the table.
/// Applied at most once per IMSI; unclaimed entries die with the window.
fn claim_pending_context(session: &mut UeSession, pending: &mut HashMap<String, (u32, u32)>) {
    if let Some((enb_id, mme_id)) = pending.remove(&session.imsi) {
        session.enb_ue_s1ap_id = Some(enb_id);
        session.mme_ue_s1ap_id = Some(mme_id);
    }
}
