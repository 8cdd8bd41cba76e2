// crates/core/tests/live_status.rs
//! End-to-end reconstruction over a synthetic MME log.

use std::io::Write;

use tempfile::NamedTempFile;

use mme_view_core::{MmeLogMonitor, MonitorConfig};

fn monitor_over(lines: &[&str]) -> (MmeLogMonitor, NamedTempFile) {
    let mut f = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(f, "{}", line).unwrap();
    }
    f.flush().unwrap();
    let config = MonitorConfig::default().with_log_path(f.path());
    (MmeLogMonitor::new(config), f)
}

#[tokio::test]
async fn reconstructs_connections_and_sessions_together() {
    let (monitor, _f) = monitor_over(&[
        "eNB-S1 accepted[10.0.1.5]:3223",
        "eNB-S1[10.0.1.5] max_num_of_ostreams : 8",
        "[315010000000001] Attach request",
        "[315010000000001] Attach complete",
        "Removed Session: UE IMSI:[315010000000002] APN:[internet]",
    ]);

    let enbs = monitor.connected_enbs().await;
    assert_eq!(enbs.len(), 1);
    assert_eq!(enbs[0].ip, "10.0.1.5");
    assert_eq!(enbs[0].id, "eNB-10-0-1-5");
    assert_eq!(enbs[0].sctp_streams, Some(8));
    assert_eq!(monitor.enb_count().await, 1);

    let sessions = monitor.attached_ues().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].imsi, "315010000000001");
    // The removed session never attached in this window.
    assert!(sessions.iter().all(|s| s.imsi != "315010000000002"));
}

#[tokio::test]
async fn full_attach_detach_cycle_with_context_and_counters() {
    let (monitor, _f) = monitor_over(&[
        "01/17 09:12:20.001: eNB-S1 accepted[10.0.1.5]:3223",
        "IMSI[315010000000001] ENB_UE_S1AP_ID[167] MME_UE_S1AP_ID[36]",
        "01/17 09:12:21.500: [315010000000001] Attach request",
        "[Added] Number of eNB-UEs is now 1",
        "01/17 09:12:22.800: [315010000000001] Attach complete",
        "[Added] Number of MME-Sessions is now 1",
        "[315010000000002] Attach request",
        "[315010000000002] Attach complete",
        "[315010000000002] Detach request",
        "[Removed] Number of eNB-UEs is now 1",
    ]);

    let summary = monitor.session_summary().await;
    assert!(summary.available);
    assert_eq!(summary.attached_ues, 1);
    assert_eq!(summary.enb_ue_count, 1);
    assert_eq!(summary.session_count, 1);

    let session = &summary.sessions[0];
    assert_eq!(session.imsi, "315010000000001");
    assert_eq!(session.enb_ue_s1ap_id, Some(167));
    assert_eq!(session.mme_ue_s1ap_id, Some(36));
    assert!(session.attached_at.is_some());
    assert_eq!(session.apn, "internet");
}

#[tokio::test]
async fn flapping_enb_reflects_final_state() {
    let (monitor, _f) = monitor_over(&[
        "eNB-S1 accepted[10.0.1.5]:3223",
        "eNB-S1[10.0.1.5] connection refused!!!",
        "eNB-S1 accepted[10.0.1.5]:3223",
    ]);
    let summary = monitor.connection_summary().await;
    assert_eq!(summary.total_connected, 1);
    assert!(summary.enodebs[0].connected);
}

#[tokio::test]
async fn missing_log_is_a_normal_answer() {
    let dir = tempfile::tempdir().unwrap();
    let config = MonitorConfig::default().with_log_path(dir.path().join("mme.log"));
    let monitor = MmeLogMonitor::new(config);

    let conn = monitor.connection_summary().await;
    assert!(!conn.available);
    assert_eq!(conn.total_connected, 0);
    assert!(conn.enodebs.is_empty());

    let ue = monitor.session_summary().await;
    assert!(!ue.available);
    assert_eq!(ue.enb_ue_count, 0);
    assert_eq!(ue.session_count, 0);
    assert!(ue.sessions.is_empty());
}

#[tokio::test]
async fn concurrent_queries_each_get_consistent_results() {
    let (monitor, _f) = monitor_over(&[
        "eNB-S1 accepted[10.0.1.5]:3223",
        "[315010000000001] Attach request",
        "[315010000000001] Attach complete",
    ]);
    let monitor = std::sync::Arc::new(monitor);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let m = monitor.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    m.connection_summary().await.total_connected
                } else {
                    m.session_summary().await.attached_ues
                }
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 1);
    }
}
