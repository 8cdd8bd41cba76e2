// crates/core/src/connection.rs
//! S1AP connection reconstruction.
//!
//! Folds connection events in file order into a per-address map. File order
//! stands in for time: a refusal after an accept disconnects the address,
//! an accept after a refusal reconnects it.

use std::collections::{HashMap, HashSet};

use mme_view_types::S1apConnection;

use crate::event::{LogEvent, ParsedLine};

/// Fold a parsed window into the currently connected eNodeBs, keyed by IP.
///
/// Only addresses whose latest state is connected survive: an accept upserts
/// a fresh record (dropping any stale stream count), a stream-info line
/// annotates an existing record and never creates one, a refusal marks the
/// address down.
pub fn fold_connections(lines: &[ParsedLine]) -> HashMap<String, S1apConnection> {
    let mut connections: HashMap<String, S1apConnection> = HashMap::new();
    let mut refused: HashSet<String> = HashSet::new();

    for line in lines {
        for event in &line.events {
            match event {
                LogEvent::ConnectionAccepted { ip, port } => {
                    refused.remove(ip);
                    connections.insert(
                        ip.clone(),
                        S1apConnection::accepted(ip.clone(), *port, line.timestamp),
                    );
                }
                LogEvent::StreamInfo { ip, count } => {
                    if let Some(conn) = connections.get_mut(ip) {
                        conn.sctp_streams = Some(*count);
                    }
                }
                LogEvent::ConnectionRefused { ip } => {
                    refused.insert(ip.clone());
                    if let Some(conn) = connections.get_mut(ip) {
                        conn.is_connected = false;
                    }
                }
                // Session-side events are handled by the session fold.
                LogEvent::ContextAssigned { .. }
                | LogEvent::AttachRequested { .. }
                | LogEvent::AttachCompleted { .. }
                | LogEvent::DetachRequested { .. }
                | LogEvent::SessionRemoved { .. }
                | LogEvent::CounterUpdate { .. } => {}
            }
        }
    }

    connections.retain(|ip, conn| conn.is_connected && !refused.contains(ip));
    connections
}
