// crates/core/src/event.rs
//! Log line → typed event extraction.
//!
//! The MME log is free text with no schema or version marker; meaning lives
//! only in the line fragments matched here. Each rule is independent and a
//! single line can satisfy several at once (a timestamp token plus an
//! unrelated signal is common). Rules mirror the exact Open5GS message
//! text — when the core changes its wording, this table is the one place
//! that has to follow.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use regex_lite::Regex;

/// Which MME-reported counter a [`LogEvent::CounterUpdate`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// Radio-layer contexts: `Number of eNB-UEs is now N`.
    EnbUe,
    /// Core-layer PDN sessions: `Number of MME-Sessions is now N`.
    MmeSession,
}

/// A typed signal extracted from one log line.
///
/// Closed enum on purpose: the connection and session folds match it
/// exhaustively, so adding a rule forces every fold to decide what to do
/// with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    ConnectionAccepted { ip: String, port: u16 },
    ConnectionRefused { ip: String },
    StreamInfo { ip: String, count: u32 },
    ContextAssigned { imsi: String, enb_ue_s1ap_id: u32, mme_ue_s1ap_id: u32 },
    AttachRequested { imsi: String },
    AttachCompleted { imsi: String },
    DetachRequested { imsi: String },
    SessionRemoved { imsi: String, apn: String },
    CounterUpdate { kind: CounterKind, value: u64 },
}

/// One scanned line: its timestamp token (if any) plus all extracted events.
///
/// The timestamp stays on the line rather than becoming an event so a fold
/// can never pair it with a signal from a different line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub timestamp: Option<DateTime<Utc>>,
    pub events: Vec<LogEvent>,
}

/// Pre-compiled patterns for the full rule set. Build once and share
/// across scans.
pub struct LogPatterns {
    accepted: Regex,
    refused: Regex,
    ostreams: Regex,
    timestamp: Regex,
    attach: Regex,
    detach: Regex,
    imsi: Regex,
    ue_context: Regex,
    session_removed: Regex,
    enb_ue_count: Regex,
    mme_session_count: Regex,
}

impl LogPatterns {
    pub fn new() -> Self {
        Self {
            // eNB-S1 accepted[10.0.1.14]:3223
            accepted: Regex::new(r"eNB-S1 accepted\[(\d+\.\d+\.\d+\.\d+)\]:(\d+)").unwrap(),
            // eNB-S1[10.0.1.14] connection refused!!!
            refused: Regex::new(r"eNB-S1\[(\d+\.\d+\.\d+\.\d+)\] connection refused").unwrap(),
            // eNB-S1[10.48.0.159] max_num_of_ostreams : 10
            ostreams: Regex::new(r"eNB-S1\[(\d+\.\d+\.\d+\.\d+)\] max_num_of_ostreams\s*:\s*(\d+)")
                .unwrap(),
            // 01/17 09:12:25.332
            timestamp: Regex::new(r"(\d{2}/\d{2} \d{2}:\d{2}:\d{2}\.\d{3})").unwrap(),
            // [315010000000010] Attach request | Attach complete
            attach: Regex::new(r"\[(\d{15})\]\s+(Attach request|Attach complete)").unwrap(),
            // [315010000000010] Detach request
            detach: Regex::new(r"\[(\d{15})\]\s+Detach request").unwrap(),
            // IMSI[315010000000010]
            imsi: Regex::new(r"IMSI\[(\d{15})\]").unwrap(),
            // ENB_UE_S1AP_ID[167] MME_UE_S1AP_ID[36]
            ue_context: Regex::new(r"ENB_UE_S1AP_ID\[(\d+)\]\s+MME_UE_S1AP_ID\[(\d+)\]").unwrap(),
            // Removed Session: UE IMSI:[315010000000010] APN:[internet]
            session_removed: Regex::new(r"Removed Session: UE IMSI:\[(\d{15})\] APN:\[(\w+)\]")
                .unwrap(),
            // [Added] Number of eNB-UEs is now 1
            enb_ue_count: Regex::new(r"\[(?:Added|Removed)\] Number of eNB-UEs is now (\d+)")
                .unwrap(),
            // [Added] Number of MME-Sessions is now 1
            mme_session_count: Regex::new(
                r"\[(?:Added|Removed)\] Number of MME-Sessions is now (\d+)",
            )
            .unwrap(),
        }
    }

    /// Apply every rule to `line`, collecting zero or more events.
    ///
    /// Unmatched lines are not an error; they come back with an empty event
    /// list and are skipped by the folds.
    pub fn parse_line(&self, line: &str) -> ParsedLine {
        let mut events = Vec::new();

        if let Some(caps) = self.accepted.captures(line) {
            if let Ok(port) = caps[2].parse() {
                events.push(LogEvent::ConnectionAccepted {
                    ip: caps[1].to_string(),
                    port,
                });
            }
        }

        if let Some(caps) = self.ostreams.captures(line) {
            if let Ok(count) = caps[2].parse() {
                events.push(LogEvent::StreamInfo {
                    ip: caps[1].to_string(),
                    count,
                });
            }
        }

        if let Some(caps) = self.refused.captures(line) {
            events.push(LogEvent::ConnectionRefused {
                ip: caps[1].to_string(),
            });
        }

        // A context pair only means something when the same line names the
        // subscriber it belongs to.
        if let (Some(ctx), Some(imsi)) = (self.ue_context.captures(line), self.imsi.captures(line))
        {
            if let (Ok(enb_id), Ok(mme_id)) = (ctx[1].parse(), ctx[2].parse()) {
                events.push(LogEvent::ContextAssigned {
                    imsi: imsi[1].to_string(),
                    enb_ue_s1ap_id: enb_id,
                    mme_ue_s1ap_id: mme_id,
                });
            }
        }

        if let Some(caps) = self.attach.captures(line) {
            let imsi = caps[1].to_string();
            events.push(match &caps[2] {
                "Attach request" => LogEvent::AttachRequested { imsi },
                _ => LogEvent::AttachCompleted { imsi },
            });
        }

        if let Some(caps) = self.detach.captures(line) {
            events.push(LogEvent::DetachRequested {
                imsi: caps[1].to_string(),
            });
        }

        if let Some(caps) = self.session_removed.captures(line) {
            events.push(LogEvent::SessionRemoved {
                imsi: caps[1].to_string(),
                apn: caps[2].to_string(),
            });
        }

        if let Some(caps) = self.enb_ue_count.captures(line) {
            if let Ok(value) = caps[1].parse() {
                events.push(LogEvent::CounterUpdate {
                    kind: CounterKind::EnbUe,
                    value,
                });
            }
        }

        if let Some(caps) = self.mme_session_count.captures(line) {
            if let Ok(value) = caps[1].parse() {
                events.push(LogEvent::CounterUpdate {
                    kind: CounterKind::MmeSession,
                    value,
                });
            }
        }

        ParsedLine {
            timestamp: self.extract_timestamp(line),
            events,
        }
    }

    /// Parse a whole window of lines, preserving file order.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ParsedLine> {
        lines.iter().map(|l| self.parse_line(l.as_ref())).collect()
    }

    /// Extract the `MM/DD HH:MM:SS.mmm` token from a line.
    ///
    /// The MME omits the year, so the current wall-clock year is assumed.
    /// Entries read across a year boundary are misdated by design; the
    /// window is minutes-to-hours deep, so this only matters in the first
    /// moments of January.
    fn extract_timestamp(&self, line: &str) -> Option<DateTime<Utc>> {
        let caps = self.timestamp.captures(line)?;
        let with_year = format!("{}/{}", Utc::now().year(), &caps[1]);
        NaiveDateTime::parse_from_str(&with_year, "%Y/%m/%d %H:%M:%S%.3f")
            .ok()
            .map(|dt| dt.and_utc())
    }
}

impl Default for LogPatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn events(line: &str) -> Vec<LogEvent> {
        LogPatterns::new().parse_line(line).events
    }

    #[test]
    fn accepted_rule() {
        assert_eq!(
            events("01/17 09:12:25.332: [mme] INFO: eNB-S1 accepted[10.0.1.14]:3223"),
            vec![LogEvent::ConnectionAccepted {
                ip: "10.0.1.14".into(),
                port: 3223
            }]
        );
    }

    #[test]
    fn refused_rule() {
        assert_eq!(
            events("eNB-S1[10.0.1.14] connection refused!!!"),
            vec![LogEvent::ConnectionRefused {
                ip: "10.0.1.14".into()
            }]
        );
    }

    #[test]
    fn ostreams_rule() {
        assert_eq!(
            events("eNB-S1[10.48.0.159] max_num_of_ostreams : 10"),
            vec![LogEvent::StreamInfo {
                ip: "10.48.0.159".into(),
                count: 10
            }]
        );
    }

    #[test]
    fn attach_request_and_complete() {
        assert_eq!(
            events("[315010000000010] Attach request"),
            vec![LogEvent::AttachRequested {
                imsi: "315010000000010".into()
            }]
        );
        assert_eq!(
            events("[315010000000010] Attach complete"),
            vec![LogEvent::AttachCompleted {
                imsi: "315010000000010".into()
            }]
        );
    }

    #[test]
    fn detach_rule() {
        assert_eq!(
            events("[315010000000010] Detach request"),
            vec![LogEvent::DetachRequested {
                imsi: "315010000000010".into()
            }]
        );
    }

    #[test]
    fn context_requires_imsi_on_same_line() {
        // Both tokens present → event.
        assert_eq!(
            events("IMSI[315010000000010] ENB_UE_S1AP_ID[167] MME_UE_S1AP_ID[36]"),
            vec![LogEvent::ContextAssigned {
                imsi: "315010000000010".into(),
                enb_ue_s1ap_id: 167,
                mme_ue_s1ap_id: 36
            }]
        );
        // Context pair alone is meaningless.
        assert_eq!(events("ENB_UE_S1AP_ID[167] MME_UE_S1AP_ID[36]"), vec![]);
    }

    #[test]
    fn session_removed_rule() {
        assert_eq!(
            events("Removed Session: UE IMSI:[315010000000010] APN:[internet]"),
            vec![LogEvent::SessionRemoved {
                imsi: "315010000000010".into(),
                apn: "internet".into()
            }]
        );
    }

    #[test]
    fn counter_rules_added_and_removed() {
        assert_eq!(
            events("[Added] Number of eNB-UEs is now 3"),
            vec![LogEvent::CounterUpdate {
                kind: CounterKind::EnbUe,
                value: 3
            }]
        );
        assert_eq!(
            events("[Removed] Number of MME-Sessions is now 0"),
            vec![LogEvent::CounterUpdate {
                kind: CounterKind::MmeSession,
                value: 0
            }]
        );
    }

    #[test]
    fn timestamp_token_parsed_with_current_year() {
        let parsed = LogPatterns::new()
            .parse_line("01/17 09:12:25.332: [mme] INFO: eNB-S1 accepted[10.0.1.14]:3223");
        let ts = parsed.timestamp.expect("timestamp token present");
        assert_eq!(ts.year(), Utc::now().year());
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 12);
        assert_eq!(ts.second(), 25);
        assert_eq!(ts.timestamp_subsec_millis(), 332);
        // The signal on the same line is still extracted.
        assert_eq!(parsed.events.len(), 1);
    }

    #[test]
    fn unmatched_line_yields_nothing() {
        let parsed = LogPatterns::new().parse_line("[mme] DEBUG: s1ap_state_operational()");
        assert!(parsed.events.is_empty());
        assert!(parsed.timestamp.is_none());
    }

    #[test]
    fn short_imsi_does_not_match_attach() {
        assert!(events("[12345] Attach request").is_empty());
    }

    #[test]
    fn window_order_is_preserved() {
        let patterns = LogPatterns::new();
        let lines = vec!["[315010000000010] Attach request", "[315010000000010] Attach complete"];
        let parsed = patterns.parse_lines(&lines);
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0].events[0], LogEvent::AttachRequested { .. }));
        assert!(matches!(parsed[1].events[0], LogEvent::AttachCompleted { .. }));
    }
}
