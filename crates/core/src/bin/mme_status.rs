// crates/core/src/bin/mme_status.rs
//! Print the current S1AP and UE state as JSON.
//!
//! Operator/debug tool: `mme-status [LOG_PATH]`. The path may also come
//! from `MME_LOG_PATH`; the deployment default is used otherwise.

use anyhow::Result;
use mme_view_core::{MmeLogMonitor, MonitorConfig};
use tracing_subscriber::EnvFilter;

fn configured_path() -> Option<String> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MME_LOG_PATH").ok())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = MonitorConfig::default();
    if let Some(path) = configured_path() {
        config = config.with_log_path(path);
    }
    let monitor = MmeLogMonitor::new(config);

    let status = serde_json::json!({
        "s1ap": monitor.connection_summary().await,
        "ue": monitor.session_summary().await,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
