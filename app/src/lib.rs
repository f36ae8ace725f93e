pub mod backend;
pub mod config;
pub mod logging;
pub mod shell;

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use backend::io::stdio::{read_inbound, JsonLineWindow};
use backend::io::EventBus;
use backend::initialize_backend;
use config::AppConfig;
use shell::{WindowHandle, WindowSlot};

/// Requests buffered between the transport and the bus
const INBOUND_CAPACITY: usize = 64;

/// Start the backend on stdin/stdout with configuration from the environment
pub async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    logging::init(&config);
    if config.is_debug_enabled() {
        info!("Debug diagnostics enabled ({:?})", config.environment);
    }

    let (window, output) = JsonLineWindow::stdout();
    run_with(config, tokio::io::stdin(), Arc::new(window)).await?;
    output.await?;
    Ok(())
}

/// Serve requests read from `input` and reply to `window` until input ends
pub async fn run_with<R>(config: AppConfig, input: R, window: Arc<dyn WindowHandle>) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let registry = Arc::new(initialize_backend(&config));

    let window_slot = WindowSlot::new();
    window_slot.attach(window);

    let bus = EventBus::new(registry, window_slot.clone());
    let (sender, receiver) = mpsc::channel(INBOUND_CAPACITY);
    let reader = tokio::spawn(read_inbound(BufReader::new(input), sender));

    info!("🚀 Backend ready, waiting for requests");
    bus.run(receiver).await;

    let forwarded = reader.await??;
    window_slot.clear();
    info!("Input closed after {} requests, shutting down", forwarded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::window::testing::RecordingWindow;
    use serde_json::json;
    use shared::{Event, ExportPayrollStatementResponse};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_full_flow() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::with_export_dir(temp_dir.path().join("exports"));
        let window = RecordingWindow::new();

        let export = json!({
            "event": "ExportPayrollStatement",
            "payload": {
                "date": "2023-01-01",
                "name": "JaneStore",
                "employees": [
                    { "checkNumber": "101", "netPay": 1000 },
                    { "checkNumber": "102", "netPay": 2000 }
                ]
            }
        });
        let bad_date = json!({
            "event": "ExportPayrollStatement",
            "payload": { "date": "someday", "name": "JaneStore", "employees": [{ "checkNumber": "1", "netPay": 1 }] }
        });
        let raw_write = json!({
            "event": "ExportToHomeFolder",
            "payload": { "content": "note", "fileName": "note.txt" }
        });
        let input = format!("{}\n{}\n{}\n{{\"event\":\"Unknown\"}}\n", export, bad_date, raw_write);

        run_with(config, std::io::Cursor::new(input.into_bytes()), window.clone())
            .await
            .unwrap();

        let sent = window.sent();
        assert_eq!(sent.len(), 2);

        let exported = sent
            .iter()
            .find(|m| m.event == Event::ExportPayrollStatement)
            .unwrap();
        let response: ExportPayrollStatementResponse = serde_json::from_value(exported.payload.clone()).unwrap();
        assert_eq!(response.file_name, "ExportedPayroll-2023-01-01-JaneStore.qif");

        let file = temp_dir.path().join("exports").join(&response.file_name);
        assert_eq!(
            std::fs::read_to_string(file).unwrap(),
            "!Type:Bank\nD1/1'2023\nT-1000\nN101\nPPayroll\nLCost of Goods:Labor\n^\nD1/1'2023\nT-2000\nN102\nPPayroll\nLCost of Goods:Labor\n"
        );

        let failure = sent.iter().find(|m| m.event == Event::Error).unwrap();
        assert!(failure.payload.as_str().unwrap().contains("someday"));

        assert!(temp_dir.path().join("exports").join("note.txt").exists());
    }
}
