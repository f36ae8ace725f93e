//! The event bus: runs handlers and reports back to the window.
//!
//! Every inbound request becomes its own task. Requests are not ordered
//! against each other and invocations of one handler are never serialized;
//! a handler that needs mutual exclusion takes care of it itself. Each
//! request produces at most one outbound message:
//!
//! - the handler's own event with its result, when the result is not empty
//! - `Error` with the stringified failure, when the handler fails or panics
//! - nothing, when the result is empty or no live window is left

use serde_json::Value;
use shared::{Event, OutboundMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use super::{is_empty_result, DispatchError, EventMap, Handler, InboundMessage, SourceEvent};
use crate::backend::ServiceRegistry;
use crate::shell::WindowSlot;

#[derive(Clone)]
pub struct EventBus {
    registry: Arc<ServiceRegistry>,
    window: WindowSlot,
    event_map: Arc<EventMap>,
}

impl EventBus {
    pub fn new(registry: Arc<ServiceRegistry>, window: WindowSlot) -> Self {
        let event_map = EventMap::new();
        info!("Registered event channels: {:?}", event_map.channels());
        Self {
            registry,
            window,
            event_map: Arc::new(event_map),
        }
    }

    /// Spawn the handler for `message`. Returns `None` when no handler
    /// listens on the message's channel.
    pub fn dispatch(&self, message: InboundMessage) -> Option<JoinHandle<()>> {
        let task = self.prepare(message)?;
        Some(tokio::spawn(task))
    }

    /// Dispatch every message from `inbound` until the channel closes, then
    /// wait for the handlers still running.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>) {
        let mut tasks = JoinSet::new();

        while let Some(message) = inbound.recv().await {
            if let Some(task) = self.prepare(message) {
                tasks.spawn(task);
            }
            while tasks.try_join_next().is_some() {}
        }

        debug!("Inbound channel closed, waiting for {} handlers", tasks.len());
        while tasks.join_next().await.is_some() {}
    }

    fn prepare(&self, message: InboundMessage) -> Option<impl std::future::Future<Output = ()> + Send + 'static> {
        let Some((event, handler)) = self.event_map.lookup(&message.channel) else {
            warn!("No handler registered for channel '{}', dropping request", message.channel);
            return None;
        };

        info!("Dispatching {} from {}", event, message.source.sender);
        Some(invoke(
            self.registry.clone(),
            self.window.clone(),
            event,
            handler,
            message.source,
            message.payload,
        ))
    }
}

/// Run one handler to completion and send its single reply
pub(crate) async fn invoke(
    registry: Arc<ServiceRegistry>,
    window: WindowSlot,
    event: Event,
    handler: Handler,
    source: SourceEvent,
    payload: Value,
) {
    // A nested task turns a panicking handler into a JoinError
    let outcome = match tokio::spawn(handler(registry, source, payload)).await {
        Ok(result) => result,
        Err(join_error) => Err(DispatchError::HandlerPanic {
            event,
            message: join_error.to_string(),
        }
        .into()),
    };

    match outcome {
        Ok(Some(value)) if !is_empty_result(&value) => {
            send_to_window(&window, event, value);
        }
        Ok(_) => debug!("{} finished with nothing to report", event),
        Err(e) => {
            error!("❌ {} failed: {:#}", event, e);
            send_to_window(&window, Event::Error, Value::String(format!("{:#}", e)));
        }
    }
}

fn send_to_window(window: &WindowSlot, event: Event, payload: Value) {
    let Some(target) = window.live() else {
        debug!("No live window, dropping {} reply", event);
        return;
    };

    if let Err(e) = target.send(OutboundMessage { event, payload }) {
        error!("Failed to send {} to window: {:#}", event, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::io::events::HandlerFuture;
    use crate::backend::domain::ExportError;
    use crate::backend::storage::{ExportSink, HomeFolderExporter};
    use crate::shell::window::testing::RecordingWindow;
    use serde_json::json;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};
    use tokio::sync::Notify;

    fn registry(temp_dir: &TempDir) -> Arc<ServiceRegistry> {
        let sink = HomeFolderExporter::new(temp_dir.path().to_path_buf());
        Arc::new(ServiceRegistry::with_sink(Arc::new(sink)))
    }

    fn window_slot() -> (WindowSlot, Arc<RecordingWindow>) {
        let slot = WindowSlot::new();
        let window = RecordingWindow::new();
        slot.attach(window.clone());
        (slot, window)
    }

    fn resolves_with_argument(_: Arc<ServiceRegistry>, _: SourceEvent, argument: Value) -> HandlerFuture {
        Box::pin(async move { Ok::<_, anyhow::Error>(Some(argument)) })
    }

    fn resolves_empty(_: Arc<ServiceRegistry>, _: SourceEvent, _: Value) -> HandlerFuture {
        Box::pin(async move { Ok::<Option<Value>, anyhow::Error>(None) })
    }

    fn fails(_: Arc<ServiceRegistry>, _: SourceEvent, _: Value) -> HandlerFuture {
        Box::pin(async move { Err::<Option<Value>, _>(anyhow::anyhow!("payroll file is locked")) })
    }

    fn panics(_: Arc<ServiceRegistry>, _: SourceEvent, _: Value) -> HandlerFuture {
        Box::pin(async move {
            if true {
                panic!("handler exploded");
            }
            Ok::<Option<Value>, anyhow::Error>(None)
        })
    }

    async fn run_handler(window: &WindowSlot, handler: Handler, payload: Value) {
        let temp_dir = tempdir().unwrap();
        invoke(
            registry(&temp_dir),
            window.clone(),
            Event::PreviewPayrollStatement,
            handler,
            SourceEvent::new("test"),
            payload,
        )
        .await;
    }

    #[tokio::test]
    async fn test_success_sends_one_message_tagged_with_own_event() {
        let (slot, window) = window_slot();

        run_handler(&slot, resolves_with_argument, json!({"ok": true})).await;

        let sent = window.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, Event::PreviewPayrollStatement);
        assert_eq!(sent[0].payload, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_empty_results_send_nothing() {
        let (slot, window) = window_slot();

        run_handler(&slot, resolves_empty, Value::Null).await;
        run_handler(&slot, resolves_with_argument, Value::Null).await;
        run_handler(&slot, resolves_with_argument, json!("")).await;
        run_handler(&slot, resolves_with_argument, json!(false)).await;

        assert!(window.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failure_sends_one_error_message() {
        let (slot, window) = window_slot();

        run_handler(&slot, fails, Value::Null).await;

        let sent = window.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, Event::Error);
        assert_eq!(sent[0].payload, json!("payroll file is locked"));
    }

    #[tokio::test]
    async fn test_panic_is_reported_not_propagated() {
        let (slot, window) = window_slot();

        run_handler(&slot, panics, Value::Null).await;

        let sent = window.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event, Event::Error);
        assert!(sent[0].payload.as_str().unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn test_destroyed_window_gets_nothing() {
        let (slot, window) = window_slot();
        window.destroy();

        run_handler(&slot, resolves_with_argument, json!("result")).await;
        run_handler(&slot, fails, Value::Null).await;

        assert!(window.sent().is_empty());
    }

    #[tokio::test]
    async fn test_no_window_still_runs_handler() {
        let temp_dir = tempdir().unwrap();
        let bus = EventBus::new(registry(&temp_dir), WindowSlot::new());
        let message = InboundMessage::new(
            Event::ExportToHomeFolder,
            SourceEvent::new("test"),
            json!({ "content": "!Type:Bank\n", "fileName": "late.qif" }),
        );

        bus.dispatch(message).unwrap().await.unwrap();

        assert!(temp_dir.path().join("late.qif").exists());
    }

    #[tokio::test]
    async fn test_unknown_channel_is_dropped() {
        let temp_dir = tempdir().unwrap();
        let (slot, window) = window_slot();
        let bus = EventBus::new(registry(&temp_dir), slot);
        let message = InboundMessage {
            channel: "Error".to_string(),
            source: SourceEvent::new("test"),
            payload: Value::Null,
        };

        assert!(bus.dispatch(message).is_none());
        assert!(window.sent().is_empty());
    }

    #[tokio::test]
    async fn test_run_answers_every_request_then_returns() {
        let temp_dir = tempdir().unwrap();
        let (slot, window) = window_slot();
        let bus = EventBus::new(registry(&temp_dir), slot);
        let (tx, rx) = mpsc::channel(8);

        let payroll = json!({
            "date": "2023-03-05",
            "name": "Downtown",
            "employees": [{ "checkNumber": "7", "netPay": 1500.25 }]
        });
        tx.send(InboundMessage::new(Event::PreviewPayrollStatement, SourceEvent::new("a"), payroll))
            .await
            .unwrap();
        tx.send(InboundMessage::new(Event::PreviewPayrollStatement, SourceEvent::new("b"), json!(42)))
            .await
            .unwrap();
        tx.send(InboundMessage::new(
            Event::ExportToHomeFolder,
            SourceEvent::new("c"),
            json!({ "content": "x", "fileName": "x.qif" }),
        ))
        .await
        .unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), bus.run(rx)).await.unwrap();

        let sent = window.sent();
        assert_eq!(sent.len(), 2);
        let preview = sent.iter().find(|m| m.event == Event::PreviewPayrollStatement).unwrap();
        assert!(preview.payload["content"].as_str().unwrap().contains("D3/5'2023\nT-1500.25\n"));
        assert!(sent.iter().any(|m| m.event == Event::Error));
        assert!(temp_dir.path().join("x.qif").exists());
    }

    /// Sink that holds back exports for stores named `slow` until released
    #[derive(Default)]
    struct GatedSink {
        release: Notify,
    }

    #[async_trait]
    impl ExportSink for GatedSink {
        async fn export_to_home_folder(&self, _content: &str, file_name: &str) -> Result<PathBuf, ExportError> {
            if file_name.ends_with("-slow.qif") {
                self.release.notified().await;
            }
            Ok(PathBuf::from(file_name))
        }
    }

    fn payroll(store: &str) -> Value {
        json!({
            "date": "2023-01-01",
            "name": store,
            "employees": [{ "checkNumber": "1", "netPay": 10 }]
        })
    }

    async fn wait_for_replies(window: &RecordingWindow, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while window.sent().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    async fn assert_fast_request_overtakes_slow_one(fast: InboundMessage, fast_event: Event) {
        let sink = Arc::new(GatedSink::default());
        let (slot, window) = window_slot();
        let bus = EventBus::new(Arc::new(ServiceRegistry::with_sink(sink.clone())), slot);
        let (tx, rx) = mpsc::channel(8);
        let running = tokio::spawn(bus.run(rx));

        tx.send(InboundMessage::new(Event::ExportPayrollStatement, SourceEvent::new("slow"), payroll("slow")))
            .await
            .unwrap();
        tx.send(fast).await.unwrap();
        drop(tx);

        wait_for_replies(&window, 1).await;
        let first = window.sent().remove(0);
        assert_eq!(first.event, fast_event);
        assert!(first.payload["fileName"].as_str().unwrap().ends_with("-fast.qif"));

        sink.release.notify_one();
        tokio::time::timeout(Duration::from_secs(5), running).await.unwrap().unwrap();

        let sent = window.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].event, Event::ExportPayrollStatement);
        assert_eq!(sent[1].payload["fileName"], json!("ExportedPayroll-2023-01-01-slow.qif"));
    }

    #[tokio::test]
    async fn test_distinct_events_are_not_ordered() {
        let fast = InboundMessage::new(Event::PreviewPayrollStatement, SourceEvent::new("fast"), payroll("fast"));
        assert_fast_request_overtakes_slow_one(fast, Event::PreviewPayrollStatement).await;
    }

    #[tokio::test]
    async fn test_same_handler_runs_concurrently() {
        let fast = InboundMessage::new(Event::ExportPayrollStatement, SourceEvent::new("fast"), payroll("fast"));
        assert_fast_request_overtakes_slow_one(fast, Event::ExportPayrollStatement).await;
    }
}
