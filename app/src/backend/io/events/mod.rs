//! # Events
//!
//! Request routing between the UI window and the service registry.
//!
//! - **dispatch_map**: which handler serves which [`Event`]
//! - **handlers**: one async function per inbound event
//! - **bus**: runs handlers as independent tasks and sends at most one
//!   reply per request back to the window

pub mod bus;
pub mod dispatch_map;
pub mod handlers;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::Event;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::backend::ServiceRegistry;

pub use bus::EventBus;
pub use dispatch_map::EventMap;

/// `Some(value)` is sent back to the window; `None` means nothing to report
pub type HandlerResult = anyhow::Result<Option<Value>>;
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;
pub type Handler = fn(Arc<ServiceRegistry>, SourceEvent, Value) -> HandlerFuture;

/// Where an inbound request came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    /// Transport-specific sender label
    pub sender: String,
    pub received_at: DateTime<Utc>,
}

impl SourceEvent {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            received_at: Utc::now(),
        }
    }
}

/// A request read off the transport, not yet matched to a handler
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// String form of the requested [`Event`]
    pub channel: String,
    pub source: SourceEvent,
    pub payload: Value,
}

impl InboundMessage {
    pub fn new(event: Event, source: SourceEvent, payload: Value) -> Self {
        Self {
            channel: event.to_string(),
            source,
            payload,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid argument for {event}")]
    InvalidArgument {
        event: Event,
        #[source]
        source: serde_json::Error,
    },
    #[error("Handler for {event} panicked: {message}")]
    HandlerPanic { event: Event, message: String },
}

/// Decode a handler's JSON argument
pub fn decode_argument<T: DeserializeOwned>(event: Event, argument: Value) -> Result<T, DispatchError> {
    serde_json::from_value(argument).map_err(|source| DispatchError::InvalidArgument { event, source })
}

/// Results that do not warrant a notification: `null`, `false`, `""` and `0`
pub fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
