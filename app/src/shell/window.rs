//! The UI window as seen from the backend.
//!
//! Handlers outlive windows: the user can close the window while a request
//! is still running. The bus therefore never holds a window directly; it
//! holds a [`WindowSlot`] and asks it for a live window right before each
//! send.

use anyhow::Result;
use shared::OutboundMessage;
use std::sync::{Arc, RwLock};

/// A UI surface that can receive outbound messages
pub trait WindowHandle: Send + Sync {
    /// True once the window has been closed or its transport is gone
    fn is_destroyed(&self) -> bool;

    fn send(&self, message: OutboundMessage) -> Result<()>;
}

/// Shared, replaceable reference to the current main window
#[derive(Clone, Default)]
pub struct WindowSlot {
    current: Arc<RwLock<Option<Arc<dyn WindowHandle>>>>,
}

impl WindowSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `window` the main window
    pub fn attach(&self, window: Arc<dyn WindowHandle>) {
        let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
        *current = Some(window);
    }

    /// Forget the main window (it was closed)
    pub fn clear(&self) {
        let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
        *current = None;
    }

    /// The main window, if there is one and it has not been destroyed
    pub fn live(&self) -> Option<Arc<dyn WindowHandle>> {
        let current = self.current.read().unwrap_or_else(|p| p.into_inner());
        current
            .as_ref()
            .filter(|window| !window.is_destroyed())
            .cloned()
    }
}
