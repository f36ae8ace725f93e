//! The fixed table of inbound events and their handlers.

use shared::Event;
use std::collections::HashMap;

use super::handlers;
use super::Handler;

/// Handler serving `event`. `Error` only flows to the window, so it has none.
///
/// The match is exhaustive: adding an [`Event`] variant does not compile
/// until it is routed here. [`EventMap`] registers the variants listed in
/// [`Event::ALL`].
pub fn handler_for(event: Event) -> Option<Handler> {
    match event {
        Event::ExportPayrollStatement => Some(handlers::export_payroll_statement as Handler),
        Event::PreviewPayrollStatement => Some(handlers::preview_payroll_statement as Handler),
        Event::ExportToHomeFolder => Some(handlers::export_to_home_folder as Handler),
        Event::Error => None,
    }
}

/// Handlers keyed by channel name, built once at startup
#[derive(Clone)]
pub struct EventMap {
    routes: HashMap<String, (Event, Handler)>,
}

impl EventMap {
    pub fn new() -> Self {
        let routes = Event::ALL
            .into_iter()
            .filter_map(|event| handler_for(event).map(|handler| (event.to_string(), (event, handler))))
            .collect();
        Self { routes }
    }

    pub fn lookup(&self, channel: &str) -> Option<(Event, Handler)> {
        self.routes.get(channel).copied()
    }

    /// Registered channel names, sorted
    pub fn channels(&self) -> Vec<&str> {
        let mut channels: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        channels.sort_unstable();
        channels
    }
}

impl Default for EventMap {
    fn default() -> Self {
        Self::new()
    }
}
