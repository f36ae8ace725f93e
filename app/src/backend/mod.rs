//! # Backend Module
//!
//! Contains all non-UI logic for Konza Pizza Manager.
//!
//! - **Domain**: payroll export business rules
//! - **Storage**: where exported files are written
//! - **IO**: the event bus that connects the UI window to the services
//!
//! ```text
//! UI window
//!     ↓ named events
//! IO Layer (event bus, dispatch map, handlers)
//!     ↓
//! Domain Layer (services)
//!     ↓
//! Storage Layer (export folder)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;
use tracing::info;

use crate::backend::domain::ExportPayrollStatementService;
use crate::backend::storage::{ExportSink, HomeFolderExporter};
use crate::config::AppConfig;

/// Every backend service a handler can reach.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// swap a service out afterwards.
pub struct ServiceRegistry {
    export_payroll_statement_service: ExportPayrollStatementService,
    export_sink: Arc<dyn ExportSink>,
}

impl ServiceRegistry {
    /// Registry writing exports through `sink`
    pub fn with_sink(sink: Arc<dyn ExportSink>) -> Self {
        Self {
            export_payroll_statement_service: ExportPayrollStatementService::new(),
            export_sink: sink,
        }
    }

    pub fn export_payroll_statement(&self) -> &ExportPayrollStatementService {
        &self.export_payroll_statement_service
    }

    pub fn export_sink(&self) -> &dyn ExportSink {
        self.export_sink.as_ref()
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> ServiceRegistry {
    let sink = HomeFolderExporter::new(config.export_dir.clone());
    info!("Setting up export folder at {:?}", sink.export_dir());

    info!("Setting up service registry");
    ServiceRegistry::with_sink(Arc::new(sink))
}
