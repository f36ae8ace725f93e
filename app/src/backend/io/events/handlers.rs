//! One handler per inbound event.
//!
//! Handlers decode their argument, call into the registry and return the
//! value to report back to the window, or `None` when there is nothing to
//! report. Errors are returned as-is; the bus turns them into `Error`
//! messages.

use serde_json::Value;
use shared::{
    Event, ExportPayrollStatementResponse, ExportToHomeFolderRequest, PayrollParseResult,
    PreviewPayrollStatementResponse,
};
use std::sync::Arc;
use tracing::info;

use super::{decode_argument, HandlerFuture, HandlerResult, SourceEvent};
use crate::backend::ServiceRegistry;

/// Export a payroll run as a QIF statement into the export folder
pub fn export_payroll_statement(registry: Arc<ServiceRegistry>, source: SourceEvent, argument: Value) -> HandlerFuture {
    Box::pin(export_statement(registry, source, argument))
}

/// Render a payroll run as QIF without writing it
pub fn preview_payroll_statement(registry: Arc<ServiceRegistry>, source: SourceEvent, argument: Value) -> HandlerFuture {
    Box::pin(preview_statement(registry, source, argument))
}

/// Write text into the export folder. Nothing is reported back.
pub fn export_to_home_folder(registry: Arc<ServiceRegistry>, source: SourceEvent, argument: Value) -> HandlerFuture {
    Box::pin(write_export(registry, source, argument))
}

async fn export_statement(registry: Arc<ServiceRegistry>, source: SourceEvent, argument: Value) -> HandlerResult {
    let result: PayrollParseResult = decode_argument(Event::ExportPayrollStatement, argument)?;
    info!(
        "📄 EXPORT: payroll '{}' dated {} with {} employees (from {})",
        result.name,
        result.date,
        result.employees.len(),
        source.sender
    );

    let statement = registry
        .export_payroll_statement()
        .export_statement(&result, registry.export_sink())
        .await?;

    let response = ExportPayrollStatementResponse {
        file_name: statement.file_name,
        transaction_count: statement.transaction_count,
        content: statement.content,
    };
    Ok(Some(serde_json::to_value(response)?))
}

async fn preview_statement(registry: Arc<ServiceRegistry>, _source: SourceEvent, argument: Value) -> HandlerResult {
    let result: PayrollParseResult = decode_argument(Event::PreviewPayrollStatement, argument)?;
    let statement = registry.export_payroll_statement().build_statement(&result)?;

    let response = PreviewPayrollStatementResponse {
        file_name: statement.file_name,
        content: statement.content,
    };
    Ok(Some(serde_json::to_value(response)?))
}

async fn write_export(registry: Arc<ServiceRegistry>, source: SourceEvent, argument: Value) -> HandlerResult {
    let request: ExportToHomeFolderRequest = decode_argument(Event::ExportToHomeFolder, argument)?;
    info!("📁 EXPORT: writing {} (from {})", request.file_name, source.sender);
    registry
        .export_sink()
        .export_to_home_folder(&request.content, &request.file_name)
        .await?;
    Ok(None)
}
