//! # Storage Traits
//!
//! Abstractions over where exported files are written, so the domain layer
//! can run against a real folder or a test double.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::backend::domain::ExportError;

/// Destination for exported text files
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Write `content` under `file_name` in the user-visible export folder.
    /// Returns the full path that was written.
    async fn export_to_home_folder(&self, content: &str, file_name: &str) -> Result<PathBuf, ExportError>;
}
