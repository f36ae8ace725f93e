//! File-system export sink writing into a single configured folder.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::traits::ExportSink;
use crate::backend::domain::ExportError;

/// Writes exported files into the user's export folder
#[derive(Debug, Clone)]
pub struct HomeFolderExporter {
    export_dir: PathBuf,
}

impl HomeFolderExporter {
    pub fn new(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    fn write_error(&self, file_name: &str, source: std::io::Error) -> ExportError {
        error!(
            "Failed to write export file {} into {:?}: {}",
            file_name, self.export_dir, source
        );
        ExportError::Write {
            file_name: file_name.to_string(),
            dir: self.export_dir.clone(),
            source,
        }
    }
}

#[async_trait]
impl ExportSink for HomeFolderExporter {
    async fn export_to_home_folder(&self, content: &str, file_name: &str) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| self.write_error(file_name, e))?;

        let file_path = self.export_dir.join(file_name);
        tokio::fs::write(&file_path, content)
            .await
            .map_err(|e| self.write_error(file_name, e))?;

        info!("Wrote {} bytes to {:?}", content.len(), file_path);
        Ok(file_path)
    }
}
