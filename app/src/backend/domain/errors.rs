//! Errors raised while turning payroll data into export files.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
    #[error("Failed to write '{file_name}' to {}", .dir.display())]
    Write {
        file_name: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
