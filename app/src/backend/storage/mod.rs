//! # Storage Module
//!
//! Where exported files land. The app owns no database; the only storage
//! concern is writing statements into a user-visible folder.

pub mod home_folder;
pub mod traits;

pub use home_folder::HomeFolderExporter;
pub use traits::ExportSink;
