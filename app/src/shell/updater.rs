//! Auto-update prompts.
//!
//! The updater itself (feed negotiation, downloads) is an external
//! collaborator. This module decides what the user is told for each
//! updater event and whether to restart into a downloaded update.

use async_trait::async_trait;
use tracing::{error, info};

pub const APP_TITLE: &str = "Konza Pizza Manager";

/// Index of the OK button in every update prompt
pub const OK_RESPONSE: usize = 0;

#[derive(Debug, Clone, PartialEq)]
pub enum UpdaterEvent {
    CheckingForUpdate,
    UpdateAvailable { version: String },
    UpdateNotAvailable { version: String },
    Error { message: String },
    UpdateDownloaded { version: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Info,
    Error,
}

/// A message box shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePrompt {
    pub kind: PromptKind,
    pub buttons: Vec<String>,
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
}

impl UpdatePrompt {
    fn ok(kind: PromptKind, title: String, message: &str) -> Self {
        Self {
            kind,
            buttons: vec!["OK".to_string()],
            title,
            message: message.to_string(),
            detail: None,
        }
    }
}

/// Shows message boxes; resolves with the index of the button pressed
#[async_trait]
pub trait PromptDialog: Send + Sync {
    async fn show(&self, prompt: &UpdatePrompt) -> usize;
}

/// The platform updater
pub trait Updater: Send + Sync {
    fn quit_and_install(&self);
}

/// The prompt for an updater event, if the user should see one
pub fn prompt_for(event: &UpdaterEvent) -> Option<UpdatePrompt> {
    match event {
        UpdaterEvent::CheckingForUpdate | UpdaterEvent::UpdateNotAvailable { .. } => None,
        UpdaterEvent::UpdateAvailable { version } => Some(UpdatePrompt::ok(
            PromptKind::Info,
            format!("{} v{}", APP_TITLE, version),
            "An update is available, please press OK to apply new update.",
        )),
        UpdaterEvent::Error { message } => {
            let mut prompt = UpdatePrompt::ok(
                PromptKind::Error,
                "Auto Updater Failed".to_string(),
                "Please restart the application. If this continues to happen, just close the dialog and ignore.",
            );
            prompt.detail = Some(message.clone());
            Some(prompt)
        }
        UpdaterEvent::UpdateDownloaded { version } => Some(UpdatePrompt::ok(
            PromptKind::Info,
            format!("{} v{}", APP_TITLE, version),
            "Update has been successfully downloaded, press OK to update and restart.",
        )),
    }
}

/// Whether the dialog response to `event` means "install now"
pub fn should_install(event: &UpdaterEvent, response: usize) -> bool {
    matches!(event, UpdaterEvent::UpdateDownloaded { .. }) && response == OK_RESPONSE
}

/// Log the event, prompt the user if needed, and install when confirmed
pub async fn handle_updater_event(event: &UpdaterEvent, dialog: &dyn PromptDialog, updater: &dyn Updater) {
    match event {
        UpdaterEvent::CheckingForUpdate => info!("Checking for update."),
        UpdaterEvent::UpdateNotAvailable { version } => info!("Update not available. Current version {}", version),
        UpdaterEvent::Error { message } => error!("Error in auto-updater. {}", message),
        UpdaterEvent::UpdateAvailable { version } | UpdaterEvent::UpdateDownloaded { version } => {
            info!("Update {} event: {:?}", version, event)
        }
    }

    let Some(prompt) = prompt_for(event) else {
        return;
    };
    let response = dialog.show(&prompt).await;
    if should_install(event, response) {
        info!("Restarting to install update");
        updater.quit_and_install();
    }
}
