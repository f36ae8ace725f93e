//! # Shell Module
//!
//! The desktop-shell collaborators the backend talks to: the main window
//! (through a liveness-checked slot) and the auto-updater prompts.

pub mod updater;
pub mod window;

pub use window::{WindowHandle, WindowSlot};
