//! # IO Module
//!
//! The boundary between the UI window and the domain services.
//!
//! - **events**: named-event routing, handler execution and replies
//! - **stdio**: JSON-lines transport used when running headless

pub mod events;
pub mod stdio;

pub use events::*;
