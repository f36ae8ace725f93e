//! # Domain Module
//!
//! Business logic for Konza Pizza Manager, independent of the UI transport
//! and of where exported files end up.
//!
//! ## Module Organization
//!
//! - **export_payroll_statement_service**: payroll run -> QIF bank statement
//! - **dates**: statement date parsing and formatting
//! - **errors**: export failures

pub mod dates;
pub mod errors;
pub mod export_payroll_statement_service;

pub use dates::*;
pub use errors::*;
pub use export_payroll_statement_service::*;
