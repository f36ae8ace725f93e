use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single employee line from a parsed payroll run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Check number printed on the paycheck
    pub check_number: String,
    /// Take-home amount after withholdings
    pub net_pay: f64,
    #[serde(default)]
    pub gross_pay: f64,
    #[serde(default)]
    pub hours: f64,
}

/// Output of the payroll parser: one payroll run for one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollParseResult {
    /// Payroll date as entered upstream (e.g. "2023-01-01")
    pub date: String,
    /// Store or run label
    pub name: String,
    pub employees: Vec<Employee>,
}

/// A money movement ready to be written to a bank statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyTransaction {
    /// Colon-separated category path, e.g. "Cost of Goods:Labor"
    pub category: String,
    pub date: String,
    pub memo: String,
    /// Check number
    pub number: String,
    /// Positive amount; statements write it as a debit
    pub total: f64,
    pub vendor: String,
}

/// Named events exchanged between the UI and the backend.
///
/// The string form of each variant is the channel key on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Format a payroll run as QIF and write it to the export folder
    ExportPayrollStatement,
    /// Format a payroll run as QIF without writing anything
    PreviewPayrollStatement,
    /// Write arbitrary text under a file name in the export folder
    ExportToHomeFolder,
    /// Reserved outbound event carrying a handler failure
    Error,
}

impl Event {
    /// Every event, in declaration order.
    ///
    /// Channel registration walks this list, so a new variant must be added
    /// here as well as to the enum.
    pub const ALL: [Event; 4] = [
        Event::ExportPayrollStatement,
        Event::PreviewPayrollStatement,
        Event::ExportToHomeFolder,
        Event::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ExportPayrollStatement => "ExportPayrollStatement",
            Event::PreviewPayrollStatement => "PreviewPayrollStatement",
            Event::ExportToHomeFolder => "ExportToHomeFolder",
            Event::Error => "Error",
        }
    }

    /// Events the UI may send to the backend. `Error` only flows outward.
    pub fn is_inbound(&self) -> bool {
        !matches!(self, Event::Error)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Event::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("Unknown event: '{}'", s))
    }
}

/// Argument of `Event::ExportToHomeFolder`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportToHomeFolderRequest {
    pub content: String,
    pub file_name: String,
}

/// Result of `Event::ExportPayrollStatement`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayrollStatementResponse {
    pub file_name: String,
    pub transaction_count: usize,
    /// The QIF text that was exported, for display
    pub content: String,
}

/// Result of `Event::PreviewPayrollStatement`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayrollStatementResponse {
    pub file_name: String,
    pub content: String,
}

/// Message from the UI to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

/// Message from the backend to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub event: Event,
    pub payload: Value,
}
