//! Payroll statement export domain logic.
//!
//! Turns a parsed payroll run into one debit per paycheck and writes them
//! out as a QIF bank statement. The service only builds the file name and
//! text; writing is delegated to an [`ExportSink`].

use shared::{MoneyTransaction, PayrollParseResult};
use tracing::{debug, info};

use super::dates::simple_date;
use super::errors::ExportError;
use crate::backend::storage::ExportSink;

pub const LABOR_CATEGORY: &str = "Cost of Goods:Labor";
pub const PAYROLL_VENDOR: &str = "Payroll";
pub const BANK_HEADER: &str = "!Type:Bank";
pub const RECORD_SEPARATOR: &str = "^";

/// A rendered statement and the name it should be saved under
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollStatement {
    pub file_name: String,
    pub content: String,
    pub transaction_count: usize,
}

/// Export service for payroll bank statements
#[derive(Clone, Default)]
pub struct ExportPayrollStatementService;

impl ExportPayrollStatementService {
    pub fn new() -> Self {
        Self
    }

    /// Render the statement and hand it to the sink
    pub async fn export_statement(
        &self,
        result: &PayrollParseResult,
        sink: &dyn ExportSink,
    ) -> Result<PayrollStatement, ExportError> {
        let statement = self.build_statement(result)?;
        debug!("{}", statement.content);

        sink.export_to_home_folder(&statement.content, &statement.file_name)
            .await?;

        info!(
            "Exported {} payroll transactions as {}",
            statement.transaction_count, statement.file_name
        );
        Ok(statement)
    }

    /// Render the statement without writing it anywhere
    pub fn build_statement(&self, result: &PayrollParseResult) -> Result<PayrollStatement, ExportError> {
        let transactions = self.parse_to_transactions(result);
        let content = self.render_statement(&transactions)?;

        Ok(PayrollStatement {
            file_name: self.statement_file_name(result),
            content,
            transaction_count: transactions.len(),
        })
    }

    /// `ExportedPayroll-{date}-{name}.qif`, with date and name taken verbatim
    pub fn statement_file_name(&self, result: &PayrollParseResult) -> String {
        format!("ExportedPayroll-{}-{}.qif", result.date, result.name)
    }

    /// One labor debit per employee, in payroll order
    pub fn parse_to_transactions(&self, result: &PayrollParseResult) -> Vec<MoneyTransaction> {
        result
            .employees
            .iter()
            .map(|employee| MoneyTransaction {
                category: LABOR_CATEGORY.to_string(),
                date: result.date.clone(),
                memo: String::new(),
                number: employee.check_number.clone(),
                total: employee.net_pay,
                vendor: PAYROLL_VENDOR.to_string(),
            })
            .collect()
    }

    /// Serialize transactions as a QIF bank statement.
    ///
    /// Records are separated by a `^` line; the first record has none and
    /// nothing follows the last.
    pub fn render_statement(&self, transactions: &[MoneyTransaction]) -> Result<String, ExportError> {
        let mut builder = String::new();
        builder.push_str(BANK_HEADER);
        builder.push('\n');

        for (index, transaction) in transactions.iter().enumerate() {
            if index > 0 {
                builder.push_str(RECORD_SEPARATOR);
                builder.push('\n');
            }
            builder.push_str(&self.to_money_format(transaction)?);
        }

        Ok(builder)
    }

    fn to_money_format(&self, transaction: &MoneyTransaction) -> Result<String, ExportError> {
        // Negative zero would otherwise print as `-0`
        let total = if transaction.total == 0.0 { 0.0 } else { transaction.total };
        Ok(format!(
            "D{}\nT-{}\nN{}\nP{}\nL{}\n",
            simple_date(&transaction.date)?,
            total,
            transaction.number,
            transaction.vendor,
            transaction.category
        ))
    }
}
