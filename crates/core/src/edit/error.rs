//! Edit error types.

use lexbill_shared::{AppError, TimesheetId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::invoice::InvoiceStatus;

/// Reasons a timesheet edit is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The row has no backend identifier, so the edit could never be saved.
    #[error("Timesheet row for {lawyer_name} has no identifier and cannot be edited")]
    MissingIdentifier {
        /// Lawyer on the row.
        lawyer_name: String,
    },

    /// Hours cannot be negative.
    #[error("Hours cannot be negative, got {0}")]
    NegativeHours(Decimal),

    /// Hourly rate cannot be negative.
    #[error("Hourly rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    /// The edit changes nothing.
    #[error("Edit must change hours or hourly rate")]
    EmptyEdit,

    /// Only draft invoices accept timesheet edits.
    #[error("Invoice is {0} and its timesheets can no longer be edited")]
    InvoiceLocked(InvoiceStatus),

    /// No staged edit exists for this timesheet.
    #[error("No pending edit for timesheet {0}")]
    UnknownTimesheet(TimesheetId),
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::UnknownTimesheet(_) => Self::NotFound(err.to_string()),
            EditError::InvoiceLocked(_) | EditError::MissingIdentifier { .. } => {
                Self::BusinessRule(err.to_string())
            }
            EditError::NegativeHours(_) | EditError::NegativeRate(_) | EditError::EmptyEdit => {
                Self::Validation(err.to_string())
            }
        }
    }
}
