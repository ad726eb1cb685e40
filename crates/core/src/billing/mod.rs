//! Timesheet/expense aggregation, invoice totals, partner shares and split planning.

pub mod expense;
pub mod partner;
pub mod split;
pub mod timesheet;
pub mod totals;

#[cfg(test)]
mod props;

pub use expense::{ExpenseAggregator, ExpenseLine, ExpenseTotals};
pub use partner::{PartnerAllocation, PartnerShareCalculator};
pub use split::{PlannedSplit, SplitError, SplitPlanner};
pub use timesheet::{DateGroup, TimesheetAggregation, TimesheetAggregator, TimesheetRow};
pub use totals::{InvoiceTotals, PaymentLedger, SplitPaymentTotal, payment_progress};
