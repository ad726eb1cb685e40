//! Core invoice financial logic for lexbill.
//!
//! This crate contains pure business logic with ZERO web or http dependencies.
//! Every function here is a synchronous computation over already-fetched data:
//! identical inputs always produce identical outputs.
//!
//! # Modules
//!
//! - `currency` - Exchange rates and draft-aware currency conversion
//! - `invoice` - Invoice, timesheet, expense, payment and partner records
//! - `billing` - Timesheet/expense aggregation, totals, partner shares, split planning
//! - `edit` - Keyed store of pending timesheet edits
//! - `summary` - The full aggregation pipeline for one invoice snapshot
//! - `warning` - Non-fatal billing anomalies
//!
//! Bad input never panics or aborts a computation. Conversions degrade to zero
//! or pass-through values and attach a [`warning::BillingWarning`] that is also
//! logged, so anomalies stay visible without breaking rendering.

pub mod billing;
pub mod currency;
pub mod edit;
pub mod invoice;
pub mod summary;
pub mod warning;

pub use billing::{
    ExpenseAggregator, ExpenseTotals, InvoiceTotals, PartnerAllocation, PartnerShareCalculator,
    SplitPlanner, TimesheetAggregation, TimesheetAggregator, TimesheetRow,
};
pub use currency::{Conversion, CurrencyConverter, ExchangeRates};
pub use edit::{EditError, EditSession, TimesheetEdit};
pub use invoice::{
    AggregationMode, Discount, DiscountType, ExpenseEntry, Invoice, InvoiceStatus, PartnerShare,
    Payment, SplitInvoice, TimesheetEntry,
};
pub use summary::{BillingPeriod, InvoiceSnapshot, InvoiceSummary};
pub use warning::{BillingWarning, Diagnostics};
