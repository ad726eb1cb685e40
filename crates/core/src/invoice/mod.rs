//! Invoice records and the entries billed on them.

pub mod entries;
pub mod status;
pub mod types;

pub use entries::{ExpenseEntry, Payment, TimesheetEntry};
pub use status::{AggregationMode, InvoiceStatus};
pub use types::{Discount, DiscountType, Invoice, PartnerShare, SplitInvoice};
