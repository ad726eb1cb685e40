//! Client for the practice-management backend that owns invoice records.
//!
//! Fetches invoices, their timesheet/expense details, payments and splits,
//! normalizes the wire records and assembles an
//! [`InvoiceSnapshot`](lexbill_core::InvoiceSnapshot) for the core pipeline.

pub mod client;
pub mod dto;
pub mod error;
pub mod source;

pub use client::BackendClient;
pub use error::ClientError;
pub use source::InvoiceSource;
