//! Shared types, errors, and configuration for lexbill.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Currency codes
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, BackendConfig, BillingConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use types::{CurrencyCode, ExpenseId, InvoiceId, PaymentId, TimesheetId, UserId};
