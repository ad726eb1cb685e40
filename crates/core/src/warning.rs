//! Non-fatal billing anomalies.
//!
//! Nothing in the aggregation pipeline fails hard. When an input cannot be used
//! as-is the computation substitutes a safe value (zero or the unconverted
//! amount) and records one of these warnings so a human can review the number.

use chrono::NaiveDate;
use lexbill_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A recoverable anomaly found while computing invoice figures.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingWarning {
    /// A conversion rate required on a non-draft invoice is absent.
    #[error("No exchange rate from {from} to {to}")]
    MissingExchangeRate {
        /// Source currency.
        from: CurrencyCode,
        /// Invoice currency.
        to: CurrencyCode,
    },

    /// A conversion rate is present but zero or negative.
    #[error("Invalid exchange rate {rate} for {currency}")]
    InvalidExchangeRate {
        /// Source currency the rate applies to.
        currency: CurrencyCode,
        /// The offending rate.
        rate: Decimal,
    },

    /// A timesheet row has no identifier, so edits to it cannot be saved.
    #[error("Timesheet row for {lawyer_name} has no identifier; edits cannot be saved")]
    MissingIdentifier {
        /// Lawyer on the row.
        lawyer_name: String,
        /// Date on the row, if any.
        date: Option<NaiveDate>,
    },

    /// The discount is larger than the subtotal, giving a negative final amount.
    #[error("Discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal {
        /// Computed subtotal.
        subtotal: Decimal,
        /// Computed discount amount.
        discount: Decimal,
    },

    /// More has been paid than the invoice is worth.
    #[error("Amount paid {amount_paid} exceeds final amount {final_amount}")]
    Overpayment {
        /// Final invoice amount.
        final_amount: Decimal,
        /// Amount paid so far.
        amount_paid: Decimal,
    },

    /// A figure exceeded the decimal range and was replaced by zero.
    #[error("Arithmetic overflow computing {operation}; using zero")]
    ArithmeticOverflow {
        /// What was being computed.
        operation: &'static str,
    },
}

impl BillingWarning {
    /// Stable machine-readable code for the warning.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingExchangeRate { .. } => "MISSING_EXCHANGE_RATE",
            Self::InvalidExchangeRate { .. } => "INVALID_EXCHANGE_RATE",
            Self::MissingIdentifier { .. } => "MISSING_IDENTIFIER",
            Self::DiscountExceedsSubtotal { .. } => "DISCOUNT_EXCEEDS_SUBTOTAL",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::ArithmeticOverflow { .. } => "ARITHMETIC_OVERFLOW",
        }
    }
}

/// Ordered, de-duplicated collection of warnings.
///
/// Every warning is logged once, when it is first recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<BillingWarning>);

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a warning unless an identical one is already present.
    pub fn record(&mut self, warning: BillingWarning) {
        if self.0.contains(&warning) {
            return;
        }
        warn!(code = warning.code(), "{warning}");
        self.0.push(warning);
    }

    /// Records every warning from an iterator.
    pub fn extend(&mut self, warnings: impl IntoIterator<Item = BillingWarning>) {
        for warning in warnings {
            self.record(warning);
        }
    }

    /// Folds in warnings already logged by another collection.
    pub fn merge(&mut self, other: Self) {
        for warning in other.0 {
            if !self.0.contains(&warning) {
                self.0.push(warning);
            }
        }
    }

    /// Unwraps a checked computation, substituting zero and recording
    /// [`BillingWarning::ArithmeticOverflow`] when it overflowed.
    pub fn zero_on_overflow(&mut self, value: Option<Decimal>, operation: &'static str) -> Decimal {
        value.unwrap_or_else(|| {
            self.record(BillingWarning::ArithmeticOverflow { operation });
            Decimal::ZERO
        })
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over recorded warnings in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, BillingWarning> {
        self.0.iter()
    }

    /// Consumes the collection.
    #[must_use]
    pub fn into_vec(self) -> Vec<BillingWarning> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a BillingWarning;
    type IntoIter = std::slice::Iter<'a, BillingWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
