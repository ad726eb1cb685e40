//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Converted amounts are rounded to 4 decimal places
//! - Use banker's rounding (round half to even)
//! - A failed conversion yields zero plus a warning, never a plausible-looking guess
//! - Products and sums are overflow-checked; an overflow is a failed conversion

use lexbill_shared::CurrencyCode;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::Serialize;
use tracing::debug;

use super::rates::ExchangeRates;
use crate::invoice::InvoiceStatus;
use crate::warning::BillingWarning;

/// Decimal places kept on converted amounts and derived rates.
pub const CONVERSION_DECIMAL_PLACES: u32 = 4;

/// Outcome of a single conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Converted amount (or the substitute value when conversion failed).
    pub amount: Decimal,
    /// Rate applied, when one was used.
    pub rate: Option<Decimal>,
    /// Set when the amount is a substitute rather than a real conversion.
    pub warning: Option<BillingWarning>,
}

impl Conversion {
    const fn unchanged(amount: Decimal) -> Self {
        Self {
            amount,
            rate: None,
            warning: None,
        }
    }

    const fn failed(warning: BillingWarning) -> Self {
        Self {
            amount: Decimal::ZERO,
            rate: None,
            warning: Some(warning),
        }
    }
}

/// Converts amounts into an invoice's currency.
pub struct CurrencyConverter;

impl CurrencyConverter {
    /// Convert `amount` from `from` into `to` using `rates`.
    ///
    /// - Zero amounts and same-currency conversions are returned unchanged
    ///   without a rate lookup.
    /// - A missing rate passes the amount through on a draft invoice, and
    ///   yields zero with [`BillingWarning::MissingExchangeRate`] otherwise.
    /// - A zero or negative rate yields zero with
    ///   [`BillingWarning::InvalidExchangeRate`].
    /// - A product outside the decimal range yields zero with
    ///   [`BillingWarning::ArithmeticOverflow`].
    ///
    /// # Example
    ///
    /// ```
    /// use lexbill_core::currency::{CurrencyConverter, ExchangeRates};
    /// use lexbill_core::invoice::InvoiceStatus;
    /// use lexbill_shared::CurrencyCode;
    /// use rust_decimal_macros::dec;
    ///
    /// let rates = ExchangeRates::new().with("USD", dec!(83.5));
    /// let result = CurrencyConverter::convert(
    ///     dec!(10),
    ///     &CurrencyCode::from("USD"),
    ///     &CurrencyCode::from("INR"),
    ///     &rates,
    ///     InvoiceStatus::Finalized,
    /// );
    /// assert_eq!(result.amount, dec!(835.0));
    /// ```
    #[must_use]
    pub fn convert(
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
        rates: &ExchangeRates,
        status: InvoiceStatus,
    ) -> Conversion {
        if amount.is_zero() || from == to {
            return Conversion::unchanged(amount);
        }

        match rates.get(from) {
            None if status.is_draft() => {
                debug!(from = %from, to = %to, "No rate yet on draft invoice, passing amount through");
                Conversion::unchanged(amount)
            }
            None => Conversion::failed(BillingWarning::MissingExchangeRate {
                from: from.clone(),
                to: to.clone(),
            }),
            Some(rate) if rate <= Decimal::ZERO => {
                Conversion::failed(BillingWarning::InvalidExchangeRate {
                    currency: from.clone(),
                    rate,
                })
            }
            Some(rate) => match apply_rate(amount, rate) {
                Some(converted) => Conversion {
                    amount: converted,
                    rate: Some(rate),
                    warning: None,
                },
                None => Conversion::failed(BillingWarning::ArithmeticOverflow {
                    operation: "currency conversion",
                }),
            },
        }
    }
}

/// Multiplies by a rate and rounds with banker's rounding; `None` on overflow.
#[must_use]
pub fn apply_rate(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(rate)
        .map(|product| round(product, CONVERSION_DECIMAL_PLACES))
}

/// Sum of `values`, or `None` if it leaves the decimal range.
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Round a decimal value using Banker's Rounding.
#[must_use]
pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}
