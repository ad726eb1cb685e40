//! Expense aggregation.
//!
//! Expenses are always recorded in one base currency (INR unless configured
//! otherwise). Billing them on a foreign-currency invoice multiplies by the
//! invoice's rate for the base currency. When that rate is unusable the
//! original amount is billed unconverted and a warning is raised.

use chrono::NaiveDate;
use lexbill_shared::{CurrencyCode, ExpenseId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::currency::{ExchangeRates, apply_rate, checked_sum};
use crate::invoice::ExpenseEntry;
use crate::warning::{BillingWarning, Diagnostics};

/// One expense as billed on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    /// Expense ID.
    pub id: Option<ExpenseId>,
    /// Expense category.
    pub category: String,
    /// Expense description.
    pub description: Option<String>,
    /// Expense date.
    pub date: Option<NaiveDate>,
    /// Amount in the base currency.
    pub original_amount: Decimal,
    /// Base currency.
    pub original_currency: CurrencyCode,
    /// Amount in the invoice currency.
    pub billed_amount: Decimal,
    /// Invoice currency, or the base currency if conversion fell back.
    pub billed_currency: CurrencyCode,
    /// Rate applied, if any.
    pub exchange_rate: Option<Decimal>,
}

/// Expense totals for an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseTotals {
    /// Sum of original amounts, in the base currency.
    pub total_original: Decimal,
    /// Sum of billed amounts, in the invoice currency.
    pub total_billed: Decimal,
    /// Per-expense breakdown.
    pub lines: Vec<ExpenseLine>,
    /// Anomalies found while aggregating.
    #[serde(skip)]
    pub warnings: Diagnostics,
}

impl ExpenseTotals {
    /// Totals for an invoice with no expenses.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_original: Decimal::ZERO,
            total_billed: Decimal::ZERO,
            lines: Vec::new(),
            warnings: Diagnostics::new(),
        }
    }
}

/// Expense aggregation entry points.
pub struct ExpenseAggregator;

impl ExpenseAggregator {
    /// Aggregate expenses recorded in INR into `invoice_currency`.
    #[must_use]
    pub fn aggregate(
        entries: &[ExpenseEntry],
        invoice_currency: &CurrencyCode,
        rates: &ExchangeRates,
    ) -> ExpenseTotals {
        Self::aggregate_from(entries, &CurrencyCode::inr(), invoice_currency, rates)
    }

    /// Aggregate expenses recorded in `base_currency` into `invoice_currency`.
    ///
    /// The recorded currency on each entry is not consulted: every amount is
    /// taken to be in `base_currency`.
    #[must_use]
    pub fn aggregate_from(
        entries: &[ExpenseEntry],
        base_currency: &CurrencyCode,
        invoice_currency: &CurrencyCode,
        rates: &ExchangeRates,
    ) -> ExpenseTotals {
        let mut warnings = Diagnostics::new();
        let same_currency = base_currency == invoice_currency;
        let rate = if same_currency {
            None
        } else {
            match rates.get(base_currency) {
                Some(rate) if rate > Decimal::ZERO => Some(rate),
                Some(rate) => {
                    warnings.record(BillingWarning::InvalidExchangeRate {
                        currency: base_currency.clone(),
                        rate,
                    });
                    None
                }
                None => {
                    if !entries.is_empty() {
                        warnings.record(BillingWarning::MissingExchangeRate {
                            from: base_currency.clone(),
                            to: invoice_currency.clone(),
                        });
                    }
                    None
                }
            }
        };

        let lines: Vec<ExpenseLine> = entries
            .iter()
            .map(|entry| {
                if !entry.original_currency.is_empty() && &entry.original_currency != base_currency
                {
                    warn!(
                        expense = ?entry.id,
                        recorded = %entry.original_currency,
                        base = %base_currency,
                        "Expense recorded in a non-base currency; treating amount as base"
                    );
                }

                let (billed_amount, billed_currency) = match rate {
                    Some(rate) => (
                        warnings.zero_on_overflow(
                            apply_rate(entry.original_amount, rate),
                            "expense conversion",
                        ),
                        invoice_currency.clone(),
                    ),
                    None if same_currency => (entry.original_amount, invoice_currency.clone()),
                    None => (entry.original_amount, base_currency.clone()),
                };

                ExpenseLine {
                    id: entry.id.clone(),
                    category: entry.category.clone(),
                    description: entry.description.clone(),
                    date: entry.date,
                    original_amount: entry.original_amount,
                    original_currency: base_currency.clone(),
                    billed_amount,
                    billed_currency,
                    exchange_rate: rate,
                }
            })
            .collect();

        let total_original = warnings.zero_on_overflow(
            checked_sum(lines.iter().map(|l| l.original_amount)),
            "expense total",
        );
        let total_billed = warnings.zero_on_overflow(
            checked_sum(lines.iter().map(|l| l.billed_amount)),
            "billed expense total",
        );

        ExpenseTotals {
            total_original,
            total_billed,
            lines,
            warnings,
        }
    }
}
