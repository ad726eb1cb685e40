//! Wire records returned by the backend.
//!
//! Field names arrive camelCase or snake_case and ids arrive as strings or
//! numbers. Everything is normalized here, once, when a record is turned
//! into its `lexbill-core` counterpart.

pub mod details;
pub mod envelope;
pub mod invoice;
pub mod payment;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lexbill_core::currency::ExchangeRates;
use lexbill_core::{BillingPeriod, InvoiceSnapshot, InvoiceStatus};
use lexbill_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

pub use details::{ExpenseDto, InvoiceDetailsDto, TimesheetDto};
pub use envelope::Envelope;
pub use invoice::{InvoiceDto, PartnerShareDto, SplitDto};
pub use payment::PaymentDto;

/// Exchange rates as sent by the backend; `null` rates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RatesDto(BTreeMap<String, Option<Decimal>>);

impl RatesDto {
    /// Returns true if no usable rate is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Option::is_none)
    }
}

/// Keys differing only in case or spacing name the same currency. Keys are
/// visited in sorted order, so the upper-case spelling wins; a conflicting
/// rate under another spelling is dropped with a warning.
impl From<RatesDto> for ExchangeRates {
    fn from(dto: RatesDto) -> Self {
        let mut rates = Self::new();
        for (key, rate) in dto.0 {
            let Some(rate) = rate else { continue };
            let currency = CurrencyCode::new(key.as_str());
            match rates.get(&currency) {
                Some(kept) if kept != rate => {
                    warn!(
                        currency = %currency,
                        key = %key,
                        kept = %kept,
                        dropped = %rate,
                        "Conflicting exchange rates for one currency; keeping the first"
                    );
                }
                Some(_) => {}
                None => rates.insert(currency, rate),
            }
        }
        rates
    }
}

/// First value present among the alternate keys of one field.
///
/// Records carry each field under several names (`invoiceId`, `invoice_id`,
/// ...). Every name is read into its own slot so a record sending two of them
/// still decodes; the earliest slot wins.
pub(crate) fn first_of<T, const N: usize>(candidates: [Option<T>; N]) -> Option<T> {
    candidates.into_iter().flatten().next()
}

/// Like [`first_of`], skipping blank ids.
pub(crate) fn first_id<T: AsRef<str>, const N: usize>(candidates: [Option<T>; N]) -> Option<T> {
    candidates
        .into_iter()
        .flatten()
        .find(|id| !id.as_ref().trim().is_empty())
}

/// Reads `YYYY-MM-DD` or the date part of an ISO timestamp; anything else is `None`.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let day = raw.split(['T', ' ']).next().unwrap_or_default();
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            debug!(raw = %raw, "Ignoring unparseable date");
            Ok(None)
        }
    }
}

/// Parses a backend status, treating unknown values as non-draft.
pub(crate) fn parse_status(raw: Option<&str>) -> InvoiceStatus {
    match raw.map(str::parse::<InvoiceStatus>) {
        Some(Ok(status)) => status,
        Some(Err(reason)) => {
            warn!(%reason, "Unknown invoice status; treating invoice as non-draft");
            InvoiceStatus::New
        }
        None => InvoiceStatus::New,
    }
}

/// Builds the domain snapshot from the four backend responses.
///
/// The invoice currency and rates on the details response win over those on
/// the invoice record.
#[must_use]
pub fn assemble(
    invoice: InvoiceDto,
    details: InvoiceDetailsDto,
    payments: Vec<PaymentDto>,
    splits: Vec<SplitDto>,
) -> InvoiceSnapshot {
    let currency = details
        .invoice_currency
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| invoice.currency.clone().filter(|c| !c.is_empty()))
        .unwrap_or_else(|| {
            warn!(invoice_id = %invoice.id, "Invoice has no currency; defaulting to INR");
            CurrencyCode::inr()
        });
    let rates = if details.exchange_rates.is_empty() {
        invoice.exchange_rates.clone()
    } else {
        details.exchange_rates.clone()
    };

    let mut domain = invoice.into_invoice(currency);
    domain.exchange_rates = rates.into();
    domain.splits = splits.into_iter().map(Into::into).collect();

    let period = BillingPeriod {
        from: details.period_from,
        to: details.period_to,
    };
    let timesheets = details
        .timesheet_entries
        .into_iter()
        .map(|t| t.into_entry(&domain.currency))
        .collect();
    let expenses = details.expense_entries.into_iter().map(Into::into).collect();

    InvoiceSnapshot {
        invoice: domain,
        timesheets,
        expenses,
        payments: payments.into_iter().map(Into::into).collect(),
        period,
    }
}
