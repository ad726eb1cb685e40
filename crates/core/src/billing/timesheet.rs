//! Timesheet aggregation.
//!
//! Draft invoices show one editable row per entry. Finalized invoices show one
//! row per `(lawyer_name, lawyer_role)` with fees converted into the invoice
//! currency and a weighted-average hourly rate (`total fees / total hours`).

use chrono::NaiveDate;
use lexbill_shared::{CurrencyCode, TimesheetId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::currency::{
    CONVERSION_DECIMAL_PLACES, CurrencyConverter, ExchangeRates, checked_sum, round,
};
use crate::invoice::{AggregationMode, InvoiceStatus, TimesheetEntry};
use crate::warning::{BillingWarning, Diagnostics};

/// Label of the date bucket holding entries without a date.
pub const UNKNOWN_DATE_LABEL: &str = "Unknown";

/// One line of the timesheet section of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimesheetRow {
    /// Entry ID in draft mode; `None` for grouped rows and unsaved entries.
    pub id: Option<TimesheetId>,
    /// IDs of every entry folded into this row.
    pub entry_ids: Vec<TimesheetId>,
    /// Lawyer name.
    pub lawyer_name: String,
    /// Lawyer role.
    pub lawyer_role: String,
    /// Entry date in draft mode; `None` for grouped rows.
    pub date: Option<NaiveDate>,
    /// Hours (summed for grouped rows).
    pub hours: Decimal,
    /// Hourly rate in `currency` (weighted average for grouped rows).
    pub hourly_rate: Decimal,
    /// Currency of `hourly_rate` and `fees`.
    pub currency: CurrencyCode,
    /// Fees in `currency`.
    pub fees: Decimal,
    /// Fees in the invoice currency.
    pub converted_fees: Decimal,
    /// Number of entries folded into this row.
    pub entry_count: usize,
    /// True when the row can be edited locally but not saved.
    pub unsaved: bool,
}

/// Result of aggregating timesheet entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimesheetAggregation {
    /// Mode used to lay out the rows.
    pub mode: AggregationMode,
    /// Rows in first-seen order.
    pub rows: Vec<TimesheetRow>,
    /// Total hours across all rows.
    pub total_hours: Decimal,
    /// Total fees in the invoice currency.
    pub total_converted_fees: Decimal,
    /// Anomalies found while aggregating.
    #[serde(skip)]
    pub warnings: Diagnostics,
}

/// Rows sharing a date, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    /// ISO date, or [`UNKNOWN_DATE_LABEL`].
    pub label: String,
    /// Date of the group, `None` for the unknown bucket.
    pub date: Option<NaiveDate>,
    /// Rows on this date.
    pub rows: Vec<TimesheetRow>,
    /// Hours on this date.
    pub hours: Decimal,
    /// Fees on this date in the invoice currency.
    pub converted_fees: Decimal,
}

/// Timesheet aggregation entry points.
pub struct TimesheetAggregator;

impl TimesheetAggregator {
    /// Aggregate entries for display on an invoice billed in `invoice_currency`.
    #[must_use]
    pub fn aggregate(
        entries: &[TimesheetEntry],
        invoice_currency: &CurrencyCode,
        rates: &ExchangeRates,
        mode: AggregationMode,
    ) -> TimesheetAggregation {
        let mut warnings = Diagnostics::new();
        let rows = match mode {
            AggregationMode::Draft => Self::itemize_into(
                entries,
                invoice_currency,
                rates,
                InvoiceStatus::Draft,
                &mut warnings,
            ),
            AggregationMode::Finalized => {
                Self::group_into(entries, invoice_currency, rates, &mut warnings)
            }
        };

        let total_hours =
            warnings.zero_on_overflow(checked_sum(rows.iter().map(|r| r.hours)), "timesheet hours");
        let total_converted_fees = warnings.zero_on_overflow(
            checked_sum(rows.iter().map(|r| r.converted_fees)),
            "timesheet fees",
        );

        TimesheetAggregation {
            mode,
            rows,
            total_hours,
            total_converted_fees,
            warnings,
        }
    }

    /// One row per entry, converting fees with the strictness of `status`.
    ///
    /// Used for draft display and for the per-day breakdown of any invoice.
    #[must_use]
    pub fn itemize(
        entries: &[TimesheetEntry],
        invoice_currency: &CurrencyCode,
        rates: &ExchangeRates,
        status: InvoiceStatus,
    ) -> (Vec<TimesheetRow>, Diagnostics) {
        let mut warnings = Diagnostics::new();
        let rows = Self::itemize_into(entries, invoice_currency, rates, status, &mut warnings);
        (rows, warnings)
    }

    /// Bucket rows by date in ascending order, undated rows last.
    ///
    /// A day whose sums overflow shows zero for them.
    #[must_use]
    pub fn group_by_date(rows: &[TimesheetRow]) -> Vec<DateGroup> {
        let mut groups: Vec<DateGroup> = Vec::new();

        for row in rows {
            let index = if let Some(i) = groups.iter().position(|g| g.date == row.date) {
                i
            } else {
                groups.push(DateGroup {
                    label: row
                        .date
                        .map_or_else(|| UNKNOWN_DATE_LABEL.to_string(), |d| d.to_string()),
                    date: row.date,
                    rows: Vec::new(),
                    hours: Decimal::ZERO,
                    converted_fees: Decimal::ZERO,
                });
                groups.len() - 1
            };
            groups[index].rows.push(row.clone());
        }

        for group in &mut groups {
            let hours = checked_sum(group.rows.iter().map(|r| r.hours));
            let fees = checked_sum(group.rows.iter().map(|r| r.converted_fees));
            if hours.is_none() || fees.is_none() {
                warn!(day = %group.label, "Daily timesheet sums overflowed; showing zero");
            }
            group.hours = hours.unwrap_or_default();
            group.converted_fees = fees.unwrap_or_default();
        }

        // `None` sorts first for Option, so order on (is_none, date) to push it last.
        groups.sort_by_key(|g| (g.date.is_none(), g.date));
        groups
    }

    fn itemize_into(
        entries: &[TimesheetEntry],
        invoice_currency: &CurrencyCode,
        rates: &ExchangeRates,
        status: InvoiceStatus,
        warnings: &mut Diagnostics,
    ) -> Vec<TimesheetRow> {
        entries
            .iter()
            .map(|entry| {
                let fees = warnings.zero_on_overflow(entry.effective_fees(), "timesheet fee");
                let conversion = CurrencyConverter::convert(
                    fees,
                    &entry.currency,
                    invoice_currency,
                    rates,
                    status,
                );
                warnings.extend(conversion.warning);

                let saved = entry.has_identifier();
                // Only draft rows are editable, so only they need an id to save.
                if !saved && status.is_draft() {
                    warnings.record(BillingWarning::MissingIdentifier {
                        lawyer_name: entry.lawyer_name.clone(),
                        date: entry.date,
                    });
                }

                TimesheetRow {
                    id: entry.id.clone().filter(|_| saved),
                    entry_ids: entry.id.iter().filter(|_| saved).cloned().collect(),
                    lawyer_name: entry.lawyer_name.clone(),
                    lawyer_role: entry.lawyer_role.clone(),
                    date: entry.date,
                    hours: entry.hours,
                    hourly_rate: entry.hourly_rate,
                    currency: entry.currency.clone(),
                    fees,
                    converted_fees: conversion.amount,
                    entry_count: 1,
                    unsaved: !saved,
                }
            })
            .collect()
    }

    fn group_into(
        entries: &[TimesheetEntry],
        invoice_currency: &CurrencyCode,
        rates: &ExchangeRates,
        warnings: &mut Diagnostics,
    ) -> Vec<TimesheetRow> {
        // Running sums per row; `None` once a sum has overflowed.
        let mut groups: Vec<(TimesheetRow, Option<Decimal>, Option<Decimal>)> = Vec::new();

        for entry in entries {
            let fees = warnings.zero_on_overflow(entry.effective_fees(), "timesheet fee");
            let conversion = CurrencyConverter::convert(
                fees,
                &entry.currency,
                invoice_currency,
                rates,
                InvoiceStatus::Finalized,
            );
            warnings.extend(conversion.warning);

            let position = groups.iter().position(|(r, _, _)| {
                r.lawyer_name == entry.lawyer_name && r.lawyer_role == entry.lawyer_role
            });
            let index = if let Some(i) = position {
                i
            } else {
                let row = TimesheetRow {
                    id: None,
                    entry_ids: Vec::new(),
                    lawyer_name: entry.lawyer_name.clone(),
                    lawyer_role: entry.lawyer_role.clone(),
                    date: None,
                    hours: Decimal::ZERO,
                    hourly_rate: Decimal::ZERO,
                    currency: invoice_currency.clone(),
                    fees: Decimal::ZERO,
                    converted_fees: Decimal::ZERO,
                    entry_count: 0,
                    unsaved: false,
                };
                groups.push((row, Some(Decimal::ZERO), Some(Decimal::ZERO)));
                groups.len() - 1
            };
            let (row, hours, converted) = &mut groups[index];

            *hours = hours.and_then(|h| h.checked_add(entry.hours));
            *converted = converted.and_then(|f| f.checked_add(conversion.amount));
            row.entry_count += 1;
            if let Some(id) = entry.id.as_ref().filter(|id| !id.is_blank()) {
                row.entry_ids.push(id.clone());
            }
        }

        groups
            .into_iter()
            .map(|(mut row, hours, converted)| {
                row.hours = warnings.zero_on_overflow(hours, "timesheet hours");
                row.converted_fees = warnings.zero_on_overflow(converted, "timesheet fees");
                row.fees = row.converted_fees;
                row.hourly_rate = if row.hours.is_zero() {
                    Decimal::ZERO
                } else {
                    let average = row.converted_fees.checked_div(row.hours);
                    round(
                        warnings.zero_on_overflow(average, "weighted hourly rate"),
                        CONVERSION_DECIMAL_PLACES,
                    )
                };
                row
            })
            .collect()
    }
}
