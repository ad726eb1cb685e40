//! Full aggregation pipeline for one invoice.
//!
//! [`InvoiceSummary::build`] runs timesheet and expense aggregation, totals and
//! partner distribution over an [`InvoiceSnapshot`] and collects every
//! warning raised along the way.

use chrono::NaiveDate;
use lexbill_shared::{CurrencyCode, InvoiceId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::billing::{
    DateGroup, ExpenseAggregator, ExpenseTotals, InvoiceTotals, PartnerAllocation,
    PartnerShareCalculator, PaymentLedger, SplitPaymentTotal, TimesheetAggregation,
    TimesheetAggregator,
};
use crate::invoice::{AggregationMode, ExpenseEntry, Invoice, InvoiceStatus, Payment, TimesheetEntry};
use crate::warning::Diagnostics;

/// Billing period covered by an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// First day billed.
    pub from: Option<NaiveDate>,
    /// Last day billed.
    pub to: Option<NaiveDate>,
}

/// Everything fetched for one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSnapshot {
    /// The invoice, with its rates, discount and splits.
    pub invoice: Invoice,
    /// Timesheet entries billed on the invoice.
    pub timesheets: Vec<TimesheetEntry>,
    /// Expense entries billed on the invoice.
    pub expenses: Vec<ExpenseEntry>,
    /// Payments received.
    pub payments: Vec<Payment>,
    /// Period covered.
    pub period: BillingPeriod,
}

/// Computed view of an invoice, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    /// Invoice ID.
    pub invoice_id: InvoiceId,
    /// Invoice currency.
    pub currency: CurrencyCode,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Period covered.
    pub period: BillingPeriod,
    /// Timesheet rows laid out for the invoice's mode.
    pub timesheets: TimesheetAggregation,
    /// Per-entry rows bucketed by day.
    pub by_date: Vec<DateGroup>,
    /// Expense lines and totals.
    pub expenses: ExpenseTotals,
    /// Subtotal, discount, final amount and payment figures.
    pub totals: InvoiceTotals,
    /// Final amount distributed to partners.
    pub partners: Vec<PartnerAllocation>,
    /// Payments summed per originating split.
    pub split_payments: Vec<SplitPaymentTotal>,
    /// Every distinct anomaly met while computing.
    pub warnings: Diagnostics,
}

impl InvoiceSummary {
    /// Build the summary with expenses taken to be recorded in INR.
    #[must_use]
    pub fn build(snapshot: &InvoiceSnapshot) -> Self {
        Self::build_with_expense_currency(snapshot, &CurrencyCode::inr())
    }

    /// Build the summary with expenses recorded in `expense_currency`.
    #[must_use]
    pub fn build_with_expense_currency(
        snapshot: &InvoiceSnapshot,
        expense_currency: &CurrencyCode,
    ) -> Self {
        let invoice = &snapshot.invoice;
        let mode = AggregationMode::for_status(invoice.status);
        let mut warnings = Diagnostics::new();

        let mut timesheets = TimesheetAggregator::aggregate(
            &snapshot.timesheets,
            &invoice.currency,
            &invoice.exchange_rates,
            mode,
        );
        warnings.merge(std::mem::take(&mut timesheets.warnings));

        let by_date = match mode {
            AggregationMode::Draft => TimesheetAggregator::group_by_date(&timesheets.rows),
            AggregationMode::Finalized => {
                let (rows, itemized) = TimesheetAggregator::itemize(
                    &snapshot.timesheets,
                    &invoice.currency,
                    &invoice.exchange_rates,
                    invoice.status,
                );
                warnings.merge(itemized);
                TimesheetAggregator::group_by_date(&rows)
            }
        };

        let mut expenses = ExpenseAggregator::aggregate_from(
            &snapshot.expenses,
            expense_currency,
            &invoice.currency,
            &invoice.exchange_rates,
        );
        warnings.merge(std::mem::take(&mut expenses.warnings));

        let mut totals = InvoiceTotals::compute(invoice, &timesheets.rows, &expenses);
        warnings.merge(std::mem::take(&mut totals.warnings));

        let partners = PartnerShareCalculator::distribute(
            totals.final_amount,
            &PartnerShareCalculator::shares_for(invoice),
        );
        let split_payments = PaymentLedger::by_split(&snapshot.payments);

        debug!(
            invoice_id = %invoice.id,
            status = %invoice.status,
            subtotal = %totals.subtotal,
            final_amount = %totals.final_amount,
            warnings = warnings.len(),
            "Built invoice summary"
        );

        Self {
            invoice_id: invoice.id.clone(),
            currency: invoice.currency.clone(),
            status: invoice.status,
            period: snapshot.period,
            timesheets,
            by_date,
            expenses,
            totals,
            partners,
            split_payments,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::ExchangeRates;
    use crate::invoice::{Discount, PartnerShare, SplitInvoice};
    use lexbill_shared::{ExpenseId, TimesheetId, UserId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn timesheet(id: Option<&str>, name: &str, day: u32, hours: Decimal, rate: Decimal) -> TimesheetEntry {
        TimesheetEntry {
            id: id.map(TimesheetId::new),
            lawyer_name: name.to_string(),
            lawyer_role: "Partner".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, day),
            hours,
            hourly_rate: rate,
            currency: CurrencyCode::from("USD"),
            fees: Decimal::ZERO,
        }
    }

    fn expense(amount: Decimal) -> ExpenseEntry {
        ExpenseEntry {
            id: Some(ExpenseId::new("e1")),
            category: "Court fees".to_string(),
            description: None,
            date: None,
            original_amount: amount,
            original_currency: CurrencyCode::inr(),
        }
    }

    fn snapshot(status: InvoiceStatus) -> InvoiceSnapshot {
        let mut invoice = Invoice::new(InvoiceId::new("inv-7"), CurrencyCode::from("USD"), status);
        invoice.exchange_rates = ExchangeRates::new().with(CurrencyCode::inr(), dec!(0.012));
        invoice.discount = Discount::percentage(dec!(10));
        invoice.partner_shares = vec![
            PartnerShare {
                user_id: UserId::new("u1"),
                name: "Meera".to_string(),
                percentage: dec!(60),
            },
            PartnerShare {
                user_id: UserId::new("u2"),
                name: "Arjun".to_string(),
                percentage: dec!(40),
            },
        ];
        InvoiceSnapshot {
            invoice,
            timesheets: vec![
                timesheet(Some("t1"), "Meera", 2, dec!(2), dec!(100)),
                timesheet(Some("t2"), "Meera", 3, dec!(3), dec!(200)),
            ],
            expenses: vec![expense(dec!(10000))],
            payments: Vec::new(),
            period: BillingPeriod::default(),
        }
    }

    #[test]
    fn test_finalized_pipeline() {
        let summary = InvoiceSummary::build(&snapshot(InvoiceStatus::Finalized));

        assert_eq!(summary.timesheets.rows.len(), 1);
        assert_eq!(summary.timesheets.rows[0].hourly_rate, dec!(160));
        assert_eq!(summary.by_date.len(), 2);
        // 10000 INR at 0.012
        assert_eq!(summary.expenses.total_billed, dec!(120));
        assert_eq!(summary.totals.subtotal, dec!(920));
        assert_eq!(summary.totals.final_amount, dec!(828));
        let amounts: Vec<Decimal> = summary.partners.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![dec!(496.8), dec!(331.2)]);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_draft_pipeline_itemizes() {
        let summary = InvoiceSummary::build(&snapshot(InvoiceStatus::Draft));

        assert_eq!(summary.timesheets.mode, AggregationMode::Draft);
        assert_eq!(summary.timesheets.rows.len(), 2);
        assert_eq!(summary.totals.subtotal, dec!(920));
    }

    #[test]
    fn test_missing_expense_rate_on_finalized_is_warned() {
        let mut snap = snapshot(InvoiceStatus::Finalized);
        snap.invoice.exchange_rates = ExchangeRates::new();

        let summary = InvoiceSummary::build(&snap);

        assert_eq!(summary.expenses.total_billed, dec!(10000));
        assert!(
            summary
                .warnings
                .iter()
                .any(|w| w.code() == "MISSING_EXCHANGE_RATE")
        );
    }

    #[test]
    fn test_row_without_id_is_reported_once() {
        let mut snap = snapshot(InvoiceStatus::Draft);
        snap.timesheets.push(timesheet(None, "Kavya", 4, dec!(1), dec!(50)));

        let summary = InvoiceSummary::build(&snap);

        let missing = summary
            .warnings
            .iter()
            .filter(|w| w.code() == "MISSING_IDENTIFIER")
            .count();
        assert_eq!(missing, 1);
        assert_eq!(summary.totals.timesheet_total, dec!(850));
    }

    #[test]
    fn test_row_without_id_on_finalized_invoice_is_not_reported() {
        let mut snap = snapshot(InvoiceStatus::Finalized);
        snap.timesheets.push(timesheet(None, "Kavya", 4, dec!(1), dec!(50)));

        let summary = InvoiceSummary::build(&snap);

        assert!(summary.warnings.is_empty());
        assert_eq!(summary.totals.timesheet_total, dec!(850));
    }

    #[test]
    fn test_overflowing_entry_degrades_to_zero() {
        let huge = Decimal::from_scientific("1e15").unwrap();
        let mut snap = snapshot(InvoiceStatus::Finalized);
        snap.timesheets.push(timesheet(Some("t9"), "Arjun", 5, huge, huge));

        let summary = InvoiceSummary::build(&snap);

        assert_eq!(summary.totals.subtotal, dec!(920));
        assert_eq!(summary.totals.final_amount, dec!(828));
        assert!(
            summary
                .warnings
                .iter()
                .any(|w| w.code() == "ARITHMETIC_OVERFLOW")
        );
    }

    #[test]
    fn test_parent_invoice_uses_split_payments_and_shares() {
        let mut snap = snapshot(InvoiceStatus::PartiallyPaid);
        snap.invoice.splits = vec![SplitInvoice {
            id: InvoiceId::new("s1"),
            final_amount: dec!(828),
            amount_paid: dec!(300),
            status: InvoiceStatus::PartiallyPaid,
            partner_shares: vec![PartnerShare {
                user_id: UserId::new("u3"),
                name: "Kavya".to_string(),
                percentage: dec!(100),
            }],
        }];
        snap.payments = vec![Payment {
            id: None,
            amount: dec!(300),
            date: None,
            method: Some("wire".to_string()),
            reference: None,
            split_id: Some(InvoiceId::new("s1")),
        }];

        let summary = InvoiceSummary::build(&snap);

        assert_eq!(summary.totals.amount_paid, dec!(300));
        assert_eq!(summary.totals.remaining, dec!(528));
        assert_eq!(summary.partners.len(), 1);
        assert_eq!(summary.partners[0].amount, dec!(828));
        assert_eq!(summary.split_payments[0].total, dec!(300));
    }

    #[test]
    fn test_build_is_idempotent() {
        let snap = snapshot(InvoiceStatus::Finalized);
        assert_eq!(InvoiceSummary::build(&snap), InvoiceSummary::build(&snap));
    }
}
