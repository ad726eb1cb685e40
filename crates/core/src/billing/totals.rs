//! Invoice totals.
//!
//! The single place where subtotal, discount, final amount and payment figures
//! are derived. Every consumer (summary pipeline, API) goes through
//! [`InvoiceTotals::compute`], so the formulas cannot drift apart.

use lexbill_shared::InvoiceId;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::expense::ExpenseTotals;
use super::timesheet::TimesheetRow;
use crate::currency::checked_sum;
use crate::invoice::{Discount, Invoice, Payment};
use crate::warning::{BillingWarning, Diagnostics};

/// Derived financial figures for one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    /// Timesheet fees in the invoice currency.
    pub timesheet_total: Decimal,
    /// Billed expenses in the invoice currency.
    pub expense_total: Decimal,
    /// `timesheet_total + expense_total`.
    pub subtotal: Decimal,
    /// Discount applied.
    pub discount: Discount,
    /// Discount amount.
    pub discount_amount: Decimal,
    /// `subtotal - discount_amount`.
    pub final_amount: Decimal,
    /// Amount paid (summed over splits for a parent invoice).
    pub amount_paid: Decimal,
    /// `final_amount - amount_paid`.
    pub remaining: Decimal,
    /// `amount_paid / final_amount * 100`, not clamped.
    pub payment_progress: Decimal,
    /// True if `amount_paid` was aggregated from split invoices.
    pub paid_via_splits: bool,
    /// Anomalies found while computing.
    #[serde(skip)]
    pub warnings: Diagnostics,
}

impl InvoiceTotals {
    /// Compute totals from aggregated timesheet rows and expense totals.
    ///
    /// Pure: the same inputs always yield the same totals.
    #[must_use]
    pub fn compute(invoice: &Invoice, rows: &[TimesheetRow], expenses: &ExpenseTotals) -> Self {
        let mut warnings = Diagnostics::new();

        let timesheet_total = warnings.zero_on_overflow(
            checked_sum(rows.iter().map(|r| r.converted_fees)),
            "timesheet total",
        );
        let expense_total = expenses.total_billed;
        let subtotal =
            warnings.zero_on_overflow(timesheet_total.checked_add(expense_total), "subtotal");

        let discount_amount =
            warnings.zero_on_overflow(invoice.discount.amount_on(subtotal), "discount");
        if discount_amount > subtotal {
            warnings.record(BillingWarning::DiscountExceedsSubtotal {
                subtotal,
                discount: discount_amount,
            });
        }
        let final_amount =
            warnings.zero_on_overflow(subtotal.checked_sub(discount_amount), "final amount");

        let paid_via_splits = invoice.has_splits();
        let amount_paid = if paid_via_splits {
            warnings.zero_on_overflow(
                checked_sum(invoice.splits.iter().map(|s| s.amount_paid)),
                "amount paid",
            )
        } else {
            invoice.amount_paid
        };
        let remaining =
            warnings.zero_on_overflow(final_amount.checked_sub(amount_paid), "remaining amount");

        let payment_progress = payment_progress(amount_paid, final_amount);
        if amount_paid > final_amount && amount_paid > Decimal::ZERO {
            warnings.record(BillingWarning::Overpayment {
                final_amount,
                amount_paid,
            });
        }

        Self {
            timesheet_total,
            expense_total,
            subtotal,
            discount: invoice.discount,
            discount_amount,
            final_amount,
            amount_paid,
            remaining,
            payment_progress,
            paid_via_splits,
            warnings,
        }
    }

    /// Returns true when nothing remains to be paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.remaining <= Decimal::ZERO
    }
}

/// Percentage of `final_amount` covered by `amount_paid`, to 2 places.
///
/// Zero when there is nothing to pay or the ratio overflows. Values above 100
/// indicate overpayment and are returned as-is.
#[must_use]
pub fn payment_progress(amount_paid: Decimal, final_amount: Decimal) -> Decimal {
    if final_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount_paid
        .checked_div(final_amount)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, |progress| progress.round_dp(2))
}

/// Payments received against one split (or against the invoice itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPaymentTotal {
    /// Split the payments were tagged with; `None` for untagged payments.
    pub split_id: Option<InvoiceId>,
    /// Sum of payment amounts.
    pub total: Decimal,
    /// Number of payments.
    pub count: usize,
}

/// Payment ledger helpers.
pub struct PaymentLedger;

impl PaymentLedger {
    /// Sum of all payment amounts, zero if it overflows.
    #[must_use]
    pub fn total(payments: &[Payment]) -> Decimal {
        checked_sum(payments.iter().map(|p| p.amount)).unwrap_or_default()
    }

    /// Payments summed per originating split, in first-seen order.
    ///
    /// A split whose payments overflow when summed shows a zero total.
    #[must_use]
    pub fn by_split(payments: &[Payment]) -> Vec<SplitPaymentTotal> {
        let mut groups: Vec<(Option<InvoiceId>, Vec<Decimal>)> = Vec::new();
        for payment in payments {
            if let Some((_, amounts)) = groups.iter_mut().find(|(id, _)| *id == payment.split_id) {
                amounts.push(payment.amount);
            } else {
                groups.push((payment.split_id.clone(), vec![payment.amount]));
            }
        }
        groups
            .into_iter()
            .map(|(split_id, amounts)| SplitPaymentTotal {
                total: checked_sum(amounts.iter().copied()).unwrap_or_else(|| {
                    warn!(split_id = ?split_id, "Split payment total overflowed; showing zero");
                    Decimal::ZERO
                }),
                count: amounts.len(),
                split_id,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceStatus, SplitInvoice};
    use lexbill_shared::CurrencyCode;
    use rust_decimal_macros::dec;

    fn invoice(discount: Discount) -> Invoice {
        let mut invoice = Invoice::new(
            InvoiceId::new("inv-1"),
            CurrencyCode::inr(),
            InvoiceStatus::Finalized,
        );
        invoice.discount = discount;
        invoice
    }

    fn row(converted_fees: Decimal) -> TimesheetRow {
        TimesheetRow {
            id: None,
            entry_ids: Vec::new(),
            lawyer_name: "Meera".to_string(),
            lawyer_role: "Partner".to_string(),
            date: None,
            hours: dec!(1),
            hourly_rate: converted_fees,
            currency: CurrencyCode::inr(),
            fees: converted_fees,
            converted_fees,
            entry_count: 1,
            unsaved: false,
        }
    }

    fn expenses(total_billed: Decimal) -> ExpenseTotals {
        ExpenseTotals {
            total_billed,
            total_original: total_billed,
            ..ExpenseTotals::empty()
        }
    }

    fn split(id: &str, final_amount: Decimal, amount_paid: Decimal) -> SplitInvoice {
        SplitInvoice {
            id: InvoiceId::new(id),
            final_amount,
            amount_paid,
            status: InvoiceStatus::PartiallyPaid,
            partner_shares: Vec::new(),
        }
    }

    #[test]
    fn test_percentage_discount() {
        let totals = InvoiceTotals::compute(
            &invoice(Discount::percentage(dec!(10))),
            &[row(dec!(600))],
            &expenses(dec!(400)),
        );

        assert_eq!(totals.subtotal, dec!(1000));
        assert_eq!(totals.discount_amount, dec!(100));
        assert_eq!(totals.final_amount, dec!(900));
    }

    #[test]
    fn test_fixed_discount() {
        let totals = InvoiceTotals::compute(
            &invoice(Discount::fixed(dec!(50))),
            &[row(dec!(500))],
            &ExpenseTotals::empty(),
        );

        assert_eq!(totals.subtotal, dec!(500));
        assert_eq!(totals.final_amount, dec!(450));
        assert!(totals.warnings.is_empty());
    }

    #[test]
    fn test_discount_exceeding_subtotal_is_flagged_not_clamped() {
        let totals = InvoiceTotals::compute(
            &invoice(Discount::fixed(dec!(700))),
            &[row(dec!(500))],
            &ExpenseTotals::empty(),
        );

        assert_eq!(totals.final_amount, dec!(-200));
        assert_eq!(
            totals.warnings.iter().next().map(BillingWarning::code),
            Some("DISCOUNT_EXCEEDS_SUBTOTAL")
        );
    }

    #[test]
    fn test_remaining_uses_own_ledger_without_splits() {
        let mut inv = invoice(Discount::none());
        inv.amount_paid = dec!(250);

        let totals = InvoiceTotals::compute(&inv, &[row(dec!(1000))], &ExpenseTotals::empty());

        assert_eq!(totals.amount_paid, dec!(250));
        assert_eq!(totals.remaining, dec!(750));
        assert_eq!(totals.payment_progress, dec!(25));
        assert!(!totals.paid_via_splits);
        assert!(!totals.is_settled());
    }

    #[test]
    fn test_parent_remaining_sums_split_payments() {
        let mut inv = invoice(Discount::none());
        // the parent's own ledger is ignored once it has splits
        inv.amount_paid = dec!(999);
        inv.splits = vec![
            split("s1", dec!(600), dec!(300)),
            split("s2", dec!(400), dec!(200)),
        ];

        let totals = InvoiceTotals::compute(&inv, &[row(dec!(1000))], &ExpenseTotals::empty());

        assert_eq!(totals.final_amount, dec!(1000));
        assert_eq!(totals.amount_paid, dec!(500));
        assert_eq!(totals.remaining, dec!(500));
        assert!(totals.paid_via_splits);
    }

    #[test]
    fn test_overpayment_is_surfaced() {
        let mut inv = invoice(Discount::none());
        inv.amount_paid = dec!(1200);

        let totals = InvoiceTotals::compute(&inv, &[row(dec!(1000))], &ExpenseTotals::empty());

        assert_eq!(totals.payment_progress, dec!(120));
        assert_eq!(totals.remaining, dec!(-200));
        assert!(totals.is_settled());
        assert_eq!(
            totals.warnings.iter().next().map(BillingWarning::code),
            Some("OVERPAYMENT")
        );
    }

    #[test]
    fn test_overflowing_totals_degrade_to_zero() {
        let totals = InvoiceTotals::compute(
            &invoice(Discount::percentage(dec!(10))),
            &[row(Decimal::MAX), row(Decimal::MAX)],
            &ExpenseTotals::empty(),
        );

        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.final_amount, Decimal::ZERO);
        assert_eq!(
            totals.warnings.iter().next(),
            Some(&BillingWarning::ArithmeticOverflow {
                operation: "timesheet total"
            })
        );
    }

    #[test]
    fn test_overflowing_discount_is_zero() {
        let totals = InvoiceTotals::compute(
            &invoice(Discount::percentage(dec!(50))),
            &[row(Decimal::MAX)],
            &ExpenseTotals::empty(),
        );

        assert_eq!(totals.discount_amount, Decimal::ZERO);
        assert_eq!(totals.final_amount, Decimal::MAX);
        assert_eq!(
            totals.warnings.iter().next(),
            Some(&BillingWarning::ArithmeticOverflow {
                operation: "discount"
            })
        );
    }

    #[test]
    fn test_progress_zero_when_nothing_to_pay() {
        assert_eq!(payment_progress(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(payment_progress(dec!(1), dec!(3)), dec!(33.33));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut inv = invoice(Discount::percentage(dec!(12.5)));
        inv.amount_paid = dec!(100);
        let rows = [row(dec!(333.33)), row(dec!(666.67))];
        let exp = expenses(dec!(45.10));

        let first = InvoiceTotals::compute(&inv, &rows, &exp);
        let second = InvoiceTotals::compute(&inv, &rows, &exp);

        assert_eq!(first, second);
    }

    #[test]
    fn test_payments_by_split() {
        let payment = |amount: Decimal, split: Option<&str>| Payment {
            id: None,
            amount,
            date: None,
            method: None,
            reference: None,
            split_id: split.map(InvoiceId::new),
        };
        let payments = vec![
            payment(dec!(100), Some("s1")),
            payment(dec!(50), None),
            payment(dec!(25), Some("s1")),
        ];

        let by_split = PaymentLedger::by_split(&payments);

        assert_eq!(PaymentLedger::total(&payments), dec!(175));
        assert_eq!(by_split.len(), 2);
        assert_eq!(by_split[0].split_id, Some(InvoiceId::new("s1")));
        assert_eq!(by_split[0].total, dec!(125));
        assert_eq!(by_split[0].count, 2);
        assert_eq!(by_split[1].split_id, None);

        let overflowing = vec![
            payment(Decimal::MAX, Some("s2")),
            payment(Decimal::MAX, Some("s2")),
        ];
        assert_eq!(PaymentLedger::total(&overflowing), Decimal::ZERO);
        assert_eq!(PaymentLedger::by_split(&overflowing)[0].total, Decimal::ZERO);
        assert_eq!(PaymentLedger::by_split(&overflowing)[0].count, 2);
    }
}
