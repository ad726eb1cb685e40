//! Property-based tests for invoice aggregation.

use lexbill_shared::{CurrencyCode, InvoiceId, TimesheetId, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::expense::ExpenseTotals;
use super::partner::PartnerShareCalculator;
use super::split::SplitPlanner;
use super::timesheet::TimesheetAggregator;
use super::totals::InvoiceTotals;
use crate::currency::ExchangeRates;
use crate::invoice::{
    AggregationMode, Discount, Invoice, InvoiceStatus, PartnerShare, SplitInvoice, TimesheetEntry,
};

/// Strategy to generate non-negative amounts (0.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate hours (0.25 to 100.00 in quarter hours).
fn hours() -> impl Strategy<Value = Decimal> {
    (1i64..400i64).prop_map(|quarters| Decimal::new(quarters * 25, 2))
}

/// Strategy to generate percentages that sum to 100 (2 to 10 of them, 2 decimals).
fn percentages_summing_to_100() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..100, 2..10).prop_map(|values| {
        let sum: u32 = values.iter().sum();
        let hundred = Decimal::ONE_HUNDRED;
        let mut pcts: Vec<Decimal> = values
            .iter()
            .map(|v| (hundred * Decimal::from(*v) / Decimal::from(sum)).round_dp(2))
            .collect();
        let drift = hundred - pcts.iter().copied().sum::<Decimal>();
        pcts[0] += drift;
        pcts
    })
}

fn entry(name: &str, hours: Decimal, rate: Decimal) -> TimesheetEntry {
    TimesheetEntry {
        id: Some(TimesheetId::new(format!("{name}-{hours}-{rate}"))),
        lawyer_name: name.to_string(),
        lawyer_role: "Partner".to_string(),
        date: None,
        hours,
        hourly_rate: rate,
        currency: CurrencyCode::inr(),
        fees: Decimal::ZERO,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Grouping preserves hours and fees, and the grouped rate is the
    /// weighted average `fees / hours`.
    #[test]
    fn prop_grouping_preserves_totals(
        work in prop::collection::vec((0usize..3, hours(), 1i64..10_000i64), 1..20),
    ) {
        let names = ["Meera", "Arjun", "Kavya"];
        let entries: Vec<TimesheetEntry> = work
            .iter()
            .map(|(n, h, r)| entry(names[*n], *h, Decimal::from(*r)))
            .collect();

        let inr = CurrencyCode::inr();
        let rates = ExchangeRates::new();
        let draft = TimesheetAggregator::aggregate(&entries, &inr, &rates, AggregationMode::Draft);
        let grouped = TimesheetAggregator::aggregate(&entries, &inr, &rates, AggregationMode::Finalized);

        prop_assert_eq!(draft.total_hours, grouped.total_hours);
        prop_assert_eq!(draft.total_converted_fees, grouped.total_converted_fees);
        prop_assert!(grouped.rows.len() <= names.len());
        for row in &grouped.rows {
            let expected = (row.converted_fees / row.hours).round_dp_with_strategy(
                4,
                rust_decimal::RoundingStrategy::MidpointNearestEven,
            );
            prop_assert_eq!(row.hourly_rate, expected);
        }
    }

    /// `final = subtotal - discount` and `remaining = final - paid`, always.
    #[test]
    fn prop_totals_invariants(
        fees in amount(),
        expenses in amount(),
        paid in amount(),
        pct in 0i64..=100,
        fixed in prop::bool::ANY,
    ) {
        let mut invoice = Invoice::new(InvoiceId::new("p"), CurrencyCode::inr(), InvoiceStatus::Finalized);
        invoice.amount_paid = paid;
        invoice.discount = if fixed {
            Discount::fixed(Decimal::from(pct))
        } else {
            Discount::percentage(Decimal::from(pct))
        };
        let entries = vec![entry("Meera", Decimal::ONE, fees)];
        let rows = TimesheetAggregator::aggregate(
            &entries,
            &invoice.currency,
            &invoice.exchange_rates,
            AggregationMode::Finalized,
        )
        .rows;
        let exp = ExpenseTotals { total_billed: expenses, ..ExpenseTotals::empty() };

        let totals = InvoiceTotals::compute(&invoice, &rows, &exp);

        prop_assert_eq!(totals.subtotal, totals.timesheet_total + totals.expense_total);
        prop_assert_eq!(totals.final_amount, totals.subtotal - totals.discount_amount);
        prop_assert_eq!(totals.remaining, totals.final_amount - totals.amount_paid);
        prop_assert_eq!(&totals, &InvoiceTotals::compute(&invoice, &rows, &exp));
    }

    /// A parent's paid amount is the sum of its splits' payments.
    #[test]
    fn prop_parent_paid_is_sum_of_splits(paid in prop::collection::vec(amount(), 1..6)) {
        let mut invoice = Invoice::new(InvoiceId::new("p"), CurrencyCode::inr(), InvoiceStatus::PartiallyPaid);
        invoice.splits = paid
            .iter()
            .enumerate()
            .map(|(i, p)| SplitInvoice {
                id: InvoiceId::new(format!("s{i}")),
                final_amount: Decimal::ZERO,
                amount_paid: *p,
                status: InvoiceStatus::PartiallyPaid,
                partner_shares: Vec::new(),
            })
            .collect();

        let totals = InvoiceTotals::compute(&invoice, &[], &ExpenseTotals::empty());

        prop_assert_eq!(totals.amount_paid, paid.iter().copied().sum::<Decimal>());
    }

    /// Partner amounts sum to the final amount when percentages sum to 100.
    #[test]
    fn prop_partner_shares_sum_to_final(
        final_amount in amount(),
        pcts in percentages_summing_to_100(),
    ) {
        let shares: Vec<PartnerShare> = pcts
            .iter()
            .enumerate()
            .map(|(i, p)| PartnerShare {
                user_id: UserId::new(format!("u{i}")),
                name: format!("Partner {i}"),
                percentage: *p,
            })
            .collect();

        let allocations = PartnerShareCalculator::distribute(final_amount, &shares);
        let total: Decimal = allocations.iter().map(|a| a.amount).sum();

        prop_assert_eq!(total, final_amount);
    }

    /// Split plans always sum exactly to the parent's final amount.
    #[test]
    fn prop_split_plan_sums_exactly(
        final_amount in amount(),
        pcts in percentages_summing_to_100(),
    ) {
        let plan = SplitPlanner::plan(final_amount, &pcts).unwrap();
        let total: Decimal = plan.iter().map(|s| s.amount).sum();

        prop_assert_eq!(plan.len(), pcts.len());
        prop_assert_eq!(total, final_amount);
    }
}
