//! Property-based tests for currency conversion.

use lexbill_shared::CurrencyCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{CurrencyConverter, round};
use super::rates::ExchangeRates;
use crate::invoice::InvoiceStatus;
use crate::warning::BillingWarning;

/// Strategy to generate amounts (-1,000,000.00 to 1,000,000.00).
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn any_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Finalized),
        Just(InvoiceStatus::InvoiceUploaded),
        Just(InvoiceStatus::PartiallyPaid),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Overdue),
        Just(InvoiceStatus::New),
    ]
}

fn non_draft_status() -> impl Strategy<Value = InvoiceStatus> {
    any_status().prop_filter("non-draft", |s| !s.is_draft())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting into the same currency returns the amount untouched,
    /// whatever the rate table holds.
    #[test]
    fn prop_same_currency_is_identity(
        amount in any_amount(),
        junk_rate in any_amount(),
        status in any_status(),
    ) {
        let inr = CurrencyCode::inr();
        let rates = ExchangeRates::new().with("INR", junk_rate);
        let result = CurrencyConverter::convert(amount, &inr, &inr, &rates, status);
        prop_assert_eq!(result.amount, amount);
        prop_assert!(result.warning.is_none());
    }

    /// A draft invoice never zeroes an amount for want of a rate.
    #[test]
    fn prop_draft_missing_rate_passes_through(amount in positive_amount()) {
        let result = CurrencyConverter::convert(
            amount,
            &CurrencyCode::from("USD"),
            &CurrencyCode::inr(),
            &ExchangeRates::new(),
            InvoiceStatus::Draft,
        );
        prop_assert_eq!(result.amount, amount);
    }

    /// Any non-draft invoice zeroes an unconvertible amount and flags it.
    #[test]
    fn prop_non_draft_missing_rate_is_flagged(
        amount in positive_amount(),
        status in non_draft_status(),
    ) {
        let result = CurrencyConverter::convert(
            amount,
            &CurrencyCode::from("USD"),
            &CurrencyCode::inr(),
            &ExchangeRates::new(),
            status,
        );
        prop_assert_eq!(result.amount, Decimal::ZERO);
        let is_missing_rate = matches!(
            result.warning,
            Some(BillingWarning::MissingExchangeRate { .. })
        );
        prop_assert!(is_missing_rate);
    }

    /// Conversion with a valid rate is the rounded product and is deterministic.
    #[test]
    fn prop_convert_is_rounded_product(
        amount in positive_amount(),
        rate in positive_rate(),
        status in any_status(),
    ) {
        let rates = ExchangeRates::new().with("USD", rate);
        let usd = CurrencyCode::from("USD");
        let inr = CurrencyCode::inr();

        let first = CurrencyConverter::convert(amount, &usd, &inr, &rates, status);
        let second = CurrencyConverter::convert(amount, &usd, &inr, &rates, status);

        prop_assert_eq!(first.amount, round(amount * rate, 4));
        prop_assert_eq!(&first, &second);
        prop_assert!(first.amount >= Decimal::ZERO);
    }
}
