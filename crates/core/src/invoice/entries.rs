//! Timesheet, expense and payment records attached to an invoice.

use chrono::NaiveDate;
use lexbill_shared::{CurrencyCode, ExpenseId, InvoiceId, PaymentId, TimesheetId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A lawyer's time recorded against the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    /// Backend identifier; absent rows can be shown but not saved.
    pub id: Option<TimesheetId>,
    /// Lawyer who recorded the time.
    pub lawyer_name: String,
    /// Lawyer's role (partner, associate, ...).
    pub lawyer_role: String,
    /// Day the work was done.
    pub date: Option<NaiveDate>,
    /// Hours billed.
    pub hours: Decimal,
    /// Hourly rate in `currency`.
    pub hourly_rate: Decimal,
    /// Currency of the rate and fee.
    pub currency: CurrencyCode,
    /// Fee as reported upstream.
    pub fees: Decimal,
}

impl TimesheetEntry {
    /// Fee to bill for this entry, in the entry's currency.
    ///
    /// Recomputed as `hours * hourly_rate` whenever both are positive; the
    /// upstream fee is only used when that product cannot be formed.
    /// `None` if the product overflows.
    #[must_use]
    pub fn effective_fees(&self) -> Option<Decimal> {
        if self.hours > Decimal::ZERO && self.hourly_rate > Decimal::ZERO {
            self.hours.checked_mul(self.hourly_rate)
        } else {
            Some(self.fees)
        }
    }

    /// Returns true if the entry can be persisted.
    #[must_use]
    pub fn has_identifier(&self) -> bool {
        self.id.as_ref().is_some_and(|id| !id.is_blank())
    }
}

/// An expense incurred on the matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// Backend identifier.
    pub id: Option<ExpenseId>,
    /// Expense category (court fees, travel, ...).
    pub category: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Day the expense was incurred.
    pub date: Option<NaiveDate>,
    /// Amount as recorded.
    pub original_amount: Decimal,
    /// Currency the amount was recorded in.
    pub original_currency: CurrencyCode,
}

/// A payment received against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Backend identifier.
    pub id: Option<PaymentId>,
    /// Amount paid, in the invoice currency.
    pub amount: Decimal,
    /// Day the payment was received.
    pub date: Option<NaiveDate>,
    /// Payment method (bank transfer, cheque, ...).
    pub method: Option<String>,
    /// Bank or cheque reference.
    pub reference: Option<String>,
    /// Split invoice the payment was made against, if any.
    pub split_id: Option<InvoiceId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn entry(hours: Decimal, rate: Decimal, fees: Decimal) -> TimesheetEntry {
        TimesheetEntry {
            id: Some(TimesheetId::new("1")),
            lawyer_name: "A. Rao".to_string(),
            lawyer_role: "Partner".to_string(),
            date: None,
            hours,
            hourly_rate: rate,
            currency: CurrencyCode::inr(),
            fees,
        }
    }

    #[rstest]
    #[case(dec!(2), dec!(100), dec!(999), dec!(200))]
    #[case(dec!(1.5), dec!(3000), dec!(0), dec!(4500.0))]
    #[case(dec!(0), dec!(100), dec!(250), dec!(250))]
    #[case(dec!(3), dec!(0), dec!(120), dec!(120))]
    fn test_effective_fees(
        #[case] hours: Decimal,
        #[case] rate: Decimal,
        #[case] fees: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(entry(hours, rate, fees).effective_fees(), Some(expected));
    }

    #[test]
    fn test_effective_fees_overflow_is_none() {
        let huge = Decimal::from_scientific("1e15").unwrap();
        assert_eq!(entry(huge, huge, dec!(1)).effective_fees(), None);
    }

    #[test]
    fn test_has_identifier() {
        let mut e = entry(dec!(1), dec!(1), dec!(1));
        assert!(e.has_identifier());

        e.id = Some(TimesheetId::new(" "));
        assert!(!e.has_identifier());

        e.id = None;
        assert!(!e.has_identifier());
    }
}
