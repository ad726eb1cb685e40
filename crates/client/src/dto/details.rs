//! Timesheet and expense records from the invoice details endpoint.

use chrono::NaiveDate;
use lexbill_core::{ExpenseEntry, TimesheetEntry};
use lexbill_shared::{CurrencyCode, ExpenseId, TimesheetId};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{RatesDto, first_id, first_of, lenient_date};

/// `GET /invoices/{id}/details`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawDetails")]
pub struct InvoiceDetailsDto {
    /// Timesheet entries billed on the invoice.
    pub timesheet_entries: Vec<TimesheetDto>,
    /// Expense entries billed on the invoice.
    pub expense_entries: Vec<ExpenseDto>,
    /// Rates into the invoice currency.
    pub exchange_rates: RatesDto,
    /// Invoice currency.
    pub invoice_currency: Option<CurrencyCode>,
    /// First day billed.
    pub period_from: Option<NaiveDate>,
    /// Last day billed.
    pub period_to: Option<NaiveDate>,
}

/// Details record as sent, one field per accepted key.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawDetails {
    #[serde(rename = "timesheetEntries")]
    timesheet_entries_camel: Option<Vec<TimesheetDto>>,
    timesheet_entries: Option<Vec<TimesheetDto>>,
    timesheets: Option<Vec<TimesheetDto>>,
    #[serde(rename = "expenseEntries")]
    expense_entries_camel: Option<Vec<ExpenseDto>>,
    expense_entries: Option<Vec<ExpenseDto>>,
    expenses: Option<Vec<ExpenseDto>>,
    #[serde(rename = "exchangeRates")]
    exchange_rates_camel: Option<RatesDto>,
    exchange_rates: Option<RatesDto>,
    #[serde(rename = "invoiceCurrency")]
    invoice_currency_camel: Option<CurrencyCode>,
    invoice_currency: Option<CurrencyCode>,
    #[serde(rename = "periodFrom", deserialize_with = "lenient_date")]
    period_from_camel: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    period_from: Option<NaiveDate>,
    #[serde(rename = "periodTo", deserialize_with = "lenient_date")]
    period_to_camel: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    period_to: Option<NaiveDate>,
}

impl From<RawDetails> for InvoiceDetailsDto {
    fn from(raw: RawDetails) -> Self {
        Self {
            timesheet_entries: first_of([
                raw.timesheet_entries_camel,
                raw.timesheet_entries,
                raw.timesheets,
            ])
            .unwrap_or_default(),
            expense_entries: first_of([
                raw.expense_entries_camel,
                raw.expense_entries,
                raw.expenses,
            ])
            .unwrap_or_default(),
            exchange_rates: first_of([raw.exchange_rates_camel, raw.exchange_rates])
                .unwrap_or_default(),
            invoice_currency: first_of([raw.invoice_currency_camel, raw.invoice_currency]),
            period_from: first_of([raw.period_from_camel, raw.period_from]),
            period_to: first_of([raw.period_to_camel, raw.period_to]),
        }
    }
}

/// A timesheet entry as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawTimesheet")]
pub struct TimesheetDto {
    /// First non-blank of `timesheetId`, `timesheet_id` and `id`.
    pub id: Option<TimesheetId>,
    /// Lawyer name.
    pub lawyer_name: Option<String>,
    /// Lawyer role.
    pub lawyer_role: Option<String>,
    /// Day worked.
    pub date: Option<NaiveDate>,
    /// Hours.
    pub hours: Option<Decimal>,
    /// Hourly rate.
    pub hourly_rate: Option<Decimal>,
    /// Currency of rate and fees.
    pub currency: Option<CurrencyCode>,
    /// Fee as computed upstream.
    pub fees: Option<Decimal>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawTimesheet {
    #[serde(rename = "timesheetId")]
    timesheet_id_camel: Option<TimesheetId>,
    timesheet_id: Option<TimesheetId>,
    id: Option<TimesheetId>,
    #[serde(rename = "lawyerName")]
    lawyer_name_camel: Option<String>,
    lawyer_name: Option<String>,
    lawyer: Option<String>,
    #[serde(rename = "lawyerRole")]
    lawyer_role_camel: Option<String>,
    lawyer_role: Option<String>,
    role: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    date: Option<NaiveDate>,
    hours: Option<Decimal>,
    #[serde(rename = "hourlyRate")]
    hourly_rate_camel: Option<Decimal>,
    hourly_rate: Option<Decimal>,
    rate: Option<Decimal>,
    currency: Option<CurrencyCode>,
    fees: Option<Decimal>,
    fee: Option<Decimal>,
    amount: Option<Decimal>,
}

impl From<RawTimesheet> for TimesheetDto {
    fn from(raw: RawTimesheet) -> Self {
        Self {
            id: first_id([raw.timesheet_id_camel, raw.timesheet_id, raw.id]),
            lawyer_name: first_of([raw.lawyer_name_camel, raw.lawyer_name, raw.lawyer]),
            lawyer_role: first_of([raw.lawyer_role_camel, raw.lawyer_role, raw.role]),
            date: raw.date,
            hours: raw.hours,
            hourly_rate: first_of([raw.hourly_rate_camel, raw.hourly_rate, raw.rate]),
            currency: raw.currency,
            fees: first_of([raw.fees, raw.fee, raw.amount]),
        }
    }
}

impl TimesheetDto {
    /// Converts to a domain entry; a missing currency means `default_currency`.
    #[must_use]
    pub fn into_entry(self, default_currency: &CurrencyCode) -> TimesheetEntry {
        TimesheetEntry {
            id: self.id,
            lawyer_name: self.lawyer_name.unwrap_or_default(),
            lawyer_role: self.lawyer_role.unwrap_or_default(),
            date: self.date,
            hours: self.hours.unwrap_or_default(),
            hourly_rate: self.hourly_rate.unwrap_or_default(),
            currency: self
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| default_currency.clone()),
            fees: self.fees.unwrap_or_default(),
        }
    }
}

/// An expense entry as sent by the backend.
///
/// Billed amount, billed currency and rate computed upstream are ignored;
/// billing is always recomputed from the original amount.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawExpense")]
pub struct ExpenseDto {
    /// Expense ID.
    pub id: Option<ExpenseId>,
    /// Category.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Day incurred.
    pub date: Option<NaiveDate>,
    /// Amount as recorded.
    pub original_amount: Option<Decimal>,
    /// Currency as recorded.
    pub original_currency: Option<CurrencyCode>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawExpense {
    id: Option<ExpenseId>,
    #[serde(rename = "expenseId")]
    expense_id_camel: Option<ExpenseId>,
    expense_id: Option<ExpenseId>,
    category: Option<String>,
    #[serde(rename = "expenseType")]
    expense_type_camel: Option<String>,
    expense_type: Option<String>,
    description: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    date: Option<NaiveDate>,
    #[serde(rename = "originalAmount")]
    original_amount_camel: Option<Decimal>,
    original_amount: Option<Decimal>,
    amount: Option<Decimal>,
    #[serde(rename = "originalCurrency")]
    original_currency_camel: Option<CurrencyCode>,
    original_currency: Option<CurrencyCode>,
    currency: Option<CurrencyCode>,
}

impl From<RawExpense> for ExpenseDto {
    fn from(raw: RawExpense) -> Self {
        Self {
            id: first_id([raw.id, raw.expense_id_camel, raw.expense_id]),
            category: first_of([raw.category, raw.expense_type_camel, raw.expense_type]),
            description: raw.description,
            date: raw.date,
            original_amount: first_of([
                raw.original_amount_camel,
                raw.original_amount,
                raw.amount,
            ]),
            original_currency: first_of([
                raw.original_currency_camel,
                raw.original_currency,
                raw.currency,
            ]),
        }
    }
}

impl From<ExpenseDto> for ExpenseEntry {
    fn from(dto: ExpenseDto) -> Self {
        Self {
            id: dto.id,
            category: dto.category.unwrap_or_default(),
            description: dto.description,
            date: dto.date,
            original_amount: dto.original_amount.unwrap_or_default(),
            original_currency: dto.original_currency.unwrap_or_else(|| CurrencyCode::new("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(r#"{"timesheetId": 12, "id": 99}"#, Some("12"))]
    #[case(r#"{"timesheet_id": "12"}"#, Some("12"))]
    #[case(r#"{"timesheetId": " ", "id": 99}"#, Some("99"))]
    #[case(r#"{"id": 99}"#, Some("99"))]
    #[case(r#"{"timesheetId": 12, "timesheet_id": 12, "id": 99}"#, Some("12"))]
    #[case(r#"{"timesheetId": null}"#, None)]
    #[case("{}", None)]
    fn test_timesheet_id_normalization(#[case] json: &str, #[case] expected: Option<&str>) {
        let dto: TimesheetDto = serde_json::from_str(json).unwrap();
        let entry = dto.into_entry(&CurrencyCode::inr());
        assert_eq!(entry.id, expected.map(TimesheetId::new));
    }

    #[test]
    fn test_timesheet_fields_in_snake_case() {
        let dto: TimesheetDto = serde_json::from_str(
            r#"{"id": 1, "lawyer_name": "Arjun", "lawyer_role": "Associate", "date": "2026-02-14",
                "hours": "1.5", "hourly_rate": 3000, "currency": "inr", "fees": 4500}"#,
        )
        .unwrap();
        let entry = dto.into_entry(&CurrencyCode::from("USD"));

        assert_eq!(entry.lawyer_name, "Arjun");
        assert_eq!(entry.lawyer_role, "Associate");
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2026, 2, 14));
        assert_eq!(entry.hours, dec!(1.5));
        assert_eq!(entry.hourly_rate, dec!(3000));
        assert_eq!(entry.currency, CurrencyCode::inr());
    }

    #[test]
    fn test_expense_ignores_upstream_billing() {
        let dto: ExpenseDto = serde_json::from_str(
            r#"{"id": 5, "category": "Travel", "originalAmount": 2500, "originalCurrency": "INR",
                "billedAmount": 30, "billedCurrency": "USD", "exchangeRate": 0.012}"#,
        )
        .unwrap();
        let entry = ExpenseEntry::from(dto);

        assert_eq!(entry.original_amount, dec!(2500));
        assert_eq!(entry.original_currency, CurrencyCode::inr());
    }

    #[rstest]
    #[case(r#"{"id": 5, "expenseId": 5, "category": "Travel", "expenseType": "Misc",
              "originalAmount": 2500, "amount": 30, "originalCurrency": "INR", "currency": "USD"}"#)]
    #[case(r#"{"expense_id": "5", "expense_type": "Travel", "original_amount": 2500,
              "originalAmount": null, "original_currency": "inr"}"#)]
    fn test_expense_accepts_every_key_at_once(#[case] json: &str) {
        let dto: ExpenseDto = serde_json::from_str(json).unwrap();
        let entry = ExpenseEntry::from(dto);

        assert_eq!(entry.id, Some(ExpenseId::new("5")));
        assert_eq!(entry.category, "Travel");
        assert_eq!(entry.original_amount, dec!(2500));
        assert_eq!(entry.original_currency, CurrencyCode::inr());
    }

    #[test]
    fn test_timesheet_with_both_key_styles() {
        let dto: TimesheetDto = serde_json::from_str(
            r#"{"timesheetId": 3, "lawyerName": "Meera", "lawyer_name": "Meera",
                "hourlyRate": 100, "hourly_rate": 100, "rate": 90, "hours": 2}"#,
        )
        .unwrap();
        let entry = dto.into_entry(&CurrencyCode::inr());

        assert_eq!(entry.lawyer_name, "Meera");
        assert_eq!(entry.hourly_rate, dec!(100));
    }

    #[test]
    fn test_details_with_both_key_styles() {
        let dto: InvoiceDetailsDto = serde_json::from_str(
            r#"{"timesheetEntries": [{"id": 1}], "timesheet_entries": [{"id": 1}],
                "exchangeRates": {"INR": 0.012}, "exchange_rates": {"INR": 0.012},
                "periodFrom": "2026-03-01", "period_from": "2026-03-01"}"#,
        )
        .unwrap();

        assert_eq!(dto.timesheet_entries.len(), 1);
        assert!(!dto.exchange_rates.is_empty());
        assert_eq!(dto.period_from, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_details_accepts_null_lists_and_bad_dates() {
        let dto: InvoiceDetailsDto = serde_json::from_str(
            r#"{"timesheetEntries": null, "expenses": [], "periodFrom": "not a date"}"#,
        )
        .unwrap();

        assert!(dto.timesheet_entries.is_empty());
        assert!(dto.period_from.is_none());
    }
}
