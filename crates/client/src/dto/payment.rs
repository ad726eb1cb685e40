//! Payment records.

use chrono::NaiveDate;
use lexbill_core::Payment;
use lexbill_shared::{InvoiceId, PaymentId};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{first_id, first_of, lenient_date};

/// `GET /invoices/{id}/payments` item.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawPayment")]
pub struct PaymentDto {
    /// Payment ID.
    pub id: Option<PaymentId>,
    /// Amount paid.
    pub amount: Option<Decimal>,
    /// Day received.
    pub payment_date: Option<NaiveDate>,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Bank or cheque reference.
    pub reference: Option<String>,
    /// Split invoice the payment was made against.
    pub split_invoice_id: Option<InvoiceId>,
}

/// Payment record as sent, one field per accepted key.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawPayment {
    id: Option<PaymentId>,
    #[serde(rename = "paymentId")]
    payment_id_camel: Option<PaymentId>,
    payment_id: Option<PaymentId>,
    amount: Option<Decimal>,
    #[serde(rename = "paymentDate", deserialize_with = "lenient_date")]
    payment_date_camel: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    payment_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    date: Option<NaiveDate>,
    #[serde(rename = "paymentMethod")]
    payment_method_camel: Option<String>,
    payment_method: Option<String>,
    method: Option<String>,
    reference: Option<String>,
    #[serde(rename = "referenceNumber")]
    reference_number_camel: Option<String>,
    reference_number: Option<String>,
    #[serde(rename = "transactionId")]
    transaction_id_camel: Option<String>,
    transaction_id: Option<String>,
    #[serde(rename = "splitInvoiceId")]
    split_invoice_id_camel: Option<InvoiceId>,
    split_invoice_id: Option<InvoiceId>,
    #[serde(rename = "splitId")]
    split_id_camel: Option<InvoiceId>,
    split_id: Option<InvoiceId>,
}

impl From<RawPayment> for PaymentDto {
    fn from(raw: RawPayment) -> Self {
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            id: first_id([raw.id, raw.payment_id_camel, raw.payment_id]),
            amount: raw.amount,
            payment_date: first_of([raw.payment_date_camel, raw.payment_date, raw.date]),
            payment_method: first_of(
                [raw.payment_method_camel, raw.payment_method, raw.method].map(non_blank),
            ),
            reference: first_of(
                [
                    raw.reference,
                    raw.reference_number_camel,
                    raw.reference_number,
                    raw.transaction_id_camel,
                    raw.transaction_id,
                ]
                .map(non_blank),
            ),
            split_invoice_id: first_id([
                raw.split_invoice_id_camel,
                raw.split_invoice_id,
                raw.split_id_camel,
                raw.split_id,
            ]),
        }
    }
}

impl From<PaymentDto> for Payment {
    fn from(dto: PaymentDto) -> Self {
        Self {
            id: dto.id,
            amount: dto.amount.unwrap_or_default(),
            date: dto.payment_date,
            method: dto.payment_method,
            reference: dto.reference,
            split_id: dto.split_invoice_id,
        }
    }
}
