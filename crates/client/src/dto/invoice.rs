//! Invoice, split and partner-share records.

use lexbill_core::{Discount, Invoice, PartnerShare, SplitInvoice};
use lexbill_shared::{CurrencyCode, InvoiceId, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{RatesDto, first_id, first_of, parse_status};

/// `GET /invoices/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawInvoice")]
pub struct InvoiceDto {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Invoice currency.
    pub currency: Option<CurrencyCode>,
    /// Raw status string.
    pub status: Option<String>,
    /// `percentage` or `fixed`.
    pub discount_type: Option<String>,
    /// Discount percentage or amount.
    pub discount_value: Option<Decimal>,
    /// Amount paid against the invoice itself.
    pub amount_paid: Option<Decimal>,
    /// Subtotal stored upstream.
    pub subtotal: Option<Decimal>,
    /// Final amount stored upstream.
    pub final_amount: Option<Decimal>,
    /// Parent invoice when this invoice is a split.
    pub parent_id: Option<InvoiceId>,
    /// Partner shares.
    pub partner_shares: Vec<PartnerShareDto>,
    /// Rates stored on the invoice record.
    pub exchange_rates: RatesDto,
}

/// Invoice record as sent, one field per accepted key.
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawInvoice {
    id: Option<InvoiceId>,
    #[serde(rename = "invoiceId")]
    invoice_id_camel: Option<InvoiceId>,
    invoice_id: Option<InvoiceId>,
    currency: Option<CurrencyCode>,
    #[serde(rename = "invoiceCurrency")]
    invoice_currency_camel: Option<CurrencyCode>,
    invoice_currency: Option<CurrencyCode>,
    status: Option<String>,
    #[serde(rename = "discountType")]
    discount_type_camel: Option<String>,
    discount_type: Option<String>,
    #[serde(rename = "discountValue")]
    discount_value_camel: Option<Decimal>,
    discount_value: Option<Decimal>,
    discount: Option<Decimal>,
    #[serde(rename = "amountPaid")]
    amount_paid_camel: Option<Decimal>,
    amount_paid: Option<Decimal>,
    subtotal: Option<Decimal>,
    #[serde(rename = "finalAmount")]
    final_amount_camel: Option<Decimal>,
    final_amount: Option<Decimal>,
    #[serde(rename = "parentId")]
    parent_id_camel: Option<InvoiceId>,
    parent_id: Option<InvoiceId>,
    #[serde(rename = "parentInvoiceId")]
    parent_invoice_id_camel: Option<InvoiceId>,
    parent_invoice_id: Option<InvoiceId>,
    #[serde(rename = "partnerShares")]
    partner_shares_camel: Option<Vec<PartnerShareDto>>,
    partner_shares: Option<Vec<PartnerShareDto>>,
    #[serde(rename = "exchangeRates")]
    exchange_rates_camel: Option<RatesDto>,
    exchange_rates: Option<RatesDto>,
}

impl TryFrom<RawInvoice> for InvoiceDto {
    type Error = String;

    fn try_from(raw: RawInvoice) -> Result<Self, Self::Error> {
        let id = first_id([raw.id, raw.invoice_id_camel, raw.invoice_id])
            .ok_or_else(|| "invoice record has no id".to_string())?;
        Ok(Self {
            id,
            currency: first_of([
                raw.currency,
                raw.invoice_currency_camel,
                raw.invoice_currency,
            ]),
            status: raw.status,
            discount_type: first_of([raw.discount_type_camel, raw.discount_type]),
            discount_value: first_of([
                raw.discount_value_camel,
                raw.discount_value,
                raw.discount,
            ]),
            amount_paid: first_of([raw.amount_paid_camel, raw.amount_paid]),
            subtotal: raw.subtotal,
            final_amount: first_of([raw.final_amount_camel, raw.final_amount]),
            parent_id: first_id([
                raw.parent_id_camel,
                raw.parent_id,
                raw.parent_invoice_id_camel,
                raw.parent_invoice_id,
            ]),
            partner_shares: first_of([raw.partner_shares_camel, raw.partner_shares])
                .unwrap_or_default(),
            exchange_rates: first_of([raw.exchange_rates_camel, raw.exchange_rates])
                .unwrap_or_default(),
        })
    }
}

impl InvoiceDto {
    /// Converts to a domain invoice billed in `currency`, without rates or splits.
    #[must_use]
    pub fn into_invoice(self, currency: CurrencyCode) -> Invoice {
        let status = parse_status(self.status.as_deref());
        let mut invoice = Invoice::new(self.id, currency, status);
        invoice.discount = discount(self.discount_type.as_deref(), self.discount_value);
        invoice.amount_paid = self.amount_paid.unwrap_or_default();
        invoice.stored_subtotal = self.subtotal;
        invoice.stored_final_amount = self.final_amount;
        invoice.parent_id = self.parent_id;
        invoice.partner_shares = self.partner_shares.into_iter().map(Into::into).collect();
        invoice
    }
}

fn discount(kind: Option<&str>, value: Option<Decimal>) -> Discount {
    let value = value.unwrap_or_default();
    match kind.map(|k| k.trim().to_lowercase()).as_deref() {
        Some("fixed" | "amount" | "flat") => Discount::fixed(value),
        Some("percentage" | "percent") | None => Discount::percentage(value),
        Some(other) => {
            debug!(kind = other, "Unknown discount type; treating as percentage");
            Discount::percentage(value)
        }
    }
}

/// A partner's share as sent by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawPartnerShare")]
pub struct PartnerShareDto {
    /// Partner's user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: Option<String>,
    /// Share percentage.
    pub percentage: Option<Decimal>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawPartnerShare {
    #[serde(rename = "userId")]
    user_id_camel: Option<UserId>,
    user_id: Option<UserId>,
    #[serde(rename = "partnerId")]
    partner_id_camel: Option<UserId>,
    partner_id: Option<UserId>,
    name: Option<String>,
    #[serde(rename = "partnerName")]
    partner_name_camel: Option<String>,
    partner_name: Option<String>,
    #[serde(rename = "userName")]
    user_name_camel: Option<String>,
    user_name: Option<String>,
    percentage: Option<Decimal>,
    #[serde(rename = "sharePercentage")]
    share_percentage_camel: Option<Decimal>,
    share_percentage: Option<Decimal>,
}

impl TryFrom<RawPartnerShare> for PartnerShareDto {
    type Error = String;

    fn try_from(raw: RawPartnerShare) -> Result<Self, Self::Error> {
        let user_id = first_id([
            raw.user_id_camel,
            raw.user_id,
            raw.partner_id_camel,
            raw.partner_id,
        ])
        .ok_or_else(|| "partner share has no user id".to_string())?;
        Ok(Self {
            user_id,
            name: first_of([
                raw.name,
                raw.partner_name_camel,
                raw.partner_name,
                raw.user_name_camel,
                raw.user_name,
            ]),
            percentage: first_of([
                raw.percentage,
                raw.share_percentage_camel,
                raw.share_percentage,
            ]),
        })
    }
}

impl From<PartnerShareDto> for PartnerShare {
    fn from(dto: PartnerShareDto) -> Self {
        Self {
            user_id: dto.user_id,
            name: dto.name.unwrap_or_default(),
            percentage: dto.percentage.unwrap_or_default(),
        }
    }
}

/// `GET /invoices/{id}/splits` item.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSplit")]
pub struct SplitDto {
    /// Split invoice ID.
    pub id: InvoiceId,
    /// Amount billed on the split.
    pub final_amount: Option<Decimal>,
    /// Amount paid on the split.
    pub amount_paid: Option<Decimal>,
    /// Raw status string.
    pub status: Option<String>,
    /// Partner shares on the split.
    pub partner_shares: Vec<PartnerShareDto>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawSplit {
    id: Option<InvoiceId>,
    #[serde(rename = "invoiceId")]
    invoice_id_camel: Option<InvoiceId>,
    invoice_id: Option<InvoiceId>,
    #[serde(rename = "finalAmount")]
    final_amount_camel: Option<Decimal>,
    final_amount: Option<Decimal>,
    #[serde(rename = "amountPaid")]
    amount_paid_camel: Option<Decimal>,
    amount_paid: Option<Decimal>,
    status: Option<String>,
    #[serde(rename = "partnerShares")]
    partner_shares_camel: Option<Vec<PartnerShareDto>>,
    partner_shares: Option<Vec<PartnerShareDto>>,
}

impl TryFrom<RawSplit> for SplitDto {
    type Error = String;

    fn try_from(raw: RawSplit) -> Result<Self, Self::Error> {
        let id = first_id([raw.id, raw.invoice_id_camel, raw.invoice_id])
            .ok_or_else(|| "split invoice has no id".to_string())?;
        Ok(Self {
            id,
            final_amount: first_of([raw.final_amount_camel, raw.final_amount]),
            amount_paid: first_of([raw.amount_paid_camel, raw.amount_paid]),
            status: raw.status,
            partner_shares: first_of([raw.partner_shares_camel, raw.partner_shares])
                .unwrap_or_default(),
        })
    }
}

impl From<SplitDto> for SplitInvoice {
    fn from(dto: SplitDto) -> Self {
        Self {
            id: dto.id,
            final_amount: dto.final_amount.unwrap_or_default(),
            amount_paid: dto.amount_paid.unwrap_or_default(),
            status: parse_status(dto.status.as_deref()),
            partner_shares: dto.partner_shares.into_iter().map(Into::into).collect(),
        }
    }
}
