//! Invoice data types.

use lexbill_shared::{CurrencyCode, InvoiceId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::InvoiceStatus;
use crate::currency::ExchangeRates;

/// How the discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Value is a percentage of the subtotal.
    #[default]
    Percentage,
    /// Value is an absolute amount in the invoice currency.
    Fixed,
}

/// Discount applied to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Discount {
    /// Interpretation of `value`.
    pub kind: DiscountType,
    /// Percentage or fixed amount.
    pub value: Decimal,
}

impl Discount {
    /// No discount.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: DiscountType::Percentage,
            value: Decimal::ZERO,
        }
    }

    /// Percentage discount.
    #[must_use]
    pub const fn percentage(value: Decimal) -> Self {
        Self {
            kind: DiscountType::Percentage,
            value,
        }
    }

    /// Fixed-amount discount.
    #[must_use]
    pub const fn fixed(value: Decimal) -> Self {
        Self {
            kind: DiscountType::Fixed,
            value,
        }
    }

    /// Discount amount for the given subtotal; `None` on overflow.
    ///
    /// Not clamped: a fixed discount larger than the subtotal is returned as-is.
    #[must_use]
    pub fn amount_on(&self, subtotal: Decimal) -> Option<Decimal> {
        match self.kind {
            DiscountType::Percentage => subtotal
                .checked_mul(self.value)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED)),
            DiscountType::Fixed => Some(self.value),
        }
    }
}

/// A partner's share of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerShare {
    /// Partner's user ID.
    pub user_id: UserId,
    /// Partner's display name.
    pub name: String,
    /// Share of the final amount, 0-100.
    pub percentage: Decimal,
}

/// A child invoice carrying part of a parent invoice's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInvoice {
    /// Split invoice ID.
    pub id: InvoiceId,
    /// Amount billed on this split.
    pub final_amount: Decimal,
    /// Amount paid against this split.
    pub amount_paid: Decimal,
    /// Split status.
    pub status: InvoiceStatus,
    /// Partner shares on this split.
    pub partner_shares: Vec<PartnerShare>,
}

/// An invoice as needed by the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Currency the invoice is billed in.
    pub currency: CurrencyCode,
    /// Rates into `currency`, keyed by source currency.
    pub exchange_rates: ExchangeRates,
    /// Lifecycle status.
    pub status: InvoiceStatus,
    /// Discount on the subtotal.
    pub discount: Discount,
    /// Amount paid according to the invoice's own ledger.
    pub amount_paid: Decimal,
    /// Subtotal stored upstream; informational only.
    pub stored_subtotal: Option<Decimal>,
    /// Final amount stored upstream; informational only.
    pub stored_final_amount: Option<Decimal>,
    /// Parent invoice when this invoice is itself a split.
    pub parent_id: Option<InvoiceId>,
    /// Partner shares on this invoice.
    pub partner_shares: Vec<PartnerShare>,
    /// Split children when this invoice is a parent.
    pub splits: Vec<SplitInvoice>,
}

impl Invoice {
    /// Creates a draft invoice with no discount, payments, shares or splits.
    #[must_use]
    pub fn new(id: InvoiceId, currency: CurrencyCode, status: InvoiceStatus) -> Self {
        Self {
            id,
            currency,
            exchange_rates: ExchangeRates::new(),
            status,
            discount: Discount::none(),
            amount_paid: Decimal::ZERO,
            stored_subtotal: None,
            stored_final_amount: None,
            parent_id: None,
            partner_shares: Vec::new(),
            splits: Vec::new(),
        }
    }

    /// Returns true for draft invoices.
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        self.status.is_draft()
    }

    /// Returns true if the invoice has been split into children.
    #[must_use]
    pub fn has_splits(&self) -> bool {
        !self.splits.is_empty()
    }
}
