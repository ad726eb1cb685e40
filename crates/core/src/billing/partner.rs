//! Partner share distribution.

use lexbill_shared::UserId;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::invoice::{Invoice, PartnerShare, SplitInvoice};

/// A partner's slice of an invoice's final amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerAllocation {
    /// Partner's user ID.
    pub user_id: UserId,
    /// Partner's display name.
    pub name: String,
    /// Share percentage applied.
    pub percentage: Decimal,
    /// `final_amount * percentage / 100`, in the invoice currency.
    pub amount: Decimal,
}

/// Partner share calculations.
pub struct PartnerShareCalculator;

impl PartnerShareCalculator {
    /// Distribute `final_amount` by each share's percentage.
    ///
    /// Each amount is computed independently. Percentages are not normalized,
    /// so shares that do not sum to 100 distribute more or less than the total.
    /// An amount outside the decimal range is allocated as zero.
    #[must_use]
    pub fn distribute(final_amount: Decimal, shares: &[PartnerShare]) -> Vec<PartnerAllocation> {
        shares
            .iter()
            .map(|share| {
                let amount = final_amount
                    .checked_mul(share.percentage)
                    .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                    .unwrap_or_else(|| {
                        warn!(
                            user_id = %share.user_id,
                            percentage = %share.percentage,
                            "Partner allocation overflowed; allocating zero"
                        );
                        Decimal::ZERO
                    });
                PartnerAllocation {
                    user_id: share.user_id.clone(),
                    name: share.name.clone(),
                    percentage: share.percentage,
                    amount,
                }
            })
            .collect()
    }

    /// Merge partner shares across split invoices, summing percentages per user.
    ///
    /// Users keep the order in which they first appear.
    #[must_use]
    pub fn merge_split_shares(splits: &[SplitInvoice]) -> Vec<PartnerShare> {
        let mut merged: Vec<PartnerShare> = Vec::new();
        for share in splits.iter().flat_map(|s| &s.partner_shares) {
            if let Some(existing) = merged.iter_mut().find(|m| m.user_id == share.user_id) {
                existing.percentage = existing
                    .percentage
                    .checked_add(share.percentage)
                    .unwrap_or_else(|| {
                        warn!(user_id = %share.user_id, "Merged partner percentage overflowed");
                        Decimal::ZERO
                    });
            } else {
                merged.push(share.clone());
            }
        }
        merged
    }

    /// Shares to distribute for an invoice: merged split shares for a parent,
    /// the invoice's own shares otherwise.
    #[must_use]
    pub fn shares_for(invoice: &Invoice) -> Vec<PartnerShare> {
        if invoice.has_splits() {
            Self::merge_split_shares(&invoice.splits)
        } else {
            invoice.partner_shares.clone()
        }
    }
}
