//! Split planning for parent invoices.
//!
//! A parent invoice is split into independently payable children. Child
//! amounts are allocated with the Largest Remainder Method so that they sum
//! EXACTLY to the parent's final amount (no paise/cents lost):
//! 1. Compute each exact share
//! 2. Round each share toward zero
//! 3. Hand the leftover units, one each, to the largest fractional parts

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::currency::checked_sum;

/// Decimal places of a planned split amount.
pub const SPLIT_DECIMAL_PLACES: u32 = 2;

/// Reasons a split plan cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// No split percentages were given.
    #[error("At least one split is required")]
    NoSplits,

    /// A split percentage is zero or negative.
    #[error("Split percentage must be positive, got {0}")]
    NonPositivePercentage(Decimal),

    /// Split percentages do not add up to 100.
    #[error("Split percentages must sum to 100, got {0}")]
    PercentagesDoNotSumTo100(Decimal),
}

/// One child in a split plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSplit {
    /// Share of the parent, 0-100.
    pub percentage: Decimal,
    /// Amount billed on the child.
    pub amount: Decimal,
}

/// Plans child amounts for split invoices.
pub struct SplitPlanner;

impl SplitPlanner {
    /// Split `final_amount` by `percentages`, which must be positive and sum to 100.
    ///
    /// # Example
    ///
    /// ```
    /// use lexbill_core::SplitPlanner;
    /// use rust_decimal_macros::dec;
    ///
    /// let plan = SplitPlanner::plan(dec!(100), &[dec!(33.33), dec!(33.33), dec!(33.34)]).unwrap();
    /// let total: rust_decimal::Decimal = plan.iter().map(|s| s.amount).sum();
    /// assert_eq!(total, dec!(100));
    /// ```
    pub fn plan(final_amount: Decimal, percentages: &[Decimal]) -> Result<Vec<PlannedSplit>, SplitError> {
        if percentages.is_empty() {
            return Err(SplitError::NoSplits);
        }
        if let Some(bad) = percentages.iter().find(|p| **p <= Decimal::ZERO) {
            return Err(SplitError::NonPositivePercentage(*bad));
        }
        let sum = checked_sum(percentages.iter().copied()).unwrap_or(Decimal::MAX);
        if sum != Decimal::ONE_HUNDRED {
            return Err(SplitError::PercentagesDoNotSumTo100(sum));
        }

        let amounts = allocate_weighted(final_amount, percentages, SPLIT_DECIMAL_PLACES);
        Ok(percentages
            .iter()
            .zip(amounts)
            .map(|(percentage, amount)| PlannedSplit {
                percentage: *percentage,
                amount,
            })
            .collect())
    }

    /// Split `final_amount` into `count` equal children.
    pub fn plan_equal(final_amount: Decimal, count: usize) -> Result<Vec<PlannedSplit>, SplitError> {
        if count == 0 {
            return Err(SplitError::NoSplits);
        }
        let count_dec = Decimal::from(count as u64);
        let percentage = Decimal::ONE_HUNDRED / count_dec;
        let weights = vec![Decimal::ONE; count];
        let amounts = allocate_weighted(final_amount, &weights, SPLIT_DECIMAL_PLACES);
        Ok(amounts
            .into_iter()
            .map(|amount| PlannedSplit { percentage, amount })
            .collect())
    }
}

/// Largest Remainder allocation of `total` proportionally to `weights`.
fn allocate_weighted(total: Decimal, weights: &[Decimal], decimal_places: u32) -> Vec<Decimal> {
    let Some(weight_sum) = checked_sum(weights.iter().copied()) else {
        return vec![Decimal::ZERO; weights.len()];
    };
    if weights.is_empty() || weight_sum.is_zero() {
        return vec![Decimal::ZERO; weights.len()];
    }

    let unit = Decimal::new(1, decimal_places);
    let total_rounded =
        total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);

    let exact: Vec<Decimal> = weights
        .iter()
        .map(|w| {
            total_rounded
                .checked_mul(*w)
                .map_or_else(|| total_rounded / weight_sum * *w, |product| product / weight_sum)
        })
        .collect();

    let mut parts: Vec<Decimal> = exact
        .iter()
        .map(|a| a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
        .collect();

    let leftover = total_rounded - parts.iter().copied().sum::<Decimal>();
    let units = (leftover.abs() / unit)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_usize()
        .unwrap_or(0);
    if units == 0 {
        return parts;
    }

    // Negative totals round toward zero too, so the leftover has the total's sign.
    let step = if leftover.is_sign_negative() { -unit } else { unit };

    let mut by_remainder: Vec<(usize, Decimal)> = exact
        .iter()
        .zip(parts.iter())
        .enumerate()
        .map(|(i, (e, p))| (i, (*e - *p).abs()))
        .collect();
    // Stable sort keeps earlier splits first among equal remainders.
    by_remainder.sort_by(|a, b| b.1.cmp(&a.1));

    for (idx, _) in by_remainder.iter().take(units) {
        parts[*idx] += step;
    }

    parts
}
