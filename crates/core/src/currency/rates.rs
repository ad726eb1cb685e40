//! Exchange rate table for a single invoice.

use std::collections::BTreeMap;

use lexbill_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rates into an invoice's currency, keyed by source currency.
///
/// A rate `r` stored under `USD` means 1 USD = `r` units of the invoice currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRates(BTreeMap<CurrencyCode, Decimal>);

impl ExchangeRates {
    /// Creates an empty rate table.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets the rate for a source currency, replacing any previous one.
    pub fn insert(&mut self, currency: impl Into<CurrencyCode>, rate: Decimal) {
        self.0.insert(currency.into(), rate);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, currency: impl Into<CurrencyCode>, rate: Decimal) -> Self {
        self.insert(currency, rate);
        self
    }

    /// Rate for a source currency, if present.
    #[must_use]
    pub fn get(&self, currency: &CurrencyCode) -> Option<Decimal> {
        self.0.get(currency).copied()
    }

    /// Returns true if no rates are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(currency, rate)` pairs in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, Decimal)> {
        self.0.iter().map(|(code, rate)| (code, *rate))
    }
}

impl<C: Into<CurrencyCode>> FromIterator<(C, Decimal)> for ExchangeRates {
    fn from_iter<I: IntoIterator<Item = (C, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(c, r)| (c.into(), r)).collect())
    }
}
