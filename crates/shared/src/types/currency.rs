//! ISO 4217 currency codes.
//!
//! Codes are normalized to trimmed upper case on construction so that `"usd"`,
//! `" USD"` and `"USD"` compare equal. The set of codes is open: invoices may be
//! raised in any currency the backend knows about.

use serde::{Deserialize, Serialize};

/// Currency that expenses are recorded in unless configured otherwise.
pub const DEFAULT_EXPENSE_CURRENCY: &str = "INR";

/// A normalized currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code, normalizing case and whitespace.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// Indian Rupee.
    #[must_use]
    pub fn inr() -> Self {
        Self::new(DEFAULT_EXPENSE_CURRENCY)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if no code was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
