//! Exchange rates and draft-aware currency conversion.

pub mod conversion;
pub mod rates;

#[cfg(test)]
mod props;

pub use conversion::{
    CONVERSION_DECIMAL_PLACES, Conversion, CurrencyConverter, apply_rate, checked_sum, round,
};
pub use rates::ExchangeRates;
