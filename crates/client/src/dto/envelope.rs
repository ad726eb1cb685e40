//! Optional `{ "data": ... }` response wrapper.

use serde::Deserialize;

/// A payload that may or may not be wrapped in `{ "data": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// `{ "data": payload }`
    Wrapped {
        /// The payload.
        data: T,
    },
    /// The bare payload.
    Bare(T),
}

impl<T> Envelope<T> {
    /// Unwraps the payload.
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}
