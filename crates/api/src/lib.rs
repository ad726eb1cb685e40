//! HTTP API layer with Axum routes.
//!
//! Serves computed invoice summaries and forwards timesheet edits to the
//! backend that owns the records.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use lexbill_client::InvoiceSource;
use lexbill_shared::{BillingConfig, CurrencyCode};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backend holding invoice records.
    pub source: Arc<dyn InvoiceSource>,
    /// Currency expenses are recorded in.
    pub expense_currency: CurrencyCode,
}

impl AppState {
    /// Creates state from an invoice source and billing settings.
    #[must_use]
    pub fn new(source: Arc<dyn InvoiceSource>, billing: &BillingConfig) -> Self {
        Self {
            source,
            expense_currency: CurrencyCode::new(&billing.expense_currency),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
