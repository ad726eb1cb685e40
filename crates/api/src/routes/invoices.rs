//! Invoice summary and timesheet edit endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use lexbill_core::{EditError, EditSession, InvoiceSummary, TimesheetEdit};
use lexbill_shared::{AppError, InvoiceId, TimesheetId};
use tracing::info;

use crate::{AppState, error::ApiError};

/// Creates invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{invoice_id}/summary", get(get_summary))
        .route(
            "/invoices/{invoice_id}/timesheets/{timesheet_id}",
            put(update_timesheet),
        )
}

/// GET `/invoices/{invoice_id}/summary` - Computed totals for an invoice.
async fn get_summary(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Json<InvoiceSummary>, ApiError> {
    let invoice_id = parse_id::<InvoiceId>(&invoice_id, "invoice")?;
    let summary = build_summary(&state, &invoice_id).await?;
    Ok(Json(summary))
}

/// PUT `/invoices/{invoice_id}/timesheets/{timesheet_id}` - Edit hours or rate
/// of a draft timesheet entry and return the recomputed summary.
async fn update_timesheet(
    State(state): State<AppState>,
    Path((invoice_id, timesheet_id)): Path<(String, String)>,
    Json(edit): Json<TimesheetEdit>,
) -> Result<Json<InvoiceSummary>, ApiError> {
    let invoice_id = parse_id::<InvoiceId>(&invoice_id, "invoice")?;
    let timesheet_id = parse_id::<TimesheetId>(&timesheet_id, "timesheet")?;

    let snapshot = state.source.snapshot(&invoice_id).await?;
    let entry = snapshot
        .timesheets
        .iter()
        .find(|e| e.id.as_ref() == Some(&timesheet_id))
        .ok_or_else(|| EditError::UnknownTimesheet(timesheet_id.clone()))?;

    let mut session = EditSession::new(snapshot.invoice.status);
    session.stage(entry, edit)?;
    for (id, staged) in session.take_pending() {
        state
            .source
            .update_timesheet(&invoice_id, &id, &staged)
            .await?;
    }
    info!(invoice_id = %invoice_id, timesheet_id = %timesheet_id, "Timesheet edit saved");

    let summary = build_summary(&state, &invoice_id).await?;
    Ok(Json(summary))
}

async fn build_summary(
    state: &AppState,
    invoice_id: &InvoiceId,
) -> Result<InvoiceSummary, ApiError> {
    let snapshot = state.source.snapshot(invoice_id).await?;
    Ok(InvoiceSummary::build_with_expense_currency(
        &snapshot,
        &state.expense_currency,
    ))
}

fn parse_id<T: for<'a> From<&'a str>>(raw: &str, what: &str) -> Result<T, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{what} id is required")));
    }
    Ok(T::from(trimmed))
}
