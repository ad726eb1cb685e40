//! Where invoice snapshots come from.

use async_trait::async_trait;
use lexbill_core::{InvoiceSnapshot, TimesheetEdit};
use lexbill_shared::{InvoiceId, TimesheetId};

use crate::error::ClientError;

/// Read and write access to invoice records.
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    /// Fetch everything needed to compute an invoice summary.
    async fn snapshot(&self, invoice_id: &InvoiceId) -> Result<InvoiceSnapshot, ClientError>;

    /// Persist an edit to one timesheet entry.
    async fn update_timesheet(
        &self,
        invoice_id: &InvoiceId,
        timesheet_id: &TimesheetId,
        edit: &TimesheetEdit,
    ) -> Result<(), ClientError>;
}
