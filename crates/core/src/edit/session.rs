//! Edit session for draft invoice timesheets.
//!
//! Edits are staged per [`TimesheetId`], previewed by applying them to the
//! fetched entries, and drained when they are persisted. Rows without an id
//! never enter the store.

use std::collections::BTreeMap;

use lexbill_shared::TimesheetId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::EditError;
use crate::invoice::{InvoiceStatus, TimesheetEntry};

/// Changes to one timesheet row. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEdit {
    /// New hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Decimal>,
    /// New hourly rate.
    #[serde(default, alias = "hourly_rate", skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
}

impl TimesheetEdit {
    /// Edit of hours only.
    #[must_use]
    pub const fn hours(hours: Decimal) -> Self {
        Self {
            hours: Some(hours),
            hourly_rate: None,
        }
    }

    /// Edit of the hourly rate only.
    #[must_use]
    pub const fn hourly_rate(rate: Decimal) -> Self {
        Self {
            hours: None,
            hourly_rate: Some(rate),
        }
    }

    /// Check the edit changes something and carries no negative values.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), EditError> {
        if self.hours.is_none() && self.hourly_rate.is_none() {
            return Err(EditError::EmptyEdit);
        }
        if let Some(hours) = self.hours.filter(Decimal::is_sign_negative) {
            return Err(EditError::NegativeHours(hours));
        }
        if let Some(rate) = self.hourly_rate.filter(Decimal::is_sign_negative) {
            return Err(EditError::NegativeRate(rate));
        }
        Ok(())
    }

    /// Fields set in `later` override this edit's.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            hours: later.hours.or(self.hours),
            hourly_rate: later.hourly_rate.or(self.hourly_rate),
        }
    }

    /// Apply to an entry, recomputing its fee from the new hours and rate.
    ///
    /// A fee outside the decimal range is stored as zero.
    pub fn apply_to(&self, entry: &mut TimesheetEntry) {
        if let Some(hours) = self.hours {
            entry.hours = hours;
        }
        if let Some(rate) = self.hourly_rate {
            entry.hourly_rate = rate;
        }
        entry.fees = entry
            .hours
            .checked_mul(entry.hourly_rate)
            .unwrap_or(Decimal::ZERO);
    }
}

/// Staged timesheet edits for one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    status: InvoiceStatus,
    pending: BTreeMap<TimesheetId, TimesheetEdit>,
}

impl EditSession {
    /// Start a session for an invoice in `status`.
    #[must_use]
    pub const fn new(status: InvoiceStatus) -> Self {
        Self {
            status,
            pending: BTreeMap::new(),
        }
    }

    /// Status of the invoice being edited.
    #[must_use]
    pub const fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Stage an edit to `entry`, merging with any edit already staged for it.
    ///
    /// # Errors
    ///
    /// - [`EditError::InvoiceLocked`] unless the invoice is a draft
    /// - [`EditError::MissingIdentifier`] if the row has no id
    /// - validation errors from [`TimesheetEdit::validate`]
    pub fn stage(
        &mut self,
        entry: &TimesheetEntry,
        edit: TimesheetEdit,
    ) -> Result<TimesheetEdit, EditError> {
        if !self.status.is_draft() {
            return Err(EditError::InvoiceLocked(self.status));
        }
        let Some(id) = entry.id.as_ref().filter(|id| !id.is_blank()) else {
            warn!(
                lawyer = %entry.lawyer_name,
                date = ?entry.date,
                "Rejected edit to timesheet row without identifier"
            );
            return Err(EditError::MissingIdentifier {
                lawyer_name: entry.lawyer_name.clone(),
            });
        };
        edit.validate()?;

        let merged = self
            .pending
            .get(id)
            .map_or(edit, |staged| staged.merge(edit));
        debug!(timesheet_id = %id, ?merged, "Staged timesheet edit");
        self.pending.insert(id.clone(), merged);
        Ok(merged)
    }

    /// Drop the staged edit for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::UnknownTimesheet`] if nothing is staged for `id`.
    pub fn discard(&mut self, id: &TimesheetId) -> Result<TimesheetEdit, EditError> {
        self.pending
            .remove(id)
            .ok_or_else(|| EditError::UnknownTimesheet(id.clone()))
    }

    /// Staged edit for `id`.
    #[must_use]
    pub fn get(&self, id: &TimesheetId) -> Option<&TimesheetEdit> {
        self.pending.get(id)
    }

    /// Returns true if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of staged edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Entries with staged edits applied, for previewing recomputed totals.
    #[must_use]
    pub fn apply(&self, entries: &[TimesheetEntry]) -> Vec<TimesheetEntry> {
        entries
            .iter()
            .map(|entry| {
                let mut preview = entry.clone();
                if let Some(edit) = entry.id.as_ref().and_then(|id| self.pending.get(id)) {
                    edit.apply_to(&mut preview);
                }
                preview
            })
            .collect()
    }

    /// Staged edits in id order, without clearing them.
    pub fn pending(&self) -> impl Iterator<Item = (&TimesheetId, &TimesheetEdit)> {
        self.pending.iter()
    }

    /// Drain staged edits in id order for persistence.
    pub fn take_pending(&mut self) -> Vec<(TimesheetId, TimesheetEdit)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}
