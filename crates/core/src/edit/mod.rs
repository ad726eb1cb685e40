//! Pending timesheet edits, keyed by timesheet id.

pub mod error;
pub mod session;

pub use error::EditError;
pub use session::{EditSession, TimesheetEdit};
