//! Invoice lifecycle status.

use serde::{Deserialize, Serialize};

/// Invoice status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Still being assembled; amounts are editable and missing rates are tolerated.
    Draft,
    /// Locked for billing.
    Finalized,
    /// A signed copy has been uploaded.
    InvoiceUploaded,
    /// Some payments have been received.
    PartiallyPaid,
    /// Fully paid.
    Paid,
    /// Past its due date.
    Overdue,
    /// Newly created by the backend.
    New,
}

impl InvoiceStatus {
    /// Returns true for draft invoices.
    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
            Self::InvoiceUploaded => "invoice_uploaded",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::New => "new",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "draft" => Ok(Self::Draft),
            "finalized" | "finalised" => Ok(Self::Finalized),
            "invoice_uploaded" => Ok(Self::InvoiceUploaded),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "new" => Ok(Self::New),
            _ => Err(format!("Unknown invoice status: {s}")),
        }
    }
}

/// How timesheet entries are laid out on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// One row per entry, still editable.
    Draft,
    /// One row per (lawyer, role), converted into the invoice currency.
    Finalized,
}

impl AggregationMode {
    /// Mode used for an invoice in the given status.
    #[must_use]
    pub const fn for_status(status: InvoiceStatus) -> Self {
        if status.is_draft() {
            Self::Draft
        } else {
            Self::Finalized
        }
    }
}
