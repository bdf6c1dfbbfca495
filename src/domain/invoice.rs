use serde::{Deserialize, Serialize};

/// Lifecycle status of an invoice
///
/// Only `Paid` invoices count towards a sales target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "invoice_status", rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}
