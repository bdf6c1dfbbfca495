use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::sales_target::DateRange;

/// Read-only access to invoices for revenue attribution
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Sum of `total_amount` over PAID invoices whose order belongs to
    /// `sales_id` and whose invoice date falls on any day of `range`
    async fn sum_paid_by_sales(&self, sales_id: Uuid, range: &DateRange) -> RepositoryResult<Decimal>;
}
