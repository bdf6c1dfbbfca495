use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::invoice::InvoiceStatus;
use crate::domain::repositories::{InvoiceRepository, RepositoryError, RepositoryResult};
use crate::domain::sales_target::DateRange;

/// PostgreSQL implementation of InvoiceRepository
///
/// Invoices are attributed to a salesperson through their order.
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn midnight_utc(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn sum_paid_by_sales(&self, sales_id: Uuid, range: &DateRange) -> RepositoryResult<Decimal> {
        // Half-open on the day after `end` so the whole last day counts
        let day_after_end = range
            .end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| RepositoryError::InvalidData(format!("date overflow after {}", range.end)))?;

        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(i.total_amount), 0)
            FROM invoices i
            JOIN orders o ON o.id = i.order_id
            WHERE i.status = $1
              AND o.sales_id = $2
              AND i.invoice_date >= $3
              AND i.invoice_date < $4
            "#,
        )
        .bind(InvoiceStatus::Paid)
        .bind(sales_id)
        .bind(midnight_utc(range.start))
        .bind(midnight_utc(day_after_end))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
