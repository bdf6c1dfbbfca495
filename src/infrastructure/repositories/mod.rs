// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_invoice_repository;
pub mod postgres_sales_target_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_invoice_repository::PostgresInvoiceRepository;
pub use postgres_sales_target_repository::PostgresSalesTargetRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::ForeignKey(db.message().to_string())
            }
            _ => RepositoryError::Database(error.to_string()),
        }
    }
}
