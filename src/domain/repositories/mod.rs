// Repository ports
// Implemented by the infrastructure layer

pub mod invoice_repository;
pub mod sales_target_repository;
pub mod user_repository;

pub use invoice_repository::InvoiceRepository;
pub use sales_target_repository::SalesTargetRepository;
pub use user_repository::{User, UserRepository};

use thiserror::Error;

/// Errors surfaced by repository implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("invalid data in storage: {0}")]
    InvalidData(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
