use thiserror::Error;
use uuid::Uuid;

use super::value_objects::PeriodError;
use crate::domain::repositories::RepositoryError;

/// Failures of sales target operations
///
/// Messages are shown to end users as-is.
#[derive(Debug, Error)]
pub enum SalesTargetError {
    #[error("User tidak ditemukan. Silakan login ulang atau hubungi administrator.")]
    UserNotFound(Uuid),

    #[error("User tidak valid. Silakan login ulang atau hubungi administrator.")]
    InvalidUser(Uuid),

    #[error("Target untuk periode ini sudah ada. Silakan edit target yang sudah ada.")]
    TargetExists,

    #[error("Target untuk periode ini sudah ada untuk user tersebut.")]
    TargetExistsForUser,

    #[error("Sales target not found")]
    NotFound(Uuid),

    #[error("No active target found for this period")]
    NoActiveTarget,

    #[error("Invalid target period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    #[error("Target amount cannot be negative")]
    NegativeAmount,

    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl SalesTargetError {
    /// Wraps a storage failure with the operation it interrupted
    pub fn persistence(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| SalesTargetError::Persistence { operation, source }
    }
}

pub type SalesTargetResult<T> = Result<T, SalesTargetError>;
