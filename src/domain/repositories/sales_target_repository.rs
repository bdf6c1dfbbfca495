use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::sales_target::{SalesTarget, SalesTargetWithUser, TargetPeriod, TargetType};

/// Repository trait for the SalesTarget aggregate
///
/// `(user_id, period)` must be unique; implementations report a violation
/// as [`RepositoryError::Conflict`](super::RepositoryError::Conflict).
#[async_trait]
pub trait SalesTargetRepository: Send + Sync {
    /// Insert a new target
    async fn insert(&self, target: &SalesTarget) -> RepositoryResult<()>;

    /// Overwrite an existing target; `NotFound` if the id is unknown
    async fn update(&self, target: &SalesTarget) -> RepositoryResult<()>;

    /// Find a target by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<SalesTarget>>;

    /// All targets with their owners, newest first
    async fn find_all_with_user(&self) -> RepositoryResult<Vec<SalesTargetWithUser>>;

    /// Any target (active or not) for the user and period, optionally ignoring one id
    async fn find_by_user_and_period(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
        exclude_id: Option<Uuid>,
    ) -> RepositoryResult<Option<SalesTarget>>;

    /// The active target for the user and period
    async fn find_active_by_user_and_period(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
    ) -> RepositoryResult<Option<SalesTarget>>;

    /// Active targets of one type, optionally for one user, by period ascending
    async fn find_active_by_type(
        &self,
        user_id: Option<Uuid>,
        target_type: TargetType,
    ) -> RepositoryResult<Vec<SalesTarget>>;

    /// Delete a target by ID; `NotFound` if the id is unknown
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
