use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult, SalesTargetRepository};
use crate::domain::sales_target::{SalesTarget, SalesTargetWithUser, TargetPeriod, TargetType};
use crate::domain::user::{UserRole, UserSummary};

/// PostgreSQL implementation of SalesTargetRepository
///
/// The `(user_id, target_period)` unique constraint backs up the
/// service-level duplicate check.
pub struct PostgresSalesTargetRepository {
    pool: PgPool,
}

impl PostgresSalesTargetRepository {
    /// Creates a new PostgresSalesTargetRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TARGET_COLUMNS: &str = "id, user_id, target_type, target_period, target_amount, \
                              achieved_amount, is_active, created_at, updated_at";

#[derive(FromRow)]
struct SalesTargetRow {
    id: Uuid,
    user_id: Uuid,
    target_type: TargetType,
    target_period: String,
    target_amount: Decimal,
    achieved_amount: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SalesTargetRow> for SalesTarget {
    type Error = RepositoryError;

    fn try_from(r: SalesTargetRow) -> Result<Self, Self::Error> {
        let period = TargetPeriod::parse(&r.target_period, r.target_type).map_err(|e| {
            RepositoryError::InvalidData(format!("sales target {}: {}", r.id, e))
        })?;

        Ok(SalesTarget::from_persistence(
            r.id,
            r.user_id,
            period,
            r.target_amount,
            r.achieved_amount,
            r.is_active,
            r.created_at,
            r.updated_at,
        ))
    }
}

#[derive(FromRow)]
struct SalesTargetWithUserRow {
    #[sqlx(flatten)]
    target: SalesTargetRow,
    user_name: String,
    user_email: String,
    user_role: UserRole,
}

fn into_targets(rows: Vec<SalesTargetRow>) -> RepositoryResult<Vec<SalesTarget>> {
    rows.into_iter().map(SalesTarget::try_from).collect()
}

#[async_trait]
impl SalesTargetRepository for PostgresSalesTargetRepository {
    async fn insert(&self, target: &SalesTarget) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sales_targets (
                id, user_id, target_type, target_period, target_amount,
                achieved_amount, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(target.id())
        .bind(target.user_id())
        .bind(target.target_type())
        .bind(target.period().to_string())
        .bind(target.target_amount())
        .bind(target.achieved_amount())
        .bind(target.is_active())
        .bind(target.created_at())
        .bind(target.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, target: &SalesTarget) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE sales_targets SET
                user_id = $2,
                target_type = $3,
                target_period = $4,
                target_amount = $5,
                achieved_amount = $6,
                is_active = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(target.id())
        .bind(target.user_id())
        .bind(target.target_type())
        .bind(target.period().to_string())
        .bind(target.target_amount())
        .bind(target.achieved_amount())
        .bind(target.is_active())
        .bind(target.updated_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<SalesTarget>> {
        let row = sqlx::query_as::<_, SalesTargetRow>(&format!(
            "SELECT {TARGET_COLUMNS} FROM sales_targets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesTarget::try_from).transpose()
    }

    async fn find_all_with_user(&self) -> RepositoryResult<Vec<SalesTargetWithUser>> {
        let rows = sqlx::query_as::<_, SalesTargetWithUserRow>(
            r#"
            SELECT
                t.id, t.user_id, t.target_type, t.target_period, t.target_amount,
                t.achieved_amount, t.is_active, t.created_at, t.updated_at,
                u.name AS user_name, u.email AS user_email, u.role AS user_role
            FROM sales_targets t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                let user = UserSummary {
                    id: r.target.user_id,
                    name: r.user_name,
                    email: r.user_email,
                    role: r.user_role,
                };
                SalesTarget::try_from(r.target).map(|target| SalesTargetWithUser { target, user })
            })
            .collect()
    }

    async fn find_by_user_and_period(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
        exclude_id: Option<Uuid>,
    ) -> RepositoryResult<Option<SalesTarget>> {
        let row = sqlx::query_as::<_, SalesTargetRow>(&format!(
            "SELECT {TARGET_COLUMNS} FROM sales_targets \
             WHERE user_id = $1 AND target_period = $2 AND ($3::uuid IS NULL OR id <> $3) \
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(period.to_string())
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesTarget::try_from).transpose()
    }

    async fn find_active_by_user_and_period(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
    ) -> RepositoryResult<Option<SalesTarget>> {
        let row = sqlx::query_as::<_, SalesTargetRow>(&format!(
            "SELECT {TARGET_COLUMNS} FROM sales_targets \
             WHERE user_id = $1 AND target_period = $2 AND is_active \
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(period.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SalesTarget::try_from).transpose()
    }

    async fn find_active_by_type(
        &self,
        user_id: Option<Uuid>,
        target_type: TargetType,
    ) -> RepositoryResult<Vec<SalesTarget>> {
        let rows = sqlx::query_as::<_, SalesTargetRow>(&format!(
            "SELECT {TARGET_COLUMNS} FROM sales_targets \
             WHERE target_type = $1 AND is_active AND ($2::uuid IS NULL OR user_id = $2) \
             ORDER BY target_period ASC"
        ))
        .bind(target_type)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_targets(rows)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM sales_targets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
