use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::errors::{SalesTargetError, SalesTargetResult};
use super::events::{EventPublisher, SalesTargetEvent};
use super::sales_target::{SalesTarget, SalesTargetInput, SalesTargetWithUser};
use super::value_objects::{PeriodError, TargetPeriod, TargetType};
use crate::domain::repositories::{
    InvoiceRepository, RepositoryError, SalesTargetRepository, User, UserRepository,
};
use crate::domain::user::UserRole;

/// One bar of the target-versus-achieved chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub id: Uuid,
    pub period: TargetPeriod,
    pub target: Decimal,
    pub achieved: Decimal,
    pub percentage: Decimal,
}

impl ChartPoint {
    fn new(target: &SalesTarget, achieved: Decimal) -> Self {
        Self {
            id: target.id(),
            period: *target.period(),
            target: target.target_amount(),
            achieved,
            percentage: percentage_of(achieved, target.target_amount()),
        }
    }
}

/// `achieved / target * 100`, or zero when there is no target to divide by
pub fn percentage_of(achieved: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    achieved
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Sales target lookups, mutations and achievement reconciliation
///
/// Holds no state of its own: every call reads storage afresh.
pub struct SalesTargetService {
    targets: Arc<dyn SalesTargetRepository>,
    users: Arc<dyn UserRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    events: Arc<dyn EventPublisher>,
}

impl SalesTargetService {
    pub fn new(
        targets: Arc<dyn SalesTargetRepository>,
        users: Arc<dyn UserRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            targets,
            users,
            invoices,
            events,
        }
    }

    // ===== Reads =====

    /// All targets with owner summaries, newest first
    pub async fn list_targets(&self) -> SalesTargetResult<Vec<SalesTargetWithUser>> {
        self.targets
            .find_all_with_user()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error fetching sales targets");
                e
            })
            .map_err(SalesTargetError::persistence("fetch sales targets"))
    }

    pub async fn get_target(&self, id: Uuid) -> SalesTargetResult<Option<SalesTarget>> {
        self.targets
            .find_by_id(id)
            .await
            .map_err(|e| {
                tracing::error!(target_id = %id, error = %e, "Error fetching sales target");
                e
            })
            .map_err(SalesTargetError::persistence("fetch sales target"))
    }

    /// Active target for the user and period string
    ///
    /// Lenient: an unparseable period or a storage failure yields `None`.
    pub async fn get_user_target(&self, user_id: Uuid, period: &str) -> Option<SalesTarget> {
        let period = match period.parse::<TargetPeriod>() {
            Ok(period) => period,
            Err(e) => {
                tracing::debug!(%user_id, period, error = %e, "Ignoring unparseable target period");
                return None;
            }
        };
        self.find_active_target(user_id, &period).await
    }

    /// Active monthly target covering today
    pub async fn get_current_month_target(&self, user_id: Uuid) -> Option<SalesTarget> {
        self.get_month_target_at(user_id, Utc::now().date_naive()).await
    }

    /// Active monthly target covering `date`
    pub async fn get_month_target_at(&self, user_id: Uuid, date: NaiveDate) -> Option<SalesTarget> {
        let period = match TargetPeriod::for_date(TargetType::Monthly, date) {
            Ok(period) => period,
            Err(e) => {
                tracing::debug!(%user_id, %date, error = %e, "No monthly period for date");
                return None;
            }
        };
        self.find_active_target(user_id, &period).await
    }

    async fn find_active_target(&self, user_id: Uuid, period: &TargetPeriod) -> Option<SalesTarget> {
        match self.targets.find_active_by_user_and_period(user_id, period).await {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(%user_id, %period, error = %e, "Error fetching user sales target");
                None
            }
        }
    }

    /// Active users with the SALES role, ordered by name
    pub async fn list_sales_users(&self) -> SalesTargetResult<Vec<User>> {
        self.users
            .find_active_by_role(UserRole::Sales)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error fetching sales users");
                e
            })
            .map_err(SalesTargetError::persistence("fetch sales users"))
    }

    // ===== Mutations =====

    /// Creates a target after checking the user exists and the period is free
    pub async fn create_target(&self, input: SalesTargetInput) -> SalesTargetResult<SalesTarget> {
        let period = input.period()?;

        let user = self
            .users
            .find_by_id(input.user_id)
            .await
            .map_err(SalesTargetError::persistence("create sales target"))?;
        if user.is_none() {
            return Err(SalesTargetError::UserNotFound(input.user_id));
        }

        let existing = self
            .targets
            .find_by_user_and_period(input.user_id, &period, None)
            .await
            .map_err(SalesTargetError::persistence("create sales target"))?;
        if existing.is_some() {
            return Err(SalesTargetError::TargetExists);
        }

        let (target, event) =
            SalesTarget::new(input.user_id, period, input.target_amount, input.is_active)?;

        self.targets.insert(&target).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SalesTargetError::TargetExists,
            RepositoryError::ForeignKey(_) => SalesTargetError::InvalidUser(input.user_id),
            other => {
                tracing::error!(error = %other, "Error creating sales target");
                SalesTargetError::Persistence {
                    operation: "create sales target",
                    source: other,
                }
            }
        })?;

        tracing::info!(target_id = %target.id(), user_id = %target.user_id(), period = %period, "Sales target created");
        self.events.publish(event);
        Ok(target)
    }

    /// Replaces a target's fields unless that collides with another record
    pub async fn update_target(
        &self,
        id: Uuid,
        input: SalesTargetInput,
    ) -> SalesTargetResult<SalesTarget> {
        let period = input.period()?;

        let clash = self
            .targets
            .find_by_user_and_period(input.user_id, &period, Some(id))
            .await
            .map_err(SalesTargetError::persistence("update sales target"))?;
        if clash.is_some() {
            return Err(SalesTargetError::TargetExistsForUser);
        }

        let mut target = self
            .targets
            .find_by_id(id)
            .await
            .map_err(SalesTargetError::persistence("update sales target"))?
            .ok_or(SalesTargetError::NotFound(id))?;

        let event = target.revise(input.user_id, period, input.target_amount, input.is_active)?;

        self.targets.update(&target).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SalesTargetError::TargetExistsForUser,
            RepositoryError::ForeignKey(_) => SalesTargetError::InvalidUser(input.user_id),
            RepositoryError::NotFound => SalesTargetError::NotFound(id),
            other => {
                tracing::error!(target_id = %id, error = %other, "Error updating sales target");
                SalesTargetError::Persistence {
                    operation: "update sales target",
                    source: other,
                }
            }
        })?;

        tracing::info!(target_id = %id, period = %period, "Sales target updated");
        self.events.publish(event);
        Ok(target)
    }

    pub async fn delete_target(&self, id: Uuid) -> SalesTargetResult<()> {
        self.targets.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => SalesTargetError::NotFound(id),
            other => {
                tracing::error!(target_id = %id, error = %other, "Error deleting sales target");
                SalesTargetError::Persistence {
                    operation: "delete sales target",
                    source: other,
                }
            }
        })?;

        tracing::info!(target_id = %id, "Sales target deleted");
        self.events.publish(SalesTargetEvent::Deleted { target_id: id });
        Ok(())
    }

    /// Flips `is_active` on the stored target
    pub async fn toggle_target_status(&self, id: Uuid) -> SalesTargetResult<SalesTarget> {
        let mut target = self
            .targets
            .find_by_id(id)
            .await
            .map_err(SalesTargetError::persistence("toggle sales target status"))?
            .ok_or(SalesTargetError::NotFound(id))?;

        let event = target.toggle_active();

        self.targets.update(&target).await.map_err(|e| match e {
            RepositoryError::NotFound => SalesTargetError::NotFound(id),
            other => SalesTargetError::Persistence {
                operation: "toggle sales target status",
                source: other,
            },
        })?;

        tracing::info!(target_id = %id, is_active = target.is_active(), "Sales target status toggled");
        self.events.publish(event);
        Ok(target)
    }

    /// Stores an achieved amount computed elsewhere on the active target
    pub async fn update_achieved_amount(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
        amount: Decimal,
    ) -> SalesTargetResult<SalesTarget> {
        let mut target = self
            .targets
            .find_active_by_user_and_period(user_id, period)
            .await
            .map_err(SalesTargetError::persistence("update achieved amount"))?
            .ok_or(SalesTargetError::NoActiveTarget)?;

        target.record_achieved(amount);

        self.targets
            .update(&target)
            .await
            .map_err(SalesTargetError::persistence("update achieved amount"))?;

        tracing::debug!(%user_id, %period, %amount, "Achieved amount recorded");
        Ok(target)
    }

    /// Recalculates the achieved amount from invoices and stores it
    pub async fn recompute_achieved_amount(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
    ) -> SalesTargetResult<SalesTarget> {
        let amount = self.calculate_achieved_amount(user_id, period).await?;
        self.update_achieved_amount(user_id, period, amount).await
    }

    // ===== Achievement =====

    /// Sum of PAID invoice totals attributed to `user_id` within `period`
    pub async fn calculate_achieved_amount(
        &self,
        user_id: Uuid,
        period: &TargetPeriod,
    ) -> SalesTargetResult<Decimal> {
        let range = period
            .date_range()
            .ok_or_else(|| PeriodError::NoDateRange(period.to_string()))?;

        self.invoices
            .sum_paid_by_sales(user_id, &range)
            .await
            .map_err(SalesTargetError::persistence("calculate achieved amount"))
    }

    /// Achieved amount for dashboards; any failure reads as zero
    pub async fn achieved_amount(&self, user_id: Uuid, period: &TargetPeriod) -> Decimal {
        match self.calculate_achieved_amount(user_id, period).await {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(%user_id, %period, error = %e, "Error calculating achieved amount");
                Decimal::ZERO
            }
        }
    }

    /// Achieved amount for a raw period string of the given type
    pub async fn achieved_amount_for(
        &self,
        user_id: Uuid,
        period: &str,
        target_type: TargetType,
    ) -> Decimal {
        match TargetPeriod::parse(period, target_type) {
            Ok(period) => self.achieved_amount(user_id, &period).await,
            Err(e) => {
                tracing::warn!(%user_id, period, error = %e, "No date range for target period");
                Decimal::ZERO
            }
        }
    }

    /// Target-versus-achieved series for active targets of one type
    pub async fn chart_data(
        &self,
        user_id: Option<Uuid>,
        target_type: TargetType,
    ) -> SalesTargetResult<Vec<ChartPoint>> {
        let targets = self
            .targets
            .find_active_by_type(user_id, target_type)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error fetching targets for chart");
                e
            })
            .map_err(SalesTargetError::persistence("fetch chart data"))?;

        let points = join_all(targets.iter().map(|target| async move {
            let achieved = self.achieved_amount(target.user_id(), target.period()).await;
            ChartPoint::new(target, achieved)
        }))
        .await;

        Ok(points)
    }
}
