use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::errors::{SalesTargetError, SalesTargetResult};
use super::events::SalesTargetEvent;
use super::value_objects::{TargetPeriod, TargetType};
use crate::domain::user::UserSummary;

/// Fields submitted when creating or editing a target
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTargetInput {
    pub user_id: Uuid,
    pub target_type: TargetType,
    pub target_period: String,
    pub target_amount: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl SalesTargetInput {
    /// Parses the submitted period against the submitted type
    pub fn period(&self) -> SalesTargetResult<TargetPeriod> {
        Ok(TargetPeriod::parse(&self.target_period, self.target_type)?)
    }
}

/// Sales target aggregate root
///
/// A revenue commitment for one user over one period.
///
/// # Invariants
/// - Target amount is never negative
/// - The target type always matches the period's granularity
/// - Achieved amount only changes through [`SalesTarget::record_achieved`]
///
/// # Example
/// ```
/// use indana_erp_api::domain::sales_target::{SalesTarget, TargetPeriod};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let (target, _event) = SalesTarget::new(
///     Uuid::new_v4(),
///     TargetPeriod::Monthly { year: 2025, month: 6 },
///     Decimal::from(5_000_000),
///     true,
/// ).expect("valid target");
///
/// assert_eq!(target.period().to_string(), "2025-06");
/// assert_eq!(target.achieved_amount(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTarget {
    id: Uuid,
    user_id: Uuid,
    period: TargetPeriod,
    target_amount: Decimal,
    achieved_amount: Decimal,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SalesTarget {
    /// Creates a new target with nothing achieved yet
    ///
    /// # Returns
    /// * `Ok((SalesTarget, SalesTargetEvent))` - New target and its Created event
    /// * `Err(SalesTargetError::NegativeAmount)` - If the amount is below zero
    pub fn new(
        user_id: Uuid,
        period: TargetPeriod,
        target_amount: Decimal,
        is_active: bool,
    ) -> SalesTargetResult<(Self, SalesTargetEvent)> {
        ensure_non_negative(target_amount)?;

        let now = Utc::now();
        let target = Self {
            id: Uuid::new_v4(),
            user_id,
            period,
            target_amount,
            achieved_amount: Decimal::ZERO,
            is_active,
            created_at: now,
            updated_at: now,
        };

        let event = SalesTargetEvent::Created {
            target_id: target.id,
            user_id,
            period,
        };

        Ok((target, event))
    }

    /// Replaces the editable fields
    pub fn revise(
        &mut self,
        user_id: Uuid,
        period: TargetPeriod,
        target_amount: Decimal,
        is_active: bool,
    ) -> SalesTargetResult<SalesTargetEvent> {
        ensure_non_negative(target_amount)?;

        self.user_id = user_id;
        self.period = period;
        self.target_amount = target_amount;
        self.is_active = is_active;
        self.updated_at = Utc::now();

        Ok(SalesTargetEvent::Updated { target_id: self.id })
    }

    /// Flips the active flag
    pub fn toggle_active(&mut self) -> SalesTargetEvent {
        self.is_active = !self.is_active;
        self.updated_at = Utc::now();

        SalesTargetEvent::StatusToggled {
            target_id: self.id,
            is_active: self.is_active,
        }
    }

    /// Overwrites the stored achieved amount
    pub fn record_achieved(&mut self, amount: Decimal) {
        self.achieved_amount = amount;
        self.updated_at = Utc::now();
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn period(&self) -> &TargetPeriod {
        &self.period
    }

    pub fn target_type(&self) -> TargetType {
        self.period.target_type()
    }

    pub fn target_amount(&self) -> Decimal {
        self.target_amount
    }

    /// Last recorded achievement; may lag behind invoices
    pub fn achieved_amount(&self) -> Decimal {
        self.achieved_amount
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a SalesTarget from persistence layer data
    ///
    /// Skips validation; only repository implementations should call this.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        user_id: Uuid,
        period: TargetPeriod,
        target_amount: Decimal,
        achieved_amount: Decimal,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            period,
            target_amount,
            achieved_amount,
            is_active,
            created_at,
            updated_at,
        }
    }
}

/// A target together with a summary of its owner
#[derive(Debug, Clone)]
pub struct SalesTargetWithUser {
    pub target: SalesTarget,
    pub user: UserSummary,
}

fn ensure_non_negative(amount: Decimal) -> SalesTargetResult<()> {
    if amount < Decimal::ZERO {
        return Err(SalesTargetError::NegativeAmount);
    }
    Ok(())
}
