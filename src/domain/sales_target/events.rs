use uuid::Uuid;

use super::value_objects::TargetPeriod;

/// Page listing all sales targets
pub const SALES_TARGET_PAGE: &str = "/management/sales-target";

/// Revenue analytics dashboard fed by target achievement
pub const REVENUE_ANALYTICS_PAGE: &str = "/management/finance/revenue-analytics";

/// Domain events raised when sales targets change
///
/// Presentation layers subscribe to these to know which pages hold stale
/// data.
///
/// # Example
/// ```
/// use indana_erp_api::domain::sales_target::events::SalesTargetEvent;
/// use uuid::Uuid;
///
/// let event = SalesTargetEvent::Deleted { target_id: Uuid::new_v4() };
/// assert_eq!(event.revalidate_paths(), vec!["/management/sales-target".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalesTargetEvent {
    /// A target was created
    Created {
        target_id: Uuid,
        user_id: Uuid,
        period: TargetPeriod,
    },
    /// A target's fields were edited
    Updated { target_id: Uuid },
    /// A target was removed
    Deleted { target_id: Uuid },
    /// A target was switched on or off
    StatusToggled { target_id: Uuid, is_active: bool },
}

impl SalesTargetEvent {
    /// ID of the target the event concerns
    pub fn target_id(&self) -> Uuid {
        match self {
            SalesTargetEvent::Created { target_id, .. }
            | SalesTargetEvent::Updated { target_id }
            | SalesTargetEvent::Deleted { target_id }
            | SalesTargetEvent::StatusToggled { target_id, .. } => *target_id,
        }
    }

    /// Pages whose rendered data must be refreshed after this event
    pub fn revalidate_paths(&self) -> Vec<String> {
        match self {
            SalesTargetEvent::Created { .. } => vec![
                SALES_TARGET_PAGE.to_string(),
                REVENUE_ANALYTICS_PAGE.to_string(),
            ],
            SalesTargetEvent::Updated { target_id } => vec![
                SALES_TARGET_PAGE.to_string(),
                format!("{}/edit/{}", SALES_TARGET_PAGE, target_id),
            ],
            SalesTargetEvent::Deleted { .. } | SalesTargetEvent::StatusToggled { .. } => {
                vec![SALES_TARGET_PAGE.to_string()]
            }
        }
    }
}

/// Outbound port for sales target events
pub trait EventPublisher: Send + Sync {
    /// Publishes an event; must not block or fail the caller
    fn publish(&self, event: SalesTargetEvent);
}
