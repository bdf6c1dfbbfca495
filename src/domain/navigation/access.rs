use serde::Serialize;
use std::collections::HashSet;

use crate::domain::user::UserRole;

/// An ERP module a user may be allowed to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Dashboard,
    Orders,
    Customers,
    CustomerVisits,
    Inventory,
    DeliveryNotes,
    Invoices,
    Payments,
    RevenueAnalytics,
    SalesTargets,
    UserManagement,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Dashboard,
        Capability::Orders,
        Capability::Customers,
        Capability::CustomerVisits,
        Capability::Inventory,
        Capability::DeliveryNotes,
        Capability::Invoices,
        Capability::Payments,
        Capability::RevenueAnalytics,
        Capability::SalesTargets,
        Capability::UserManagement,
    ];
}

/// Capabilities granted to one role
#[derive(Debug, Clone)]
pub struct AccessControl {
    granted: HashSet<Capability>,
}

impl AccessControl {
    /// Builds the fixed grant set for a role
    ///
    /// # Example
    /// ```
    /// use indana_erp_api::domain::navigation::{AccessControl, Capability};
    /// use indana_erp_api::domain::user::UserRole;
    ///
    /// let access = AccessControl::for_role(UserRole::Warehouse);
    /// assert!(access.can(Capability::Inventory));
    /// assert!(!access.can(Capability::SalesTargets));
    /// ```
    pub fn for_role(role: UserRole) -> Self {
        use Capability::*;

        let granted: HashSet<Capability> = match role {
            UserRole::Owner => Capability::ALL.into_iter().collect(),
            UserRole::Admin => Capability::ALL
                .into_iter()
                .filter(|c| *c != UserManagement)
                .collect(),
            UserRole::Warehouse => [Dashboard, Inventory, DeliveryNotes].into_iter().collect(),
            UserRole::Sales => [Dashboard, Orders, Customers, CustomerVisits, Invoices]
                .into_iter()
                .collect(),
        };

        Self { granted }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_has_everything() {
        let access = AccessControl::for_role(UserRole::Owner);
        assert!(Capability::ALL.iter().all(|c| access.can(*c)));
    }

    #[test]
    fn admin_cannot_manage_users() {
        let access = AccessControl::for_role(UserRole::Admin);
        assert!(!access.can(Capability::UserManagement));
        assert!(access.can(Capability::SalesTargets));
    }

    #[test]
    fn sales_sees_orders_not_targets() {
        let access = AccessControl::for_role(UserRole::Sales);
        assert!(access.can(Capability::Orders));
        assert!(!access.can(Capability::SalesTargets));
        assert!(!access.can(Capability::UserManagement));
    }
}
