use serde::Serialize;

use super::access::{AccessControl, Capability};

/// One entry of the sidebar; groups carry children and no capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub href: &'static str,
    #[serde(skip)]
    pub capability: Option<Capability>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn leaf(
        id: &'static str,
        label: &'static str,
        icon: &'static str,
        href: &'static str,
        capability: Capability,
    ) -> Self {
        Self {
            id,
            label,
            icon,
            href,
            capability: Some(capability),
            children: Vec::new(),
        }
    }

    fn group(
        id: &'static str,
        label: &'static str,
        icon: &'static str,
        href: &'static str,
        children: Vec<MenuItem>,
    ) -> Self {
        Self {
            id,
            label,
            icon,
            href,
            capability: None,
            children,
        }
    }

    /// True when this item or one of its direct children points at `path`
    pub fn is_active(&self, path: &str) -> bool {
        self.href == path || self.children.iter().any(|child| child.href == path)
    }
}

/// Every module of the ERP, in sidebar order
pub fn catalog() -> Vec<MenuItem> {
    use Capability::*;

    vec![
        MenuItem::leaf("dashboard", "Dashboard", "🏠", "/dashboard", Dashboard),
        MenuItem::group(
            "sales",
            "Penjualan",
            "🛒",
            "/sales",
            vec![
                MenuItem::leaf("orders", "Pesanan", "🧾", "/sales/orders", Orders),
                MenuItem::leaf("customers", "Pelanggan", "👥", "/sales/customers", Customers),
                MenuItem::leaf(
                    "customer-visits",
                    "Kunjungan Pelanggan",
                    "📍",
                    "/sales/customer-visits",
                    CustomerVisits,
                ),
            ],
        ),
        MenuItem::group(
            "warehouse",
            "Gudang",
            "📦",
            "/warehouse",
            vec![
                MenuItem::leaf("products", "Produk", "🏷️", "/warehouse/products", Inventory),
                MenuItem::leaf(
                    "stock-movements",
                    "Pergerakan Stok",
                    "🔄",
                    "/warehouse/stock-movements",
                    Inventory,
                ),
                MenuItem::leaf(
                    "delivery-notes",
                    "Surat Jalan",
                    "🚚",
                    "/warehouse/delivery-notes",
                    DeliveryNotes,
                ),
            ],
        ),
        MenuItem::group(
            "finance",
            "Keuangan",
            "💰",
            "/management/finance",
            vec![
                MenuItem::leaf("invoices", "Invoice", "📄", "/management/finance/invoices", Invoices),
                MenuItem::leaf("payments", "Pembayaran", "💳", "/management/finance/payments", Payments),
                MenuItem::leaf(
                    "revenue-analytics",
                    "Analitik Pendapatan",
                    "📈",
                    "/management/finance/revenue-analytics",
                    RevenueAnalytics,
                ),
            ],
        ),
        MenuItem::group(
            "management",
            "Manajemen",
            "⚙️",
            "/management",
            vec![
                MenuItem::leaf("users", "Pengguna", "👤", "/management/users", UserManagement),
                MenuItem::leaf(
                    "sales-target",
                    "Target Penjualan",
                    "🎯",
                    "/management/sales-target",
                    SalesTargets,
                ),
            ],
        ),
    ]
}

/// Filters the catalog down to what one user may see
pub struct MenuGenerator {
    access: AccessControl,
}

impl MenuGenerator {
    pub fn new(access: AccessControl) -> Self {
        Self { access }
    }

    /// Sidebar tree for the user
    ///
    /// Leaves survive if their capability is granted; groups survive if at
    /// least one child does.
    pub fn generate_sidebar(&self) -> Vec<MenuItem> {
        self.filter(catalog())
    }

    fn filter(&self, items: Vec<MenuItem>) -> Vec<MenuItem> {
        items
            .into_iter()
            .filter_map(|mut item| match item.capability {
                Some(capability) => self.access.can(capability).then_some(item),
                None => {
                    item.children = self.filter(std::mem::take(&mut item.children));
                    (!item.children.is_empty()).then_some(item)
                }
            })
            .collect()
    }
}
