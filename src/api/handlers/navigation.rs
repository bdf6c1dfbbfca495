use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::api::middleware::JwtAuth;
use crate::domain::navigation::{AccessControl, MenuGenerator, MenuItem};
use crate::domain::user::UserRole;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// Current page, used to flag the active entry
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuEntry {
    #[serde(flatten)]
    pub item: MenuItem,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub role: UserRole,
    pub items: Vec<MenuEntry>,
}

/// Sidebar menu for the authenticated user
///
/// GET /api/navigation/menu?path=/management/sales-target
pub async fn get_menu(auth: JwtAuth, Query(query): Query<MenuQuery>) -> Json<MenuResponse> {
    let items = MenuGenerator::new(AccessControl::for_role(auth.role))
        .generate_sidebar()
        .into_iter()
        .map(|item| {
            let is_active = query.path.as_deref().is_some_and(|path| item.is_active(path));
            MenuEntry { item, is_active }
        })
        .collect();

    Json(MenuResponse {
        role: auth.role,
        items,
    })
}
