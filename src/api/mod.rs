// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::domain::repositories::UserRepository;
use crate::domain::sales_target::SalesTargetService;
use handlers::{auth as auth_handlers, navigation, reports, sales_targets};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub sales_targets: Arc<SalesTargetService>,
    pub users: Arc<dyn UserRepository>,
    pub jwt_secret: Arc<str>,
}

/// Builds the application router without transport layers
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(auth_handlers::health_check))
        // Auth and navigation
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/navigation/menu", get(navigation::get_menu))
        // Sales target management
        .route(
            "/api/sales-targets",
            get(sales_targets::list_targets).post(sales_targets::create_target),
        )
        .route(
            "/api/sales-targets/:id",
            get(sales_targets::get_target)
                .put(sales_targets::update_target)
                .delete(sales_targets::delete_target),
        )
        .route(
            "/api/sales-targets/:id/toggle",
            post(sales_targets::toggle_target_status),
        )
        // Per-user target lookups and achievement
        .route(
            "/api/users/:user_id/current-target",
            get(sales_targets::get_current_month_target),
        )
        .route(
            "/api/users/:user_id/targets/:period",
            get(sales_targets::get_user_target),
        )
        .route(
            "/api/users/:user_id/targets/:period/achieved",
            get(sales_targets::get_achieved_amount).put(sales_targets::set_achieved_amount),
        )
        .route(
            "/api/users/:user_id/targets/:period/recompute",
            post(sales_targets::recompute_achieved_amount),
        )
        // Reporting
        .route("/api/sales-users", get(reports::list_sales_users))
        .route("/api/reports/sales-targets/chart", get(reports::chart_data))
        .route("/api/target-periods/generate", get(reports::generate_period))
        .with_state(state)
}
