use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::JwtAuth;
use crate::api::AppState;
use crate::domain::navigation::Capability;
use crate::domain::sales_target::{ChartPoint, TargetPeriod, TargetType};

#[derive(Debug, Serialize)]
pub struct SalesUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Active SALES users for the target form's dropdown
///
/// GET /api/sales-users
pub async fn list_sales_users(
    State(state): State<AppState>,
    auth: JwtAuth,
) -> Result<Json<Vec<SalesUserResponse>>, ApiError> {
    auth.require(Capability::SalesTargets)?;

    let users = state
        .sales_targets
        .list_sales_users()
        .await
        .map_err(|_| ApiError::internal_server_error("Failed to fetch sales users"))?;

    Ok(Json(
        users
            .into_iter()
            .map(|u| SalesUserResponse {
                id: u.id,
                email: u.email.as_str().to_string(),
                name: u.name,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub user_id: Option<Uuid>,
    pub target_type: Option<String>,
}

/// Target versus achieved series
///
/// GET /api/reports/sales-targets/chart?user_id=...&target_type=MONTHLY
pub async fn chart_data(
    State(state): State<AppState>,
    auth: JwtAuth,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<ChartPoint>>, ApiError> {
    // Salespeople may only chart their own targets
    let user_id = if auth.sees_all_targets() {
        query.user_id
    } else {
        Some(auth.user_id)
    };

    let target_type = query
        .target_type
        .as_deref()
        .map(TargetType::parse_or_monthly)
        .unwrap_or(TargetType::Monthly);

    let points = state
        .sales_targets
        .chart_data(user_id, target_type)
        .await
        .map_err(|_| ApiError::internal_server_error("Failed to fetch chart data"))?;

    Ok(Json(points))
}

#[derive(Debug, Deserialize)]
pub struct GeneratePeriodQuery {
    pub target_type: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePeriodResponse {
    pub target_type: TargetType,
    pub period: TargetPeriod,
}

/// Period string for a type and date (today when omitted)
///
/// GET /api/target-periods/generate?target_type=QUARTERLY&date=2025-04-01
pub async fn generate_period(
    _auth: JwtAuth,
    Query(query): Query<GeneratePeriodQuery>,
) -> Result<Json<GeneratePeriodResponse>, ApiError> {
    let target_type = query
        .target_type
        .as_deref()
        .map(TargetType::parse_or_monthly)
        .unwrap_or(TargetType::Monthly);
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let period = TargetPeriod::for_date(target_type, date)
        .map_err(|e| ApiError::bad_request(format!("Invalid target period: {}", e)))?;

    Ok(Json(GeneratePeriodResponse {
        target_type,
        period,
    }))
}
