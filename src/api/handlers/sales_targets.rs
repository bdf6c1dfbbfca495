use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::{ApiError, ApiSuccess};
use crate::api::middleware::JwtAuth;
use crate::api::AppState;
use crate::domain::navigation::Capability;
use crate::domain::sales_target::{
    SalesTarget, SalesTargetInput, SalesTargetWithUser, TargetPeriod, TargetType,
};
use crate::domain::user::UserSummary;

/// Wire form of a sales target
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTargetResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_type: TargetType,
    pub target_period: TargetPeriod,
    pub target_amount: Decimal,
    pub achieved_amount: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SalesTarget> for SalesTargetResponse {
    fn from(target: &SalesTarget) -> Self {
        Self {
            id: target.id(),
            user_id: target.user_id(),
            target_type: target.target_type(),
            target_period: *target.period(),
            target_amount: target.target_amount(),
            achieved_amount: target.achieved_amount(),
            is_active: target.is_active(),
            created_at: target.created_at(),
            updated_at: target.updated_at(),
        }
    }
}

/// A target in the management listing, with its owner
#[derive(Debug, Serialize)]
pub struct SalesTargetWithUserResponse {
    #[serde(flatten)]
    pub target: SalesTargetResponse,
    pub user: UserSummary,
}

impl From<&SalesTargetWithUser> for SalesTargetWithUserResponse {
    fn from(row: &SalesTargetWithUser) -> Self {
        Self {
            target: SalesTargetResponse::from(&row.target),
            user: row.user.clone(),
        }
    }
}

/// List every target, newest first
///
/// GET /api/sales-targets
pub async fn list_targets(
    State(state): State<AppState>,
    auth: JwtAuth,
) -> Result<Json<Vec<SalesTargetWithUserResponse>>, ApiError> {
    auth.require(Capability::SalesTargets)?;

    let rows = state
        .sales_targets
        .list_targets()
        .await
        .map_err(|_| ApiError::internal_server_error("Failed to fetch sales targets"))?;

    Ok(Json(rows.iter().map(SalesTargetWithUserResponse::from).collect()))
}

/// Get a target by ID
///
/// GET /api/sales-targets/:id
pub async fn get_target(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SalesTargetResponse>, ApiError> {
    auth.require(Capability::SalesTargets)?;

    let target = state
        .sales_targets
        .get_target(id)
        .await
        .map_err(|_| ApiError::internal_server_error("Failed to fetch sales target"))?
        .ok_or_else(|| ApiError::not_found(format!("Sales target not found: {}", id)))?;

    Ok(Json(SalesTargetResponse::from(&target)))
}

/// Create a target
///
/// POST /api/sales-targets
pub async fn create_target(
    State(state): State<AppState>,
    auth: JwtAuth,
    Json(input): Json<SalesTargetInput>,
) -> Result<(StatusCode, Json<ApiSuccess<SalesTargetResponse>>), ApiError> {
    auth.require(Capability::SalesTargets)?;

    let target = state.sales_targets.create_target(input).await?;

    Ok((
        StatusCode::CREATED,
        ApiSuccess::with(SalesTargetResponse::from(&target)),
    ))
}

/// Replace a target's fields
///
/// PUT /api/sales-targets/:id
pub async fn update_target(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path(id): Path<Uuid>,
    Json(input): Json<SalesTargetInput>,
) -> Result<Json<ApiSuccess<SalesTargetResponse>>, ApiError> {
    auth.require(Capability::SalesTargets)?;

    let target = state.sales_targets.update_target(id, input).await?;

    Ok(ApiSuccess::with(SalesTargetResponse::from(&target)))
}

/// Delete a target
///
/// DELETE /api/sales-targets/:id
pub async fn delete_target(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiSuccess<()>>, ApiError> {
    auth.require(Capability::SalesTargets)?;

    state.sales_targets.delete_target(id).await?;

    Ok(ApiSuccess::empty())
}

/// Flip a target between active and inactive
///
/// POST /api/sales-targets/:id/toggle
pub async fn toggle_target_status(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiSuccess<SalesTargetResponse>>, ApiError> {
    auth.require(Capability::SalesTargets)?;

    let target = state.sales_targets.toggle_target_status(id).await?;

    Ok(ApiSuccess::with(SalesTargetResponse::from(&target)))
}

/// Active target for this month, or `null`
///
/// GET /api/users/:user_id/current-target
pub async fn get_current_month_target(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Option<SalesTargetResponse>>, ApiError> {
    auth.require_target_owner(user_id)?;

    let target = state.sales_targets.get_current_month_target(user_id).await;
    Ok(Json(target.as_ref().map(SalesTargetResponse::from)))
}

/// Active target for a period string, or `null`
///
/// GET /api/users/:user_id/targets/:period
pub async fn get_user_target(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path((user_id, period)): Path<(Uuid, String)>,
) -> Result<Json<Option<SalesTargetResponse>>, ApiError> {
    auth.require_target_owner(user_id)?;

    let target = state.sales_targets.get_user_target(user_id, &period).await;
    Ok(Json(target.as_ref().map(SalesTargetResponse::from)))
}

#[derive(Debug, Deserialize)]
pub struct AchievedQuery {
    pub target_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AchievedResponse {
    pub user_id: Uuid,
    pub period: String,
    pub achieved: Decimal,
}

/// Achieved revenue computed live from paid invoices; zero on any failure
///
/// GET /api/users/:user_id/targets/:period/achieved?target_type=QUARTERLY
pub async fn get_achieved_amount(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path((user_id, period)): Path<(Uuid, String)>,
    Query(query): Query<AchievedQuery>,
) -> Result<Json<AchievedResponse>, ApiError> {
    auth.require_target_owner(user_id)?;

    let target_type = match query.target_type.as_deref() {
        Some(raw) => TargetType::parse_or_monthly(raw),
        None => period
            .parse::<TargetPeriod>()
            .map(|p| p.target_type())
            .unwrap_or(TargetType::Monthly),
    };

    let achieved = state
        .sales_targets
        .achieved_amount_for(user_id, &period, target_type)
        .await;

    Ok(Json(AchievedResponse {
        user_id,
        period,
        achieved,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetAchievedRequest {
    pub amount: Decimal,
}

fn parse_period(raw: &str) -> Result<TargetPeriod, ApiError> {
    raw.parse::<TargetPeriod>()
        .map_err(|e| ApiError::bad_request(format!("Invalid target period: {}", e)))
}

/// Overwrite the stored achieved amount
///
/// PUT /api/users/:user_id/targets/:period/achieved
pub async fn set_achieved_amount(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path((user_id, period)): Path<(Uuid, String)>,
    Json(req): Json<SetAchievedRequest>,
) -> Result<Json<ApiSuccess<SalesTargetResponse>>, ApiError> {
    auth.require(Capability::SalesTargets)?;
    let period = parse_period(&period)?;

    let target = state
        .sales_targets
        .update_achieved_amount(user_id, &period, req.amount)
        .await?;

    Ok(ApiSuccess::with(SalesTargetResponse::from(&target)))
}

/// Recalculate the achieved amount from invoices and store it
///
/// POST /api/users/:user_id/targets/:period/recompute
pub async fn recompute_achieved_amount(
    State(state): State<AppState>,
    auth: JwtAuth,
    Path((user_id, period)): Path<(Uuid, String)>,
) -> Result<Json<ApiSuccess<SalesTargetResponse>>, ApiError> {
    auth.require(Capability::SalesTargets)?;
    let period = parse_period(&period)?;

    let target = state
        .sales_targets
        .recompute_achieved_amount(user_id, &period)
        .await?;

    Ok(ApiSuccess::with(SalesTargetResponse::from(&target)))
}
