use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::auth::jwt::verify_token;
use crate::domain::navigation::{AccessControl, Capability};
use crate::domain::user::UserRole;

/// JWT authentication extractor for protected routes
///
/// Usage:
/// ```ignore
/// async fn protected_handler(auth: JwtAuth) -> Result<String, ApiError> {
///     auth.require(Capability::SalesTargets)?;
///     Ok(format!("Hello user {}", auth.user_id))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JwtAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl JwtAuth {
    /// Rejects the request unless the caller's role grants `capability`
    pub fn require(&self, capability: Capability) -> Result<(), ApiError> {
        if AccessControl::for_role(self.role).can(capability) {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, role = %self.role, ?capability, "Access denied");
            Err(ApiError::forbidden("You do not have access to this module"))
        }
    }

    /// True when the role may read every salesperson's targets and revenue
    pub fn sees_all_targets(&self) -> bool {
        AccessControl::for_role(self.role).can(Capability::RevenueAnalytics)
    }

    /// Rejects reads of another user's targets for roles limited to their own
    pub fn require_target_owner(&self, user_id: Uuid) -> Result<(), ApiError> {
        if self.user_id == user_id || self.sees_all_targets() {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, requested = %user_id, role = %self.role, "Access to another user's targets denied");
            Err(ApiError::forbidden("You can only view your own sales targets"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for JwtAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract the authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        // Extract bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

        let claims = verify_token(token, &state.jwt_secret)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(JwtAuth {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
