// JWT token creation and verification
// Handles authentication tokens with 8-hour expiry, carrying the user role

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthResult;
use crate::domain::user::UserRole;

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `role` - Role the sidebar and route guards are derived from
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// User role at login time
    pub role: UserRole,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Creates a JWT token for a user
///
/// # Arguments
/// * `user_id` - The user's ID to include in the token
/// * `role` - The user's role
/// * `secret` - The secret key for signing (from environment)
///
/// # Returns
/// * `Ok(String)` - The JWT token
/// * `Err(AuthError::Token)` - If token creation fails
///
/// # Token Properties
/// - Expires after 8 hours
/// - Signed with HS256 algorithm
/// - Contains user_id in 'sub' claim
///
/// # Example
/// ```
/// use indana_erp_api::auth::jwt::create_token;
/// use indana_erp_api::domain::user::UserRole;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key";
/// let token = create_token(user_id, UserRole::Admin, secret).expect("valid token");
/// ```
pub fn create_token(user_id: Uuid, role: UserRole, secret: &str) -> AuthResult<String> {
    let expiry = Utc::now() + Duration::hours(8);
    let claims = Claims {
        sub: user_id,
        role,
        exp: expiry.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Verifies and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to verify
/// * `secret` - The secret key for verification (from environment)
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(AuthError::Token)` - If token is invalid or expired
///
/// # Example
/// ```
/// use indana_erp_api::auth::jwt::{create_token, verify_token};
/// use indana_erp_api::domain::user::UserRole;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key";
/// let token = create_token(user_id, UserRole::Sales, secret).unwrap();
///
/// let claims = verify_token(&token, secret).expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.role, UserRole::Sales);
/// ```
pub fn verify_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, UserRole::Owner, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn token_carries_role() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, UserRole::Warehouse, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.role, UserRole::Warehouse);
    }

    #[test]
    fn wrong_secret_fails() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, UserRole::Owner, TEST_SECRET).expect("valid token");

        let result = verify_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_fails() {
        let result = verify_token("invalid.token.string", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn token_expiry_set() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, UserRole::Owner, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        let expiry_time = claims.exp as i64;
        let now = Utc::now().timestamp();
        let in_8_hours = (Utc::now() + Duration::hours(8)).timestamp();

        // Token should expire within 8 hours (with some buffer for test execution time)
        assert!(expiry_time > now);
        assert!(expiry_time <= in_8_hours + 10); // 10 second buffer
    }
}
