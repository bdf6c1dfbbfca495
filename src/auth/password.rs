// Account passwords, stored as bcrypt hashes
//
// Login verifies against the stored hash; the seeder hashes its shared
// development password once and reuses it for every account.

use bcrypt::{hash, verify, DEFAULT_COST};

use super::AuthResult;

/// Hashes a password at the production work factor
///
/// # Example
/// ```
/// use indana_erp_api::auth::password::{hash_password, verify_password};
///
/// let stored = hash_password("password123").expect("valid hash");
/// assert!(verify_password("password123", &stored).unwrap());
/// ```
pub fn hash_password(password: &str) -> AuthResult<String> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hashes a password with an explicit bcrypt cost (4-31)
pub fn hash_password_with_cost(password: &str, cost: u32) -> AuthResult<String> {
    Ok(hash(password, cost)?)
}

/// Checks a login attempt against a stored hash
///
/// A wrong password is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> AuthResult<bool> {
    Ok(verify(password, stored_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;

    // Lowest cost bcrypt accepts keeps the suite fast
    const TEST_COST: u32 = 4;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password_with_cost("rahasia-123", TEST_COST).unwrap();
        assert!(verify_password("rahasia-123", &stored).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let stored = hash_password_with_cost("rahasia-123", TEST_COST).unwrap();
        assert!(!verify_password("rahasia-124", &stored).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password_with_cost("rahasia-123", TEST_COST).unwrap();
        let second = hash_password_with_cost("rahasia-123", TEST_COST).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn default_cost_is_recorded_in_hash() {
        let stored = hash_password("password123").unwrap();
        assert!(stored.starts_with(&format!("$2b${:02}$", DEFAULT_COST)));
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        let result = verify_password("password123", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(AuthError::Hash(_))));
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        assert!(matches!(
            hash_password_with_cost("password123", 3),
            Err(AuthError::Hash(_))
        ));
    }
}
