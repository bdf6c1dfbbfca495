// User domain module

pub mod value_objects;

use serde::Serialize;
use uuid::Uuid;

pub use value_objects::{Email, UserRole};

/// Public-facing slice of a user, joined onto sales targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
