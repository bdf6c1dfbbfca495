// Authentication primitives: password hashing and JWT tokens

pub mod jwt;
pub mod password;

use thiserror::Error;

/// Failures while hashing credentials or handling tokens
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;
