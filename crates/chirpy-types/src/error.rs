use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the core can report. Callers branch on the variant; the
/// HTTP layer maps each one to a status code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("forbidden")]
    Forbidden,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("token has been revoked")]
    TokenRevoked,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn token_invalid(msg: impl Into<String>) -> Self {
        Self::TokenInvalid(msg.into())
    }
}
