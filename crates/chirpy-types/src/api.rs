use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Chirp, User};

// -- Tokens --

/// Hard discriminator carried in the `iss` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Token kind, see [`TokenKind::as_str`].
    pub iss: String,
    /// Stringified user id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<u64> {
        self.sub
            .parse()
            .map_err(|_| Error::token_invalid("subject is not a user id"))
    }
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Public view of a user. Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_chirpy_red: user.is_upgraded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Chirps --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChirpResponse {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            body: chirp.body,
            author_id: chirp.author_id,
        }
    }
}

// -- Billing webhook --

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_never_carries_hash() {
        let user = User {
            id: 7,
            email: "a@b.c".into(),
            password_hash: "$argon2id$secret".into(),
            is_upgraded: true,
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"is_chirpy_red\":true"));
    }

    #[test]
    fn claims_subject_must_be_numeric() {
        let mut claims = Claims {
            iss: "access".into(),
            sub: "42".into(),
            iat: 0,
            exp: 1,
        };
        assert_eq!(claims.user_id().unwrap(), 42);

        claims.sub = "not-a-number".into();
        assert!(matches!(claims.user_id(), Err(Error::TokenInvalid(_))));
    }
}
