use tracing::{info, warn};

use chirpy_auth::TokenIssuer;
use chirpy_db::Database;
use chirpy_types::api::TokenKind;
use chirpy_types::models::User;
use chirpy_types::{Error, Result};

/// Outcome of a successful login.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Check credentials and mint an access/refresh pair.
pub fn login(
    db: &Database,
    tokens: &TokenIssuer,
    email: &str,
    password: &str,
    expires_in_secs: Option<i64>,
) -> Result<Session> {
    let user = db.auth_user(email, password)?;
    let access_token = tokens.issue_access(user.id, expires_in_secs)?;
    let refresh_token = tokens.issue_refresh(user.id)?;

    info!("User {} logged in", user.id);
    Ok(Session {
        user,
        access_token,
        refresh_token,
    })
}

/// Accept a refresh token: revocation first, then signature, kind and
/// expiry.
fn accept_refresh(db: &Database, tokens: &TokenIssuer, refresh_token: &str) -> Result<u64> {
    if db.is_token_revoked(refresh_token)? {
        warn!("Rejected revoked refresh token");
        return Err(Error::TokenRevoked);
    }
    tokens.validate(refresh_token, TokenKind::Refresh)?.user_id()
}

/// Exchange a live refresh token for a new access token.
pub fn refresh(db: &Database, tokens: &TokenIssuer, refresh_token: &str) -> Result<String> {
    let user_id = accept_refresh(db, tokens, refresh_token)?;
    tokens.issue_access(user_id, None)
}

/// Revoke a live refresh token. Access tokens cannot be revoked; they
/// simply expire.
pub fn revoke(db: &Database, tokens: &TokenIssuer, refresh_token: &str) -> Result<()> {
    let user_id = accept_refresh(db, tokens, refresh_token)?;
    db.revoke_token(refresh_token)?;
    info!("User {} revoked a refresh token", user_id);
    Ok(())
}
