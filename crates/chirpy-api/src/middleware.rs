use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use chirpy_types::api::TokenKind;

use crate::auth::AppState;

/// Credential from `Authorization: <scheme> <credential>`.
pub fn auth_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let credential = value.strip_prefix(scheme)?.strip_prefix(' ')?.trim();
    (!credential.is_empty()).then_some(credential)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    auth_credential(headers, "Bearer")
}

/// Validate the access token from the Authorization header and attach its
/// claims to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    // Access tokens are stateless: no revocation lookup here.
    let claims = state.tokens.validate(token, TokenKind::Access).map_err(|e| {
        warn!("Rejected access token: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
