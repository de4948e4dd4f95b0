use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};

use chirpy_auth::TokenIssuer;
use chirpy_db::Database;
use chirpy_types::api::{LoginRequest, LoginResponse, TokenResponse};

use crate::error::blocking;
use crate::metrics::Metrics;
use crate::middleware::bearer_token;
use crate::sessions;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenIssuer,
    /// Key the billing provider presents on webhook calls.
    pub polka_key: String,
    pub metrics: Metrics,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let session = blocking(move || {
        sessions::login(
            &state.db,
            &state.tokens,
            &req.email,
            &req.password,
            req.expires_in_seconds,
        )
    })
    .await?;

    Ok(Json(LoginResponse {
        user: session.user.into(),
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// POST /api/refresh with `Authorization: Bearer <refresh token>`.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let token = bearer_token(&headers)
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    let access = blocking(move || sessions::refresh(&state.db, &state.tokens, &token)).await?;
    Ok(Json(TokenResponse { token: access }))
}

/// POST /api/revoke with `Authorization: Bearer <refresh token>`.
pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let token = bearer_token(&headers)
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    blocking(move || sessions::revoke(&state.db, &state.tokens, &token)).await?;
    Ok(StatusCode::NO_CONTENT)
}
