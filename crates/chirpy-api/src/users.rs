use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use chirpy_types::api::{Claims, UserRequest, UserResponse};

use crate::auth::AppState;
use crate::error::{blocking, status};

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = blocking(move || state.db.create_user(&req.email, &req.password)).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    let user = blocking(move || state.db.get_user(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the caller's own email and password.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UserRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let id = claims.user_id().map_err(status)?;
    let user = blocking(move || state.db.update_user(id, &req.email, &req.password)).await?;
    Ok(Json(UserResponse::from(user)))
}
