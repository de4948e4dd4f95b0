use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use chirpy_db::SortOrder;
use chirpy_types::Error;
use chirpy_types::api::{ChirpRequest, ChirpResponse, Claims};

use crate::auth::AppState;
use crate::error::{blocking, status};
use crate::filter::censor;

/// `?author_id=<id>&sort=asc|desc`. Parsed leniently: a non-numeric author
/// means no filter, and any sort other than `asc` lists newest first.
#[derive(Debug, Default, Deserialize)]
pub struct ChirpQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

impl ChirpQuery {
    pub fn author(&self) -> Option<u64> {
        self.author_id.as_deref().and_then(|a| a.trim().parse().ok())
    }

    pub fn order(&self) -> SortOrder {
        match self.sort.as_deref() {
            None | Some("") => SortOrder::Asc,
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            Some(_) => SortOrder::Desc,
        }
    }
}

pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ChirpRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let author_id = claims.user_id().map_err(status)?;
    let body = censor(&req.body);

    let chirp = blocking(move || state.db.create_chirp(&body, author_id)).await?;
    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ChirpQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let (author, order) = (query.author(), query.order());
    let chirps = blocking(move || state.db.list_chirps(author, order)).await?;
    Ok(Json(chirps.into_iter().map(ChirpResponse::from).collect::<Vec<_>>()))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    let chirp = blocking(move || state.db.get_chirp(id)).await?;
    Ok(Json(ChirpResponse::from(chirp)))
}

/// Only the author may delete a chirp.
pub async fn delete_chirp(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let requester = claims.user_id().map_err(status)?;

    blocking(move || {
        let chirp = state.db.get_chirp(id)?;
        if chirp.author_id != requester {
            return Err(Error::Forbidden);
        }
        state.db.delete_chirp(id)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
