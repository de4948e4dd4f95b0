use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};

use chirpy_types::api::WebhookEvent;

use crate::auth::AppState;
use crate::error::blocking;
use crate::middleware::auth_credential;

const UPGRADE_EVENT: &str = "user.upgraded";

/// Billing provider webhook. Authenticated by `Authorization: ApiKey <key>`.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<WebhookEvent>,
) -> Result<StatusCode, StatusCode> {
    if auth_credential(&headers, "ApiKey") != Some(state.polka_key.as_str()) {
        warn!("Webhook call with a bad API key");
        return Err(StatusCode::UNAUTHORIZED);
    }

    if event.event != UPGRADE_EVENT {
        info!("Ignoring webhook event {:?}", event.event);
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = event.data.user_id;
    blocking(move || state.db.upgrade_user(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
