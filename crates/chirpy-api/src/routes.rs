use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{chirps, metrics, upgrades, users};

async fn healthz() -> &'static str {
    "OK"
}

/// `/api` and `/admin` routes. Static files, CORS and tracing are layered on
/// by the server.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/healthz", get(healthz))
        .route("/api/users", post(users::create_user))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        .route("/api/chirps", get(chirps::list_chirps))
        .route("/api/chirps/{id}", get(chirps::get_chirp))
        .route("/api/polka/webhooks", post(upgrades::polka_webhook))
        .route("/admin/metrics", get(metrics::hits_page))
        .route("/admin/reset", post(metrics::reset))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/users", put(users::update_user))
        .route("/api/chirps", post(chirps::create_chirp))
        .route("/api/chirps/{id}", delete(chirps::delete_chirp))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
