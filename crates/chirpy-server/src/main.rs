mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use chirpy_api::auth::{AppState, AppStateInner};
use chirpy_api::metrics::{self, Metrics};
use chirpy_api::routes;
use chirpy_auth::{Argon2Hasher, HmacCodec, SystemClock, TokenIssuer};
use chirpy_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let hasher = match config.hash_cost {
        Some(cost) => Argon2Hasher::new(cost)?,
        None => Argon2Hasher::default(),
    };
    let clock = Arc::new(SystemClock);

    // The service cannot run without its store; any failure here aborts startup.
    let db = Database::open(&config.db_path, Arc::new(hasher), clock.clone())?;

    let tokens = TokenIssuer::new(Arc::new(HmacCodec::new(&config.jwt_secret)), clock)
        .with_access_ttl(chrono::Duration::seconds(config.access_ttl_secs))
        .with_refresh_ttl(chrono::Duration::seconds(config.refresh_ttl_secs));

    let state: AppState = Arc::new(AppStateInner {
        db,
        tokens,
        polka_key: config.polka_key.clone(),
        metrics: Metrics::default(),
    });

    let app_routes = Router::new()
        .nest_service("/app", ServeDir::new(&config.static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), metrics::count_hits));

    let app = Router::new()
        .merge(routes::router(state))
        .merge(app_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Chirpy server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
