use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, Response},
};
use tracing::debug;

use crate::auth::AppState;

/// Request counter for the static app. Owned by the app state.
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
}

impl Metrics {
    /// Count one hit and return the new total.
    pub fn record_hit(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let total = state.metrics.record_hit();
    debug!("Hit logged. Total hits: {}", total);
    next.run(req).await
}

pub async fn hits_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n<body>\n\t<h1>Welcome, Chirpy Admin</h1>\n\t<p>Chirpy has been visited {} times!</p>\n</body>\n</html>\n",
        state.metrics.hits()
    ))
}

pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.metrics.reset();
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_resets() {
        let metrics = Metrics::default();
        assert_eq!(metrics.record_hit(), 1);
        assert_eq!(metrics.record_hit(), 2);
        assert_eq!(metrics.hits(), 2);
        metrics.reset();
        assert_eq!(metrics.hits(), 0);
    }
}
