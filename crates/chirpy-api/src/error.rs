use axum::http::StatusCode;
use tracing::error;

use chirpy_types::Error;

/// Status code the transport reports for each error kind.
pub fn status(err: Error) -> StatusCode {
    match err {
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::InvalidCredentials | Error::TokenInvalid(_) | Error::TokenRevoked => {
            StatusCode::UNAUTHORIZED
        }
        Error::Forbidden => StatusCode::FORBIDDEN,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        e @ (Error::Io(_) | Error::Serialization(_) | Error::Signing(_) | Error::Hashing(_)) => {
            error!("Internal error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Run blocking store work off the async runtime and map its error.
pub async fn blocking<T, F>(f: F) -> Result<T, StatusCode>
where
    F: FnOnce() -> chirpy_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(status)
}
