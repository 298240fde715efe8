use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lobby_db::{ErrorKind, StoreError};
use lobby_types::api::ErrorBody;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            ApiError::Store(e) => match e.kind() {
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, e.reason()),
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, e.reason()),
                ErrorKind::Internal => {
                    error!("Store error: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.reason())
                }
            },
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Query(rejection) => (rejection.status(), "invalid query parameters"),
            ApiError::Path(rejection) => (rejection.status(), "invalid path parameter"),
            ApiError::Join(e) => {
                error!("spawn_blocking join error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };

        let body = ErrorBody {
            error: reason.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
