use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// DataSource failure; holds messages so coalesced waiters can each get a clone
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("query was abandoned before it completed")]
    Abandoned,
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::Database(err.to_string())
    }
}

// Errors a handler can hand back to the client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("upstream query failed: {0}")]
    Upstream(#[from] QueryError),

    #[error("{0} not found")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
