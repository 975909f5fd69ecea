use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub const UPSTREAM_FAILURE: &str = "Failed to fetch data from API";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("API responded with status: {0}")]
    UpstreamStatus(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned invalid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "proxy error");

        let body = json!({
            "error": UPSTREAM_FAILURE,
            "message": self.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

pub type ProxyResult<T> = Result<T, ProxyError>;
