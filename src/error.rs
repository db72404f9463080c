use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error("Provide 'url' or 'html'")]
    MissingInput,

    #[error("Fetch failed: {status}")]
    FetchFailed { status: u16 },

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("No orders found")]
    NoOrders,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", self.to_string()),
            Self::MissingInput => (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string()),
            Self::FetchFailed { .. } => (StatusCode::BAD_REQUEST, "FetchFailed", self.to_string()),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UpstreamError", self.to_string()),
            Self::NoOrders => (StatusCode::NOT_FOUND, "NoOrders", self.to_string()),
            Self::Io(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
