use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) => {
                json!({ "success": false, "message": msg })
            }
            ApiError::Storage(e) => {
                error!("Storage error: {:#}", e);
                json!({
                    "success": false,
                    "message": "Internal server error",
                    "detail": format!("{:#}", e),
                })
            }
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                json!({
                    "success": false,
                    "message": "Internal server error",
                    "detail": detail,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
