use axum::{Json, response::IntoResponse};
use serde_json::json;

use mirror_types::api::ServiceInfo;

use crate::error::ApiError;

pub async fn root() -> impl IntoResponse {
    Json(ServiceInfo {
        message: "Mirror Notes API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "success": true, "status": "ok" }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".into())
}
