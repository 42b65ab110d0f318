use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use mirror_db::{ConnectOutcome, DisconnectOutcome};
use mirror_types::api::{ApiResponse, ConnectionRequest, CreatedId};

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::{AppState, run_db};

pub async fn list_connections(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let connections = run_db(&state, |db| db.list_connections()).await?;
    Ok(Json(ApiResponse::list(connections)))
}

pub async fn create_connection(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ConnectionRequest {
        sticker1_id,
        sticker2_id,
    } = req;
    if sticker1_id == sticker2_id {
        return Err(ApiError::Validation("Cannot connect a sticker to itself".into()));
    }

    let outcome = run_db(&state, move |db| db.create_connection(sticker1_id, sticker2_id)).await?;

    match outcome {
        ConnectOutcome::Created(id) => Ok((
            StatusCode::CREATED,
            Json(
                ApiResponse::data(CreatedId { id })
                    .with_message("Connection created successfully"),
            ),
        )),
        ConnectOutcome::AlreadyExists => Ok((
            StatusCode::OK,
            Json(ApiResponse::failed("Connection already exists")),
        )),
        ConnectOutcome::SelfLoop => {
            warn!("Self-loop connection on sticker {} reached storage", sticker1_id);
            Err(ApiError::Validation("Cannot connect a sticker to itself".into()))
        }
        ConnectOutcome::StickerNotFound(id) => {
            Err(ApiError::NotFound(format!("Sticker {id} not found")))
        }
    }
}

pub async fn delete_connection(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_db(&state, move |db| {
        db.delete_connection(req.sticker1_id, req.sticker2_id)
    })
    .await?;

    Ok(Json(match outcome {
        DisconnectOutcome::Removed => ApiResponse::ok("Connection deleted successfully"),
        DisconnectOutcome::NotConnected => ApiResponse::failed("Connection not found"),
    }))
}
