use axum::{Json, extract::State, response::IntoResponse};
use tracing::info;

use mirror_db::{ReactionOutcome, RemoveReactionOutcome};
use mirror_types::api::{ApiResponse, ReactionRequest};
use mirror_types::models::ReactionType;

use crate::error::ApiError;
use crate::extract::{ClientIp, IdPath, ValidJson};
use crate::state::{AppState, run_db};

fn parse_reaction_type(raw: &str) -> Result<ReactionType, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Validation("reaction_type must be \"same\" or \"great\"".into()))
}

pub async fn add_reaction(
    State(state): State<AppState>,
    IdPath(sticker_id): IdPath,
    ClientIp(ip): ClientIp,
    ValidJson(req): ValidJson<ReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reaction_type = parse_reaction_type(&req.reaction_type)?;

    let user_ip = ip.clone();
    let outcome = run_db(&state, move |db| {
        db.add_reaction(sticker_id, reaction_type, &user_ip)
    })
    .await?;

    match outcome {
        ReactionOutcome::Added => {
            info!("Sticker {} got '{}' from {}", sticker_id, reaction_type, ip);
            Ok(Json(ApiResponse::ok("Reaction added successfully")))
        }
        ReactionOutcome::AlreadyReacted => Ok(Json(ApiResponse::failed("Already reacted"))),
        ReactionOutcome::StickerNotFound => Err(ApiError::NotFound("Sticker not found".into())),
    }
}

pub async fn remove_reaction(
    State(state): State<AppState>,
    IdPath(sticker_id): IdPath,
    ClientIp(ip): ClientIp,
    ValidJson(req): ValidJson<ReactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reaction_type = parse_reaction_type(&req.reaction_type)?;

    let outcome = run_db(&state, move |db| {
        db.remove_reaction(sticker_id, reaction_type, &ip)
    })
    .await?;

    Ok(Json(match outcome {
        RemoveReactionOutcome::Removed => ApiResponse::ok("Reaction removed successfully"),
        RemoveReactionOutcome::NotReacted => ApiResponse::failed("No reaction found to remove"),
    }))
}

/// Live counts aggregated from reaction rows, not the sticker's stored columns.
pub async fn get_reaction_counts(
    State(state): State<AppState>,
    IdPath(sticker_id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let counts = run_db(&state, move |db| {
        if db.get_sticker(sticker_id)?.is_none() {
            return Ok(None);
        }
        db.get_reaction_counts(sticker_id).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("Sticker not found".into()))?;

    Ok(Json(ApiResponse::data(counts)))
}

pub async fn get_user_reactions(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse, ApiError> {
    let reactions = run_db(&state, move |db| db.get_user_reactions(&ip)).await?;
    Ok(Json(ApiResponse::data(reactions)))
}
