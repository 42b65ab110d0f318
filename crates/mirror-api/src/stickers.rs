use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use mirror_db::NewSticker;
use mirror_types::api::{
    ApiResponse, CreateStickerRequest, CreatedId, StickerFilterQuery, UpdatePositionRequest,
};
use mirror_types::filter::{FILTER_ALL, StickerFilter};
use mirror_types::models::{MAX_STICKER_TEXT_CHARS, StickerType, clamp_intensity};

use crate::error::ApiError;
use crate::extract::{IdPath, ValidJson};
use crate::state::{AppState, run_db};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_INTENSITY: i64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSticker {
    pub text: String,
    pub sticker_type: StickerType,
    pub category: String,
    pub body_part: Option<String>,
    pub intensity: i64,
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: f64,
}

impl NormalizedSticker {
    fn as_new(&self) -> NewSticker<'_> {
        NewSticker {
            text: &self.text,
            sticker_type: self.sticker_type,
            category: &self.category,
            body_part: self.body_part.as_deref(),
            intensity: self.intensity,
            position_x: self.position_x,
            position_y: self.position_y,
            rotation: self.rotation,
        }
    }
}

/// Validate text, fall back to `anxiety` for an unknown type, clamp intensity.
pub fn normalize_sticker(req: CreateStickerRequest) -> Result<NormalizedSticker, ApiError> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err(ApiError::Validation("Text is required".into()));
    }
    if text.chars().count() > MAX_STICKER_TEXT_CHARS {
        return Err(ApiError::Validation(format!(
            "Text too long (max {MAX_STICKER_TEXT_CHARS} characters)"
        )));
    }

    let sticker_type = req
        .sticker_type
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or(StickerType::Anxiety);

    let category = req
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    let body_part = req
        .body_part
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());

    Ok(NormalizedSticker {
        text,
        sticker_type,
        category,
        body_part,
        intensity: clamp_intensity(req.intensity.unwrap_or(DEFAULT_INTENSITY)),
        position_x: req.position_x.unwrap_or(0.0),
        position_y: req.position_y.unwrap_or(0.0),
        rotation: req.rotation.unwrap_or(0.0),
    })
}

pub async fn list_stickers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stickers = run_db(&state, |db| db.list_stickers()).await?;
    Ok(Json(ApiResponse::list(stickers)))
}

pub async fn get_sticker(
    State(state): State<AppState>,
    IdPath(sticker_id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let sticker = run_db(&state, move |db| db.get_sticker(sticker_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Sticker not found".into()))?;
    Ok(Json(ApiResponse::data(sticker)))
}

pub async fn create_sticker(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateStickerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sticker = normalize_sticker(req)?;
    let id = run_db(&state, move |db| db.create_sticker(&sticker.as_new())).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(CreatedId { id }).with_message("Sticker created successfully")),
    ))
}

pub async fn update_position(
    State(state): State<AppState>,
    IdPath(sticker_id): IdPath,
    ValidJson(req): ValidJson<UpdatePositionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = run_db(&state, move |db| {
        db.update_sticker_position(sticker_id, req.position_x, req.position_y, req.rotation)
    })
    .await?;

    if !updated {
        return Err(ApiError::NotFound("Sticker not found".into()));
    }
    Ok(Json(ApiResponse::ok("Position updated successfully")))
}

pub async fn delete_sticker(
    State(state): State<AppState>,
    IdPath(sticker_id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = run_db(&state, move |db| db.delete_sticker(sticker_id)).await?;

    if !deleted {
        return Err(ApiError::NotFound("Sticker not found".into()));
    }
    Ok(Json(ApiResponse::ok("Sticker deleted successfully")))
}

/// GET /api/wall/stickers/filter?category=&intensity=; both default to "all".
pub async fn filter_stickers(
    State(state): State<AppState>,
    Query(query): Query<StickerFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = StickerFilter::parse(
        query.category.as_deref().unwrap_or(FILTER_ALL),
        query.intensity.as_deref().unwrap_or(FILTER_ALL),
    )
    .map_err(|e| ApiError::Validation(e.to_string()))?;

    let stickers = run_db(&state, move |db| db.filter_stickers(&filter)).await?;
    Ok(Json(ApiResponse::list(stickers)))
}
