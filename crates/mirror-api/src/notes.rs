use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use mirror_db::{LikeOutcome, UnlikeOutcome};
use mirror_types::api::{ApiResponse, CreateNoteRequest, CreatedId, LikedStatus, UserLikes};
use mirror_types::models::{ANONYMOUS_NAME, AuthorType, MAX_NOTE_CONTENT_CHARS};

use crate::error::ApiError;
use crate::extract::{ClientIp, IdPath, ValidJson};
use crate::state::{AppState, run_db};

/// A note ready to persist, after trimming and author normalization.
#[derive(Debug, PartialEq, Eq)]
pub struct NormalizedNote {
    pub content: String,
    pub author_name: String,
    pub author_type: AuthorType,
}

/// Anonymous notes always carry the "Anonymous" name. A signature with no
/// usable name is downgraded to anonymous.
pub fn normalize_note(req: CreateNoteRequest) -> Result<NormalizedNote, ApiError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".into()));
    }
    if content.chars().count() > MAX_NOTE_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Content too long (max {MAX_NOTE_CONTENT_CHARS} characters)"
        )));
    }

    let author_type = req
        .author_type
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or(AuthorType::Anonymous);
    let author_name = req
        .author_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    let (author_name, author_type) = match author_type {
        AuthorType::Signature if !author_name.is_empty() && author_name != ANONYMOUS_NAME => {
            (author_name.to_string(), AuthorType::Signature)
        }
        _ => (ANONYMOUS_NAME.to_string(), AuthorType::Anonymous),
    };

    Ok(NormalizedNote {
        content,
        author_name,
        author_type,
    })
}

pub async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let notes = run_db(&state, |db| db.list_notes()).await?;
    Ok(Json(ApiResponse::list(notes)))
}

pub async fn get_note(
    State(state): State<AppState>,
    IdPath(note_id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let note = run_db(&state, move |db| db.get_note(note_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".into()))?;
    Ok(Json(ApiResponse::data(note)))
}

pub async fn create_note(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = normalize_note(req)?;

    let id = run_db(&state, move |db| {
        db.create_note(&note.content, &note.author_name, note.author_type)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(CreatedId { id }).with_message("Note created successfully")),
    ))
}

pub async fn like_note(
    State(state): State<AppState>,
    IdPath(note_id): IdPath,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse, ApiError> {
    let user_ip = ip.clone();
    let outcome = run_db(&state, move |db| db.like_note(note_id, &user_ip)).await?;

    match outcome {
        LikeOutcome::Liked => {
            info!("Note {} liked by {}", note_id, ip);
            Ok(Json(ApiResponse::ok("Liked successfully")))
        }
        LikeOutcome::AlreadyLiked => Ok(Json(ApiResponse::failed("Already liked"))),
        LikeOutcome::NoteNotFound => Err(ApiError::NotFound("Note not found".into())),
    }
}

pub async fn unlike_note(
    State(state): State<AppState>,
    IdPath(note_id): IdPath,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_db(&state, move |db| db.unlike_note(note_id, &ip)).await?;

    Ok(Json(match outcome {
        UnlikeOutcome::Unliked => ApiResponse::ok("Unliked successfully"),
        UnlikeOutcome::NotLiked => ApiResponse::failed("No like found to remove"),
    }))
}

pub async fn check_note_liked(
    State(state): State<AppState>,
    IdPath(note_id): IdPath,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse, ApiError> {
    let liked = run_db(&state, move |db| db.is_note_liked(note_id, &ip)).await?;
    Ok(Json(ApiResponse::data(LikedStatus { liked })))
}

pub async fn get_user_likes(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
) -> Result<impl IntoResponse, ApiError> {
    let likes = run_db(&state, move |db| db.list_user_likes(&ip)).await?;
    let liked_notes = likes.into_iter().map(|like| like.note_id).collect();
    Ok(Json(ApiResponse::data(UserLikes { liked_notes })))
}
