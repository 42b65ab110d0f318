use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ReactionType;

// -- Envelope --

/// Every endpoint answers with this shape. `success=false` with a message is
/// how conflicts (already liked, already reacted, ...) are reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
        }
    }

    /// A handled refusal (already liked, already exists, ...), not an error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            count: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            success: true,
            message: None,
            data: Some(items),
            count: Some(count),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
        }
    }
}

// -- Notes --

#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub content: String,
    pub author_name: Option<String>,
    pub author_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikedStatus {
    pub liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLikes {
    pub liked_notes: Vec<i64>,
}

// -- Stickers --

#[derive(Debug, Default, Deserialize)]
pub struct CreateStickerRequest {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type")]
    pub sticker_type: Option<String>,
    pub category: Option<String>,
    pub body_part: Option<String>,
    pub intensity: Option<i64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePositionRequest {
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StickerFilterQuery {
    pub category: Option<String>,
    pub intensity: Option<String>,
}

// -- Connections --

#[derive(Debug, Deserialize)]
pub struct ConnectionRequest {
    pub sticker1_id: i64,
    pub sticker2_id: i64,
}

// -- Reactions --

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub reaction_type: String,
}

/// Sticker id -> reaction types the caller has applied to it.
pub type UserReactions = BTreeMap<i64, Vec<ReactionType>>;

// -- Service --

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}
