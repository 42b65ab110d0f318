use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name forced onto every anonymous note.
pub const ANONYMOUS_NAME: &str = "Anonymous";

pub const MAX_NOTE_CONTENT_CHARS: usize = 1000;
pub const MAX_STICKER_TEXT_CHARS: usize = 500;

pub const MIN_INTENSITY: i64 = 1;
pub const MAX_INTENSITY: i64 = 5;

/// Returned when a stored or submitted enum value is not one we know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    #[default]
    Anonymous,
    Signature,
}

string_enum!(AuthorType, "author type", {
    Anonymous => "anonymous",
    Signature => "signature",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerType {
    #[default]
    Anxiety,
    Support,
}

string_enum!(StickerType, "sticker type", {
    Anxiety => "anxiety",
    Support => "support",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Same,
    Great,
}

string_enum!(ReactionType, "reaction type", {
    Same => "same",
    Great => "great",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub author_name: String,
    pub author_type: AuthorType,
    pub like_count: i64,
    pub helped_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One caller's like on one note. The existence of this row is what
/// `like_count` and `helped_count` on [`Note`] are derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub user_ip: String,
    pub note_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Stickers carry `same_count`/`great_count` columns, but those are never
/// moved by reactions. Live counts come from [`ReactionCounts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sticker {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub sticker_type: StickerType,
    pub category: String,
    pub body_part: Option<String>,
    pub intensity: i64,
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: f64,
    pub same_count: i64,
    pub great_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub id: i64,
    pub sticker_id: i64,
    pub reaction_type: ReactionType,
    pub user_ip: String,
    pub created_at: DateTime<Utc>,
}

/// An unordered pair of stickers, stored in the order the caller gave it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: i64,
    pub sticker1_id: i64,
    pub sticker2_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub same: i64,
    pub great: i64,
}

impl ReactionCounts {
    pub fn add(&mut self, reaction_type: ReactionType, n: i64) {
        match reaction_type {
            ReactionType::Same => self.same += n,
            ReactionType::Great => self.great += n,
        }
    }
}

/// Clamp a submitted intensity into the 1..=5 scale.
pub fn clamp_intensity(value: i64) -> i64 {
    value.clamp(MIN_INTENSITY, MAX_INTENSITY)
}
