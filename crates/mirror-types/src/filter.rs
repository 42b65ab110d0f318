//! Sticker filter parsing for `GET /api/wall/stickers/filter`.

use crate::models::StickerType;

/// Query value meaning "don't filter on this field".
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// `category=support` selects on the sticker *type*, not the category column.
    Type(StickerType),
    Category(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityFilter {
    All,
    Exactly(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerFilter {
    pub category: CategoryFilter,
    pub intensity: IntensityFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("intensity must be \"all\" or an integer, got {0:?}")]
    BadIntensity(String),
}

impl StickerFilter {
    pub fn all() -> Self {
        Self {
            category: CategoryFilter::All,
            intensity: IntensityFilter::All,
        }
    }

    pub fn parse(category: &str, intensity: &str) -> Result<Self, FilterError> {
        let category = match category.trim() {
            "" | FILTER_ALL => CategoryFilter::All,
            "support" => CategoryFilter::Type(StickerType::Support),
            other => CategoryFilter::Category(other.to_string()),
        };

        let intensity = match intensity.trim() {
            "" | FILTER_ALL => IntensityFilter::All,
            other => other
                .parse::<i64>()
                .map(IntensityFilter::Exactly)
                .map_err(|_| FilterError::BadIntensity(other.to_string()))?,
        };

        Ok(Self {
            category,
            intensity,
        })
    }
}
