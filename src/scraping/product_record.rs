use serde::Serialize;

pub const UNKNOWN: &str = "Unknown";
pub const INVALID_RATING: &str = "Invalid";
pub const PRICE_UNAVAILABLE: &str = "Unavailable";
pub const NO_COLORS: &str = "0";

/// One product card as scraped, every field already resolved to a value or
/// to its fallback sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductRecord {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub colors: String,
    pub size: String,
    pub gender: String,
    pub timestamp: String,
}

impl ProductRecord {
    pub fn has_sentinel(&self) -> bool {
        self.title == UNKNOWN || self.rating == INVALID_RATING || self.price == PRICE_UNAVAILABLE
    }

    pub fn has_empty_field(&self) -> bool {
        [
            &self.title,
            &self.price,
            &self.rating,
            &self.colors,
            &self.size,
            &self.gender,
            &self.timestamp,
        ]
        .iter()
        .any(|value| value.is_empty())
    }
}
