use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::item::{release_year, MediaType, NewListItem};

/// A title returned by the metadata search, normalized across movies and series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: ItemId,
    pub title: String,
    pub overview: Option<String>,
    /// Absolute artwork URL, if the title has a poster
    pub poster: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f64>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

impl SearchResult {
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }
}

impl From<SearchResult> for NewListItem {
    fn from(result: SearchResult) -> Self {
        Self {
            id: Some(result.id),
            title: result.title,
            overview: result.overview,
            poster: result.poster,
            release_date: result.release_date,
            rating: result.rating,
            media_type: result.media_type,
            status: None,
            favorite: None,
            personal_rating: None,
            added_at: None,
        }
    }
}
