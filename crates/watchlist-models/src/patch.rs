use serde::{Deserialize, Serialize};

use crate::item::WatchStatus;

/// Partial update of a list entry.
///
/// Only the user-mutable fields can be expressed; `id` and `addedAt` are
/// immutable once an entry exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WatchStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    // older web clients sent the backend spelling in updates
    #[serde(default, alias = "personal_rating", skip_serializing_if = "Option::is_none")]
    pub personal_rating: Option<u8>,
}

impl ItemPatch {
    pub fn status(status: WatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            ..Self::default()
        }
    }

    pub fn rating(rating: u8) -> Self {
        Self {
            personal_rating: Some(rating),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.favorite.is_none() && self.personal_rating.is_none()
    }
}
