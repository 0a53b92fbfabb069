use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::ItemId;
use crate::normalize::normalize_item;
use crate::patch::ItemPatch;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

/// Where an entry sits in the user's list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum WatchStatus {
    #[default]
    ToWatch,
    Watched,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::ToWatch => "toWatch",
            WatchStatus::Watched => "watched",
        }
    }
}

/// One tracked movie or series.
///
/// Serializes in the app (camelCase) shape. Use [`ListItem::from_wire`] for
/// anything coming off a backend, since those may answer in the snake_case
/// backend shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// TMDB vote average, informational only
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: WatchStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorite: bool,
    #[serde(default)]
    pub personal_rating: Option<u8>,
    /// ISO timestamp set once at creation
    pub added_at: String,
}

impl ListItem {
    /// Parse an item from either wire shape.
    pub fn from_wire(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(normalize_item(value))
    }

    /// Parse a whole list from either wire shape. A `null` body is an empty list.
    pub fn list_from_wire(value: serde_json::Value) -> Result<Vec<Self>, serde_json::Error> {
        match value {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::Array(values) => values.into_iter().map(Self::from_wire).collect(),
            other => Err(serde::de::Error::custom(format!(
                "expected an array of items, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Release year taken from the leading `YYYY` of the release date
    pub fn year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    pub fn added_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.added_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn is_watched(&self) -> bool {
        self.status == WatchStatus::Watched
    }

    /// Merge a partial update onto this item. `id` and `added_at` are never touched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
        if let Some(rating) = patch.personal_rating {
            self.personal_rating = Some(rating);
        }
    }
}

/// Input for creating an entry: a [`ListItem`] whose identity and stamps
/// may still be missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewListItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WatchStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

impl NewListItem {
    /// Fill in identity, timestamp and defaults.
    ///
    /// A caller-supplied id or `addedAt` is kept so an item stamped once keeps
    /// the same identity wherever it ends up persisted.
    pub fn stamp(self, fallback_id: impl FnOnce() -> ItemId, now: DateTime<Utc>) -> ListItem {
        ListItem {
            id: self.id.unwrap_or_else(fallback_id),
            title: self.title,
            overview: self.overview,
            poster: self.poster,
            release_date: self.release_date,
            rating: self.rating,
            media_type: self.media_type,
            status: self.status.unwrap_or_default(),
            favorite: self.favorite.unwrap_or(false),
            personal_rating: self.personal_rating,
            added_at: self.added_at.unwrap_or_else(|| iso_timestamp(now)),
        }
    }
}

impl From<ListItem> for NewListItem {
    fn from(item: ListItem) -> Self {
        Self {
            id: Some(item.id),
            title: item.title,
            overview: item.overview,
            poster: item.poster,
            release_date: item.release_date,
            rating: item.rating,
            media_type: item.media_type,
            status: Some(item.status),
            favorite: Some(item.favorite),
            personal_rating: item.personal_rating,
            added_at: Some(item.added_at),
        }
    }
}

/// `2024-05-01T12:30:00.000Z`, the same layout JavaScript's `toISOString` produces
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn release_year(release_date: Option<&str>) -> Option<i32> {
    let date = release_date?.trim();
    date.get(..4)?.parse::<i32>().ok()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn new_item() -> NewListItem {
        NewListItem {
            id: None,
            title: "Arrival".to_string(),
            overview: Some("Linguist meets heptapods".to_string()),
            poster: None,
            release_date: Some("2016-11-10".to_string()),
            rating: Some(7.6),
            media_type: MediaType::Movie,
            status: None,
            favorite: None,
            personal_rating: None,
            added_at: None,
        }
    }

    #[test]
    fn test_stamp_applies_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let item = new_item().stamp(|| ItemId(42), now);

        assert_eq!(item.id, ItemId(42));
        assert_eq!(item.status, WatchStatus::ToWatch);
        assert!(!item.favorite);
        assert_eq!(item.personal_rating, None);
        assert_eq!(item.added_at, "2024-05-01T12:30:00.000Z");
    }

    #[test]
    fn test_stamp_keeps_supplied_identity() {
        let mut input = new_item();
        input.id = Some(ItemId(329865));
        input.added_at = Some("2020-01-01T00:00:00.000Z".to_string());

        let item = input.stamp(|| ItemId(1), Utc::now());
        assert_eq!(item.id, ItemId(329865));
        assert_eq!(item.added_at, "2020-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_wire_defaults_for_missing_and_null_fields() {
        let item = ListItem::from_wire(json!({
            "id": "7",
            "title": "Dark",
            "type": "tv",
            "status": null,
            "favorite": null,
            "addedAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.status, WatchStatus::ToWatch);
        assert!(!item.favorite);
        assert_eq!(item.media_type, MediaType::Tv);
    }

    #[test]
    fn test_serializes_app_shape() {
        let item = new_item().stamp(|| ItemId(1), Utc::now());
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "movie");
        assert_eq!(value["status"], "toWatch");
        assert_eq!(value["releaseDate"], "2016-11-10");
        assert!(value.get("personalRating").is_some());
        assert!(value.get("release_date").is_none());
    }

    #[test]
    fn test_year_derivation() {
        let mut item = new_item().stamp(|| ItemId(1), Utc::now());
        assert_eq!(item.year(), Some(2016));
        item.release_date = Some(String::new());
        assert_eq!(item.year(), None);
        item.release_date = None;
        assert_eq!(item.year(), None);
    }

    #[test]
    fn test_apply_patch_leaves_identity() {
        let mut item = new_item().stamp(|| ItemId(9), Utc::now());
        let added_at = item.added_at.clone();
        item.apply(&ItemPatch::status(WatchStatus::Watched));
        item.apply(&ItemPatch::rating(4));

        assert!(item.is_watched());
        assert_eq!(item.personal_rating, Some(4));
        assert_eq!(item.id, ItemId(9));
        assert_eq!(item.added_at, added_at);
    }

    #[test]
    fn test_list_from_wire_null_is_empty() {
        assert!(ListItem::list_from_wire(serde_json::Value::Null).unwrap().is_empty());
        assert!(ListItem::list_from_wire(json!({"error": "x"})).is_err());
    }
}
