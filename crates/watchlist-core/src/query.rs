use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use watchlist_models::{ListItem, MediaType, WatchStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Most recently added first
    #[default]
    AddedAt,
    /// Alphabetical, ignoring case
    Title,
    /// Newest release first, unknown years last
    Year,
    /// Highest personal rating first, unrated last
    Rating,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::AddedAt => "added",
            SortKey::Title => "title",
            SortKey::Year => "year",
            SortKey::Rating => "rating",
        }
    }

    fn compare(&self, a: &ListItem, b: &ListItem) -> Ordering {
        match self {
            SortKey::AddedAt => (b.added_at_time(), &b.added_at).cmp(&(a.added_at_time(), &a.added_at)),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Year => b.year().unwrap_or(0).cmp(&a.year().unwrap_or(0)),
            SortKey::Rating => b.personal_rating.unwrap_or(0).cmp(&a.personal_rating.unwrap_or(0)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" | "added_at" | "addedat" | "recent" => Ok(SortKey::AddedAt),
            "title" => Ok(SortKey::Title),
            "year" => Ok(SortKey::Year),
            "rating" => Ok(SortKey::Rating),
            other => Err(format!("unknown sort key '{}' (expected added, title, year or rating)", other)),
        }
    }
}

/// Filter and ordering for a view of the list. All filters are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: Option<WatchStatus>,
    /// Case-insensitive substring of the title
    pub text: Option<String>,
    pub media_type: Option<MediaType>,
    pub sort: SortKey,
}

impl ListQuery {
    pub fn matches(&self, item: &ListItem) -> bool {
        if self.status.is_some_and(|status| item.status != status) {
            return false;
        }
        if self.media_type.is_some_and(|media_type| item.media_type != media_type) {
            return false;
        }
        match self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => item.title.to_lowercase().contains(&text.to_lowercase()),
            None => true,
        }
    }

    pub fn apply(&self, items: &[ListItem]) -> Vec<ListItem> {
        let mut result: Vec<ListItem> = items.iter().filter(|item| self.matches(item)).cloned().collect();
        // sort_by is stable: ties keep list order
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_item;

    fn items() -> Vec<ListItem> {
        let mut alien = sample_item(1, "Alien", MediaType::Movie);
        alien.release_date = Some("1979-05-25".to_string());
        alien.personal_rating = Some(5);
        alien.added_at = "2024-01-01T00:00:00.000Z".to_string();

        let mut dark = sample_item(2, "dark", MediaType::Tv);
        dark.release_date = Some("2017-12-01".to_string());
        dark.status = WatchStatus::Watched;
        dark.added_at = "2024-03-01T00:00:00.000Z".to_string();

        let mut heat = sample_item(3, "Heat", MediaType::Movie);
        heat.personal_rating = Some(3);
        heat.added_at = "2024-02-01T00:00:00.000Z".to_string();

        vec![alien, dark, heat]
    }

    fn ids(items: &[ListItem]) -> Vec<i64> {
        items.iter().map(|i| i.id.get()).collect()
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        assert_eq!(ids(&ListQuery::default().apply(&items())), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_keys() {
        let all = items();
        let by = |sort| ListQuery { sort, ..ListQuery::default() }.apply(&all);

        assert_eq!(ids(&by(SortKey::Title)), vec![1, 2, 3]);
        // Heat has no release date and sorts as year 0
        assert_eq!(ids(&by(SortKey::Year)), vec![2, 1, 3]);
        // dark is unrated
        assert_eq!(ids(&by(SortKey::Rating)), vec![1, 3, 2]);
    }

    #[test]
    fn test_filters_combine() {
        let all = items();
        let query = ListQuery {
            text: Some("A".to_string()),
            media_type: Some(MediaType::Movie),
            ..ListQuery::default()
        };
        assert_eq!(ids(&query.apply(&all)), vec![3, 1]);

        let watched = ListQuery {
            status: Some(WatchStatus::Watched),
            ..ListQuery::default()
        };
        assert_eq!(ids(&watched.apply(&all)), vec![2]);

        let blank = ListQuery {
            text: Some("   ".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(blank.apply(&all).len(), 3);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("Title".parse::<SortKey>().unwrap(), SortKey::Title);
        assert_eq!("added".parse::<SortKey>().unwrap(), SortKey::AddedAt);
        assert!("popularity".parse::<SortKey>().is_err());
    }
}
