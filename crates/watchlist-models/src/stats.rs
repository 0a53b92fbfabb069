use serde::{Deserialize, Serialize};

use crate::item::{ListItem, MediaType, WatchStatus};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    pub total: usize,
    pub watched: usize,
    pub to_watch: usize,
    pub favorites: usize,
    pub movies_count: usize,
    pub tv_count: usize,
}

impl ListStats {
    pub fn from_items(items: &[ListItem]) -> Self {
        items.iter().fold(Self::default(), |mut stats, item| {
            stats.total += 1;
            match item.status {
                WatchStatus::Watched => stats.watched += 1,
                WatchStatus::ToWatch => stats.to_watch += 1,
            }
            if item.favorite {
                stats.favorites += 1;
            }
            match item.media_type {
                MediaType::Movie => stats.movies_count += 1,
                MediaType::Tv => stats.tv_count += 1,
            }
            stats
        })
    }
}
