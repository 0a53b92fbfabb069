//! In-memory stores and sample items shared by the unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use watchlist_models::{ItemId, ItemPatch, ListItem, MediaType, NewListItem, WatchStatus};
use watchlist_store::{ListStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outage {
    /// Store unusable; callers should fall back
    Down,
    /// Store answers, but with a server-side failure
    ServerError,
}

/// A store behaving like the remote API: misses are `NotFound`
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<ListItem>>,
    outage: Mutex<Option<Outage>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_items(items: Vec<ListItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn set_outage(&self, outage: Option<Outage>) {
        *self.outage.lock().unwrap() = outage;
    }

    pub fn items(&self) -> Vec<ListItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.outage.lock().unwrap() {
            None => Ok(()),
            Some(Outage::Down) => Err(StoreError::NotConfigured("memory store is down".to_string())),
            Some(Outage::ServerError) => Err(StoreError::Status {
                url: "memory://movies".to_string(),
                status: 500,
                message: "boom".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<ListItem>, StoreError> {
        self.check()?;
        Ok(self.items())
    }

    async fn create(&self, item: ListItem) -> Result<ListItem, StoreError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        if items.iter().any(|i| i.id == item.id) {
            return Err(StoreError::Conflict(item.id));
        }
        items.insert(0, item.clone());
        Ok(item)
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<ListItem>, StoreError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound(id))?;
        item.apply(patch);
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

pub fn sample_item(id: i64, title: &str, media_type: MediaType) -> ListItem {
    ListItem {
        id: ItemId(id),
        title: title.to_string(),
        overview: None,
        poster: None,
        release_date: None,
        rating: None,
        media_type,
        status: WatchStatus::ToWatch,
        favorite: false,
        personal_rating: None,
        added_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

/// Create input with nothing stamped yet
pub fn new_item(title: &str) -> NewListItem {
    NewListItem {
        id: None,
        title: title.to_string(),
        overview: None,
        poster: None,
        release_date: None,
        rating: None,
        media_type: MediaType::Movie,
        status: None,
        favorite: None,
        personal_rating: None,
        added_at: None,
    }
}
