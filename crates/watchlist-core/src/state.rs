use thiserror::Error;
use tracing::{error, info};
use watchlist_models::{ItemId, ItemPatch, ListItem, ListStats, NewListItem, WatchStatus};

use crate::query::ListQuery;
use crate::sync::{SyncError, SyncService};

/// Failure of a list operation, worded for the user
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Could not load your list: {0}")]
    Load(#[source] SyncError),

    #[error("Could not add \"{title}\": {source}")]
    Add {
        title: String,
        #[source]
        source: SyncError,
    },

    #[error("Could not remove the item: {0}")]
    Remove(#[source] SyncError),

    #[error("Could not update the item: {0}")]
    Update(#[source] SyncError),

    #[error("\"{0}\" is already in your list")]
    Duplicate(String),

    #[error("Item {0} is not in your list")]
    NotInList(ItemId),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

/// The in-memory list plus the last error, kept in step with the backend
/// through [`SyncService`].
///
/// Mutators never return errors. A failed operation leaves the list as it
/// was and records the error in [`WatchlistState::last_error`].
pub struct WatchlistState {
    sync: SyncService,
    items: Vec<ListItem>,
    last_error: Option<StateError>,
}

impl WatchlistState {
    pub fn new(sync: SyncService) -> Self {
        Self {
            sync,
            items: Vec::new(),
            last_error: None,
        }
    }

    /// Replace the list with whatever the backend holds now
    pub async fn load(&mut self) {
        self.last_error = None;
        match self.sync.load_all().await {
            Ok(items) => self.items = items,
            Err(e) => self.fail(StateError::Load(e)),
        }
    }

    pub async fn add(&mut self, item: NewListItem) {
        if let Some(id) = item.id {
            if self.get(id).is_some() {
                self.fail(StateError::Duplicate(item.title));
                return;
            }
        }

        let title = item.title.clone();
        match self.sync.create(item).await {
            Ok(created) => {
                info!("Added {} ({})", created.title, created.id);
                self.items.insert(0, created);
            }
            Err(SyncError::Duplicate(_)) => self.fail(StateError::Duplicate(title)),
            Err(source) => self.fail(StateError::Add { title, source }),
        }
    }

    pub async fn remove(&mut self, id: ItemId) {
        match self.sync.delete(id).await {
            Ok(()) => self.items.retain(|item| item.id != id),
            Err(e) => self.fail(StateError::Remove(e)),
        }
    }

    pub async fn set_status(&mut self, id: ItemId, status: WatchStatus) {
        self.update(id, ItemPatch::status(status)).await;
    }

    pub async fn toggle_favorite(&mut self, id: ItemId) {
        match self.get(id).map(|item| !item.favorite) {
            Some(favorite) => self.update(id, ItemPatch::favorite(favorite)).await,
            None => self.fail(StateError::NotInList(id)),
        }
    }

    pub async fn set_rating(&mut self, id: ItemId, rating: u8) {
        if !(1..=5).contains(&rating) {
            self.fail(StateError::InvalidRating(rating));
            return;
        }
        self.update(id, ItemPatch::rating(rating)).await;
    }

    async fn update(&mut self, id: ItemId, patch: ItemPatch) {
        match self.sync.update(id, &patch).await {
            Ok(_) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.apply(&patch);
                }
            }
            Err(e) => self.fail(StateError::Update(e)),
        }
    }

    fn fail(&mut self, err: StateError) {
        error!("{}", err);
        self.last_error = Some(err);
    }

    pub fn get_all(&self) -> &[ListItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_by_status(&self, status: WatchStatus) -> Vec<&ListItem> {
        self.items.iter().filter(|item| item.status == status).collect()
    }

    pub fn get_stats(&self) -> ListStats {
        ListStats::from_items(&self.items)
    }

    pub fn query(&self, query: &ListQuery) -> Vec<ListItem> {
        query.apply(&self.items)
    }

    pub fn last_error(&self) -> Option<&StateError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
