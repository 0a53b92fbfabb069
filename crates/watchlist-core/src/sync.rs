use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use watchlist_config::{Config, PathManager};
use watchlist_models::{IdGenerator, ItemId, ItemPatch, ListItem, NewListItem};
use watchlist_store::{ListStore, LocalListStore, RemoteListStore, StoreError};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("item {0} is already in the list")]
    Duplicate(ItemId),

    #[error("{store} store failed: {source}")]
    Store {
        store: String,
        #[source]
        source: StoreError,
    },
}

impl SyncError {
    fn from_store(store: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SyncError::NotFound(id),
            StoreError::Conflict(id) => SyncError::Duplicate(id),
            source => SyncError::Store {
                store: store.to_string(),
                source,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}

/// Runs every list operation against the remote store first and repeats it
/// on the local store when the remote can't be used.
///
/// There is no retry and no memory of earlier failures: each call tries the
/// remote again. A definitive remote answer (not found, duplicate) is
/// returned as-is and never falls back.
pub struct SyncService {
    remote: Option<Arc<dyn ListStore>>,
    local: Arc<dyn ListStore>,
    ids: IdGenerator,
}

impl SyncService {
    pub fn new(remote: Option<Arc<dyn ListStore>>, local: Arc<dyn ListStore>) -> Self {
        Self {
            remote,
            local,
            ids: IdGenerator::new(),
        }
    }

    /// Remote from `[remote]` (if enabled and set), local blob from `[local]`
    /// or the data directory.
    pub fn from_config(config: &Config, paths: &PathManager) -> Self {
        let remote = config.remote.active_url().map(|url| {
            info!("Persisting to remote list API at {}", url);
            Arc::new(RemoteListStore::new(url)) as Arc<dyn ListStore>
        });
        if remote.is_none() {
            info!("No remote list API configured, using the local store only");
        }

        let local_path = config
            .local
            .file
            .clone()
            .unwrap_or_else(|| paths.local_store_file());
        let local = LocalListStore::new(local_path).with_missing_items(config.local.missing_items);

        Self::new(remote, Arc::new(local))
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn load_all(&self) -> Result<Vec<ListItem>, SyncError> {
        let items = self.run("load", |store| async move { store.list().await }).await?;
        info!("Loaded {} items", items.len());
        Ok(items)
    }

    /// Stamp the item (id, `addedAt`, defaults) and persist it. The same
    /// stamped item goes to the local store if the remote is unavailable.
    pub async fn create(&self, item: NewListItem) -> Result<ListItem, SyncError> {
        let item = item.stamp(|| self.ids.next_id(), Utc::now());
        debug!("Creating item {} ({})", item.id, item.title);
        self.run("create", |store| {
            let item = item.clone();
            async move { store.create(item).await }
        })
        .await
    }

    /// `Ok(None)` when the local store silently misses the id
    pub async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<ListItem>, SyncError> {
        self.run("update", |store| {
            let patch = patch.clone();
            async move { store.update(id, &patch).await }
        })
        .await
    }

    pub async fn delete(&self, id: ItemId) -> Result<(), SyncError> {
        self.run("delete", |store| async move { store.delete(id).await }).await
    }

    async fn run<T, F, Fut>(&self, operation: &str, op: F) -> Result<T, SyncError>
    where
        F: Fn(Arc<dyn ListStore>) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        if let Some(remote) = &self.remote {
            match op(Arc::clone(remote)).await {
                Ok(value) => return Ok(value),
                Err(e) if e.triggers_fallback() => {
                    warn!(
                        "Remote {} failed, falling back to {} store: {}",
                        operation,
                        self.local.store_name(),
                        e
                    );
                }
                Err(e) => return Err(SyncError::from_store(remote.store_name(), e)),
            }
        }

        op(Arc::clone(&self.local))
            .await
            .map_err(|e| SyncError::from_store(self.local.store_name(), e))
    }
}

#[cfg(test)]
mod tests;
