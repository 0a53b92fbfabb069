use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use watchlist_config::MissingItemPolicy;
use watchlist_models::{ItemId, ItemPatch, ListItem};

use crate::error::StoreError;
use crate::traits::ListStore;

/// The whole list as one JSON array in a single file.
///
/// Every mutation reads the full blob, changes it and writes it back; there
/// are no partial writes. A missing or unreadable blob reads as an empty
/// list. Write failures are returned to the caller.
pub struct LocalListStore {
    path: PathBuf,
    missing_items: MissingItemPolicy,
    // serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl LocalListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            missing_items: MissingItemPolicy::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_missing_items(mut self, policy: MissingItemPolicy) -> Self {
        self.missing_items = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the blob. Never fails: absent or corrupt data is an empty list.
    pub async fn read_all(&self) -> Vec<ListItem> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Local store miss: {} does not exist", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read local store {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        let parsed = serde_json::from_str::<Value>(&content).and_then(ListItem::list_from_wire);
        match parsed {
            Ok(items) => {
                debug!("Local store loaded {} items from {}", items.len(), self.path.display());
                items
            }
            Err(e) => {
                warn!(
                    "Local store corruption detected in {}: {}. Starting from an empty list.",
                    self.path.display(),
                    e
                );
                self.backup_corrupt_blob().await;
                Vec::new()
            }
        }
    }

    /// Keep a copy of an unparseable blob before the next write replaces it
    async fn backup_corrupt_blob(&self) {
        let backup_path = self.path.with_extension("json.bak");
        match tokio::fs::copy(&self.path, &backup_path).await {
            Ok(_) => info!("Backed up corrupt local store to {}", backup_path.display()),
            Err(e) => warn!("Failed to back up corrupt local store: {}", e),
        }
    }

    /// Replace the blob atomically: write a temp file, then rename over the original
    pub async fn write_all(&self, items: &[ListItem]) -> Result<(), StoreError> {
        let result = self.try_write_all(items).await;
        match &result {
            Ok(()) => debug!("Local store saved {} items to {}", items.len(), self.path.display()),
            Err(e) => warn!("Failed to write local store: {}", e),
        }
        result
    }

    async fn try_write_all(&self, items: &[ListItem]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(items)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn missing(&self, id: ItemId) -> Result<(), StoreError> {
        match self.missing_items {
            MissingItemPolicy::Ignore => {
                debug!("Item {} not in local store, ignoring", id);
                Ok(())
            }
            MissingItemPolicy::NotFound => Err(StoreError::NotFound(id)),
        }
    }
}

#[async_trait]
impl ListStore for LocalListStore {
    fn store_name(&self) -> &str {
        "local"
    }

    async fn list(&self) -> Result<Vec<ListItem>, StoreError> {
        Ok(self.read_all().await)
    }

    async fn create(&self, item: ListItem) -> Result<ListItem, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_all().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::Conflict(item.id));
        }
        // newest first
        items.insert(0, item.clone());
        self.write_all(&items).await?;
        Ok(item)
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<ListItem>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_all().await;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            self.missing(id)?;
            return Ok(None);
        };
        item.apply(patch);
        let updated = item.clone();
        self.write_all(&items).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_all().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return self.missing(id);
        }
        self.write_all(&items).await
    }
}
