use async_trait::async_trait;
use watchlist_models::{ItemId, ItemPatch, ListItem, WireShape};

use crate::error::StoreError;

/// The four verbs every persistence backend offers over the one list resource.
///
/// Implementations: [`crate::RemoteListStore`] (HTTP API),
/// [`crate::LocalListStore`] (one serialized blob), and the server's SQLite
/// document collection.
#[async_trait]
pub trait ListStore: Send + Sync {
    fn store_name(&self) -> &str;

    /// Shape this backend serves items in when exposed over HTTP
    fn wire_shape(&self) -> WireShape {
        WireShape::App
    }

    async fn list(&self) -> Result<Vec<ListItem>, StoreError>;

    /// Persist an already-stamped item and return what was stored
    async fn create(&self, item: ListItem) -> Result<ListItem, StoreError>;

    /// Merge `patch` onto the item. `Ok(None)` means the id was absent and the
    /// store ignores misses.
    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<ListItem>, StoreError>;

    async fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}
