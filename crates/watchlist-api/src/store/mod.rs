pub mod sqlite;

pub use sqlite::SqliteListStore;

use std::sync::Arc;
use tracing::{info, warn};
use watchlist_config::{BackendKind, MissingItemPolicy, PathManager, ServerConfig};
use watchlist_store::{ListStore, LocalListStore};

/// Pick the persistence backend the server exposes. `None` means the
/// document backend was chosen without a database URL.
pub fn build_store(config: &ServerConfig, paths: &PathManager) -> Option<Arc<dyn ListStore>> {
    match config.backend {
        BackendKind::Document => match config.database_url.as_deref() {
            Some(url) => {
                info!("Serving the document backend from {}", url);
                Some(Arc::new(SqliteListStore::new(url)))
            }
            None => {
                warn!("Document backend selected but no database_url is set; writes will be refused");
                None
            }
        },
        BackendKind::KeyValue => {
            let path = config.kv_file.clone().unwrap_or_else(|| paths.server_store_file());
            let store = LocalListStore::new(path).with_missing_items(MissingItemPolicy::NotFound);
            info!("Serving the key-value backend from {}", store.path().display());
            Some(Arc::new(store))
        }
    }
}
