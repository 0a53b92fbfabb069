use super::*;
use crate::fixtures::{new_item, sample_item, MemoryStore, Outage};
use std::collections::HashSet;
use tempfile::TempDir;
use watchlist_config::MissingItemPolicy;
use watchlist_models::{MediaType, WatchStatus};

fn service(remote: &Arc<MemoryStore>, local: &Arc<MemoryStore>) -> SyncService {
    SyncService::new(
        Some(Arc::clone(remote) as Arc<dyn ListStore>),
        Arc::clone(local) as Arc<dyn ListStore>,
    )
}

#[tokio::test]
async fn test_load_uses_remote_when_available() {
    let remote = Arc::new(MemoryStore::with_items(vec![sample_item(1, "Alien", MediaType::Movie)]));
    let local = Arc::new(MemoryStore::default());
    let sync = service(&remote, &local);

    let items = sync.load_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(local.calls(), 0);
}

#[tokio::test]
async fn test_unreachable_remote_loads_local_blob() {
    let dir = TempDir::new().unwrap();
    let local_path = dir.path().join("watchlist-movies.json");
    let blob = serde_json::json!([
        { "id": 1, "title": "Alien", "type": "movie", "added_at": "2024-01-03T00:00:00.000Z", "personal_rating": 4 },
        { "id": 2, "title": "Dark", "type": "tv", "addedAt": "2024-01-02T00:00:00.000Z" },
        { "id": 3, "title": "Heat", "type": "movie", "release_date": "1995-12-15", "added_at": "2024-01-01T00:00:00.000Z" }
    ]);
    std::fs::write(&local_path, blob.to_string()).unwrap();

    // nothing listens on port 1
    let remote: Arc<dyn ListStore> = Arc::new(RemoteListStore::new("http://127.0.0.1:1/api/movies"));
    let local: Arc<dyn ListStore> = Arc::new(LocalListStore::new(&local_path));
    let sync = SyncService::new(Some(remote), local);

    let items = sync.load_all().await.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].personal_rating, Some(4));
    assert_eq!(items[0].added_at, "2024-01-03T00:00:00.000Z");
    assert_eq!(items[2].release_date.as_deref(), Some("1995-12-15"));
}

#[tokio::test]
async fn test_create_falls_back_with_same_stamped_item() {
    let remote = Arc::new(MemoryStore::default());
    remote.set_outage(Some(Outage::ServerError));
    let local = Arc::new(MemoryStore::default());
    let sync = service(&remote, &local);

    let created = sync.create(new_item("Alien")).await.unwrap();

    assert_eq!(created.status, WatchStatus::ToWatch);
    assert!(!created.favorite);
    assert!(created.added_at_time().is_some());
    assert_eq!(local.items(), vec![created]);
    assert!(remote.items().is_empty());
}

#[tokio::test]
async fn test_rapid_creates_get_unique_ids() {
    let remote = Arc::new(MemoryStore::default());
    let local = Arc::new(MemoryStore::default());
    let sync = service(&remote, &local);

    let mut ids = HashSet::new();
    for n in 0..50 {
        let created = sync.create(new_item(&format!("Movie {n}"))).await.unwrap();
        assert!(ids.insert(created.id), "duplicate id {}", created.id);
    }
    assert_eq!(remote.items().len(), 50);
}

#[tokio::test]
async fn test_caller_supplied_id_is_kept() {
    let remote = Arc::new(MemoryStore::default());
    let local = Arc::new(MemoryStore::default());
    let sync = service(&remote, &local);

    let mut item = new_item("Alien");
    item.id = Some(ItemId(348));
    let created = sync.create(item).await.unwrap();
    assert_eq!(created.id, ItemId(348));

    let mut again = new_item("Alien");
    again.id = Some(ItemId(348));
    let err = sync.create(again).await.unwrap_err();
    assert!(matches!(err, SyncError::Duplicate(ItemId(348))));
}

#[tokio::test]
async fn test_remote_not_found_does_not_fall_back() {
    let remote = Arc::new(MemoryStore::default());
    let local = Arc::new(MemoryStore::with_items(vec![sample_item(7, "Heat", MediaType::Movie)]));
    let sync = service(&remote, &local);

    let err = sync.update(ItemId(7), &ItemPatch::favorite(true)).await.unwrap_err();
    assert!(err.is_not_found());
    let err = sync.delete(ItemId(7)).await.unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(local.calls(), 0);
    assert!(!local.items()[0].favorite);
}

#[tokio::test]
async fn test_update_and_delete_fall_back_when_remote_down() {
    let remote = Arc::new(MemoryStore::default());
    remote.set_outage(Some(Outage::Down));
    let local = Arc::new(MemoryStore::with_items(vec![
        sample_item(1, "Alien", MediaType::Movie),
        sample_item(2, "Dark", MediaType::Tv),
    ]));
    let sync = service(&remote, &local);

    let updated = sync
        .update(ItemId(1), &ItemPatch::status(WatchStatus::Watched))
        .await
        .unwrap()
        .unwrap();
    assert!(updated.is_watched());

    sync.delete(ItemId(2)).await.unwrap();
    let items = sync.load_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ItemId(1));
}

#[tokio::test]
async fn test_every_call_retries_the_remote() {
    let remote = Arc::new(MemoryStore::default());
    remote.set_outage(Some(Outage::Down));
    let local = Arc::new(MemoryStore::default());
    let sync = service(&remote, &local);

    sync.load_all().await.unwrap();
    remote.set_outage(None);
    sync.create(new_item("Alien")).await.unwrap();

    assert_eq!(remote.calls(), 2);
    assert_eq!(remote.items().len(), 1);
    assert!(local.items().is_empty());
}

#[tokio::test]
async fn test_create_falls_back_when_remote_endpoint_is_missing() {
    let app = axum::Router::new().fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "Not Found") });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = TempDir::new().unwrap();
    let local_path = dir.path().join("watchlist-movies.json");
    let remote: Arc<dyn ListStore> = Arc::new(RemoteListStore::new(format!("http://{}/api/movies", addr)));
    let sync = SyncService::new(Some(remote), Arc::new(LocalListStore::new(&local_path)));

    let created = sync.create(new_item("Alien")).await.unwrap();
    let items = sync.load_all().await.unwrap();
    assert_eq!(items, vec![created]);
}

#[tokio::test]
async fn test_favorite_round_trip_restores_item() {
    let dir = TempDir::new().unwrap();
    let local = Arc::new(LocalListStore::new(dir.path().join("watchlist-movies.json")));
    let remote: Arc<dyn ListStore> = Arc::new(RemoteListStore::new("http://127.0.0.1:1/api/movies"));
    let sync = SyncService::new(Some(remote), local);

    let before = sync.create(new_item("Alien")).await.unwrap();
    let favored = sync.update(before.id, &ItemPatch::favorite(true)).await.unwrap().unwrap();
    assert!(favored.favorite);
    let restored = sync.update(before.id, &ItemPatch::favorite(false)).await.unwrap().unwrap();

    assert_eq!(restored, before);
    assert_eq!(sync.load_all().await.unwrap(), vec![before]);
}

#[tokio::test]
async fn test_local_only_missing_id_disciplines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("watchlist-movies.json");

    let lenient = SyncService::new(None, Arc::new(LocalListStore::new(&path)));
    assert!(!lenient.has_remote());
    assert_eq!(lenient.update(ItemId(9), &ItemPatch::favorite(true)).await.unwrap(), None);
    lenient.delete(ItemId(9)).await.unwrap();

    let strict = SyncService::new(
        None,
        Arc::new(LocalListStore::new(&path).with_missing_items(MissingItemPolicy::NotFound)),
    );
    assert!(strict.update(ItemId(9), &ItemPatch::favorite(true)).await.unwrap_err().is_not_found());
    assert!(strict.delete(ItemId(9)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_local_write_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let sync = SyncService::new(None, Arc::new(LocalListStore::new(blocker.join("movies.json"))));

    let err = sync.create(new_item("Alien")).await.unwrap_err();
    match err {
        SyncError::Store { store, source } => {
            assert_eq!(store, "local");
            assert!(matches!(source, StoreError::Io { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_from_config_without_remote_is_local_only() {
    let dir = TempDir::new().unwrap();
    let paths = PathManager::from_base(dir.path());
    let mut config = Config::default();
    config.remote.url = Some("http://127.0.0.1:8787/api/movies".to_string());
    config.remote.enabled = false;

    assert!(!SyncService::from_config(&config, &paths).has_remote());

    config.remote.enabled = true;
    assert!(SyncService::from_config(&config, &paths).has_remote());
}
