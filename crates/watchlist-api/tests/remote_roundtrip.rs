//! Drives the client-side `RemoteListStore` against the real server on both backends.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use watchlist_api::{create_router, AppState, SqliteListStore};
use watchlist_config::MissingItemPolicy;
use watchlist_models::{ItemId, ItemPatch, ListItem, MediaType, WatchStatus};
use watchlist_store::{ListStore, LocalListStore, RemoteListStore, StoreError};

struct TestServer {
    url: String,
    _temp_dir: TempDir,
}

impl TestServer {
    async fn start(store: impl FnOnce(&TempDir) -> Option<Arc<dyn ListStore>>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let app = create_router(AppState::new(store(&temp_dir)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            url: format!("http://{}/api/movies", addr),
            _temp_dir: temp_dir,
        }
    }

    async fn key_value() -> Self {
        Self::start(|dir| {
            let store = LocalListStore::new(dir.path().join("movies.json"))
                .with_missing_items(MissingItemPolicy::NotFound);
            Some(Arc::new(store) as Arc<dyn ListStore>)
        })
        .await
    }

    async fn document() -> Self {
        Self::start(|dir| {
            let url = format!("sqlite:{}", dir.path().join("movies.db").display());
            Some(Arc::new(SqliteListStore::new(url)) as Arc<dyn ListStore>)
        })
        .await
    }

    async fn unconfigured() -> Self {
        Self::start(|_| None).await
    }

    fn client(&self) -> RemoteListStore {
        RemoteListStore::new(self.url.clone())
    }
}

fn item(id: i64, title: &str, added_at: &str) -> ListItem {
    ListItem {
        id: ItemId(id),
        title: title.to_string(),
        overview: Some("overview".to_string()),
        poster: None,
        release_date: Some("1979-05-25".to_string()),
        rating: Some(8.1),
        media_type: MediaType::Movie,
        status: WatchStatus::ToWatch,
        favorite: false,
        personal_rating: None,
        added_at: added_at.to_string(),
    }
}

async fn exercise_crud(server: &TestServer) {
    let store = server.client();

    store.create(item(1, "Alien", "2024-01-01T00:00:00.000Z")).await.unwrap();
    store.create(item(2, "Aliens", "2024-02-01T00:00:00.000Z")).await.unwrap();

    let items = store.list().await.unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i.id.get()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(items[1].release_date.as_deref(), Some("1979-05-25"));

    let updated = store
        .update(ItemId(1), &ItemPatch::favorite(true))
        .await
        .unwrap()
        .unwrap();
    assert!(updated.favorite);
    assert_eq!(updated.added_at, "2024-01-01T00:00:00.000Z");

    store.update(ItemId(1), &ItemPatch::rating(4)).await.unwrap();
    store
        .update(ItemId(1), &ItemPatch::status(WatchStatus::Watched))
        .await
        .unwrap();
    let alien = store.list().await.unwrap().into_iter().find(|i| i.id == ItemId(1)).unwrap();
    assert!(alien.favorite);
    assert!(alien.is_watched());
    assert_eq!(alien.personal_rating, Some(4));

    store.delete(ItemId(2)).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);

    let err = store.update(ItemId(99), &ItemPatch::favorite(true)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ItemId(99))));
    let err = store.delete(ItemId(99)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ItemId(99))));
    assert!(!err.triggers_fallback());

    let err = store.create(item(1, "Alien", "2024-03-01T00:00:00.000Z")).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(ItemId(1))));
}

#[tokio::test]
async fn test_key_value_backend_roundtrip() {
    let server = TestServer::key_value().await;
    exercise_crud(&server).await;
}

#[tokio::test]
async fn test_document_backend_roundtrip() {
    let server = TestServer::document().await;
    exercise_crud(&server).await;
}

#[tokio::test]
async fn test_backends_answer_in_their_own_shape() {
    let http = reqwest::Client::new();

    let document = TestServer::document().await;
    document.client().create(item(1, "Alien", "2024-01-01T00:00:00.000Z")).await.unwrap();
    let raw: Value = http.get(&document.url).send().await.unwrap().json().await.unwrap();
    assert_eq!(raw[0]["added_at"], "2024-01-01T00:00:00.000Z");
    assert!(raw[0].get("addedAt").is_none());

    let key_value = TestServer::key_value().await;
    key_value.client().create(item(1, "Alien", "2024-01-01T00:00:00.000Z")).await.unwrap();
    let raw: Value = http.get(&key_value.url).send().await.unwrap().json().await.unwrap();
    assert_eq!(raw[0]["addedAt"], "2024-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_server_stamps_missing_fields() {
    let server = TestServer::key_value().await;
    let http = reqwest::Client::new();

    let response = http
        .post(&server.url)
        .json(&json!({ "title": "Dark", "type": "tv" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let created: Value = response.json().await.unwrap();
    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["status"], "toWatch");
    assert_eq!(created["favorite"], false);
    assert!(created["addedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_unconfigured_backend_lists_empty_and_refuses_writes() {
    let server = TestServer::unconfigured().await;
    let store = server.client();

    assert!(store.list().await.unwrap().is_empty());

    let err = store.create(item(1, "Alien", "2024-01-01T00:00:00.000Z")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotConfigured(_)));
    assert!(err.triggers_fallback());

    let err = store.delete(ItemId(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotConfigured(_)));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = TestServer::key_value().await;
    let http = reqwest::Client::new();

    let response = http
        .put(&server.url)
        .header("Content-Type", "application/json")
        .body("{\"updates\": {}}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
