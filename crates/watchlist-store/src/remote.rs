use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use watchlist_models::{ItemId, ItemPatch, ListItem};

use crate::error::StoreError;
use crate::traits::ListStore;

/// Client for the remote list API.
///
/// One resource URL, four verbs: `GET` the list, `POST` an item, `PUT
/// {id, updates}` and `DELETE {id}`. Every failure is returned as-is.
#[derive(Clone)]
pub struct RemoteListStore {
    client: Arc<Client>,
    url: String,
}

pub fn create_remote_client() -> Client {
    Client::builder()
        .user_agent(concat!("watchlist/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// What a request is about, which decides how 404 and 409 are read
#[derive(Debug, Clone, Copy)]
enum Target {
    /// The whole list. Any error status is a plain failure.
    List,
    /// A new item. 409 means its id is taken; 404 means the endpoint is wrong.
    New(ItemId),
    /// An item that should already exist. 404 means it doesn't.
    Existing(ItemId),
}

impl RemoteListStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Arc::new(create_remote_client()), url)
    }

    pub fn with_client(client: Arc<Client>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Send a request and decode its JSON body
    async fn send(&self, request: RequestBuilder, target: Target) -> Result<Value, StoreError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            return Err(match (status, target) {
                (StatusCode::NOT_FOUND, Target::Existing(id)) => StoreError::NotFound(id),
                (StatusCode::CONFLICT, Target::New(id) | Target::Existing(id)) => StoreError::Conflict(id),
                (StatusCode::SERVICE_UNAVAILABLE, _) => StoreError::NotConfigured(message),
                _ => StoreError::Status {
                    url: self.url.clone(),
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = response.text().await.map_err(|source| StoreError::Transport {
            url: self.url.clone(),
            source,
        })?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| self.decode_error(e))
    }

    fn decode_error(&self, err: serde_json::Error) -> StoreError {
        StoreError::Decode {
            url: self.url.clone(),
            message: err.to_string(),
        }
    }
}

/// Pull `error` out of a `{"error": "..."}` body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ListStore for RemoteListStore {
    fn store_name(&self) -> &str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<ListItem>, StoreError> {
        debug!(url = %self.url, "GET list");
        let body = self.send(self.client.get(&self.url), Target::List).await?;
        ListItem::list_from_wire(body).map_err(|e| self.decode_error(e))
    }

    async fn create(&self, item: ListItem) -> Result<ListItem, StoreError> {
        debug!(url = %self.url, id = %item.id, "POST item");
        let target = Target::New(item.id);
        let body = self.send(self.client.post(&self.url).json(&item), target).await?;
        ListItem::from_wire(body).map_err(|e| self.decode_error(e))
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<ListItem>, StoreError> {
        debug!(url = %self.url, id = %id, "PUT item");
        let request = self
            .client
            .put(&self.url)
            .json(&json!({ "id": id, "updates": patch }));
        let body = self.send(request, Target::Existing(id)).await?;
        ListItem::from_wire(body)
            .map(Some)
            .map_err(|e| self.decode_error(e))
    }

    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        debug!(url = %self.url, id = %id, "DELETE item");
        let request = self.client.delete(&self.url).json(&json!({ "id": id }));
        self.send(request, Target::Existing(id)).await?;
        Ok(())
    }
}
