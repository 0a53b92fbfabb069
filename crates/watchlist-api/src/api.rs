//! Handlers for the `/api/movies` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use watchlist_models::{normalize_item, to_wire, ItemId, ItemPatch, NewListItem};
use watchlist_store::StoreError;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: ItemId,
    #[serde(default)]
    pub updates: ItemPatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: ItemId,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /api/movies - Newest first. An unconfigured backend reads as an empty list.
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let Some(store) = state.store.as_ref() else {
        return Ok(Json(Vec::new()));
    };
    let items = match store.list().await {
        Ok(items) => items,
        Err(StoreError::NotConfigured(message)) => {
            debug!("Listing from an unavailable backend: {}", message);
            return Ok(Json(Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };
    let shape = store.wire_shape();
    Ok(Json(items.iter().map(|item| to_wire(item, shape)).collect()))
}

/// POST /api/movies - Stamps whatever the client left out.
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let store = state.store.as_ref().ok_or(ApiError::NotConfigured)?;
    let new_item: NewListItem = serde_json::from_value(normalize_item(body(payload)?))
        .map_err(|e| ApiError::BadRequest(format!("Invalid item: {}", e)))?;

    let item = new_item.stamp(|| state.ids.next_id(), Utc::now());
    let created = store.create(item).await?;
    info!("Created {} ({})", created.title, created.id);
    Ok((StatusCode::CREATED, Json(to_wire(&created, store.wire_shape()))))
}

/// PUT /api/movies - Body `{id, updates}`.
pub async fn update_movie(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.as_ref().ok_or(ApiError::NotConfigured)?;
    let request = body(payload)?;
    let updated = store
        .update(request.id, &request.updates)
        .await?
        .ok_or(ApiError::NotFound)?;
    debug!("Updated {}", updated.id);
    Ok(Json(to_wire(&updated, store.wire_shape())))
}

/// DELETE /api/movies - Body `{id}`.
pub async fn delete_movie(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.as_ref().ok_or(ApiError::NotConfigured)?;
    let request = body(payload)?;
    store.delete(request.id).await?;
    info!("Deleted {}", request.id);
    Ok(Json(json!({ "success": true })))
}

pub async fn health_check() -> &'static str {
    "OK"
}
