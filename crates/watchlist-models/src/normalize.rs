//! Translation between the two wire shapes a list entry can travel in.
//!
//! The document backend stores and answers with snake_case keys
//! (`release_date`, `personal_rating`, `added_at`); the app shape, the local
//! blob and the key-value backend use camelCase. Which one a client sees
//! depends on the backend chosen at deploy time, so everything read off the
//! wire goes through [`normalize_item`].

use serde_json::{Map, Value};

use crate::item::ListItem;

/// `(backend key, app key)` pairs. Every other field is spelled the same in both shapes.
pub const BACKEND_FIELD_NAMES: [(&str, &str); 3] = [
    ("release_date", "releaseDate"),
    ("personal_rating", "personalRating"),
    ("added_at", "addedAt"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireShape {
    #[default]
    App,
    Backend,
}

/// Rewrite a backend-shape object into the app shape.
///
/// Idempotent: app-shape input comes back unchanged. When both spellings of a
/// field are present the app spelling wins unless it is `null`. Non-object
/// values pass through untouched.
pub fn normalize_item(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            for (backend, app) in BACKEND_FIELD_NAMES {
                if let Some(backend_value) = map.remove(backend) {
                    let app_is_set = map.get(app).map(|v| !v.is_null()).unwrap_or(false);
                    if !app_is_set {
                        map.insert(app.to_string(), backend_value);
                    }
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Serialize an item in the requested wire shape.
pub fn to_wire(item: &ListItem, shape: WireShape) -> Value {
    let value = match serde_json::to_value(item) {
        Ok(value) => value,
        // ListItem only holds strings, numbers and enums, all of which serialize
        Err(_) => return Value::Null,
    };
    match (shape, value) {
        (WireShape::Backend, Value::Object(map)) => Value::Object(to_backend_keys(map)),
        (_, value) => value,
    }
}

fn to_backend_keys(mut map: Map<String, Value>) -> Map<String, Value> {
    for (backend, app) in BACKEND_FIELD_NAMES {
        if let Some(v) = map.remove(app) {
            map.insert(backend.to_string(), v);
        }
    }
    map
}
