//! # Response envelopes
//!
//! Every API call answers with an envelope:
//!
//! ```json
//! { "success": true, "message": "...", "data": { "projects": [...], "pagination": {...} } }
//! ```
//!
//! The collection endpoints are not consistent about where the list lives, so
//! [`normalize`] resolves it from a fixed set of candidates:
//!
//! | Order | Location |
//! |-------|----------|
//! | 1 | `data.<key>` (e.g. `data.projects`, `data.tasks`) |
//! | 2 | `data.items` |
//! | 3 | top-level `items` |
//! | 4 | `data` itself when it is an array (the `/users` shape) |
//!
//! The first candidate that is present and not `null` wins. If it is not an array the
//! result is empty. An envelope with `success: false` is empty, and an input that is
//! already an array is returned unchanged, so normalizing twice is a no-op.
//!
//! Nothing here fails: malformed input is absorbed and yields an empty list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::null_as_default;

pub const PROJECTS_KEY: &str = "projects";
pub const TASKS_KEY: &str = "tasks";
pub const USERS_KEY: &str = "users";

/// Flatten a collection envelope into its entities.
pub fn normalize(envelope: &Value, key: &str) -> Vec<Value> {
    if let Value::Array(items) = envelope {
        return items.clone();
    }
    if envelope.get("success") == Some(&Value::Bool(false)) {
        return Vec::new();
    }

    let data = envelope.get("data");
    let candidates = [
        data.and_then(|d| d.get(key)),
        data.and_then(|d| d.get("items")),
        envelope.get("items"),
        data.filter(|d| d.is_array()),
    ];

    match candidates.into_iter().flatten().find(|v| !v.is_null()) {
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            tracing::debug!("Envelope `{key}` resolved to a non-array value");
            Vec::new()
        }
        None => {
            tracing::debug!("Envelope has no `{key}` collection");
            Vec::new()
        }
    }
}

/// Normalize and decode a collection, dropping entities that fail to decode.
pub fn decode_collection<T: DeserializeOwned>(envelope: &Value, key: &str) -> Vec<T> {
    normalize(envelope, key)
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!("Dropping `{key}` entry {index}: {e}");
                None
            }
        })
        .collect()
}

/// Decode a single entity nested at `data.<key>` (e.g. `data.task`), falling back
/// to `data` itself.
pub fn decode_entity<T: DeserializeOwned>(envelope: &Value, key: &str) -> Option<T> {
    if envelope.get("success") == Some(&Value::Bool(false)) {
        return None;
    }
    let data = envelope.get("data")?;
    let value = data.get(key).filter(|v| !v.is_null()).unwrap_or(data);
    match serde_json::from_value(value.clone()) {
        Ok(entity) => Some(entity),
        Err(e) => {
            tracing::warn!("Could not decode `{key}`: {e}");
            None
        }
    }
}

/// Paging metadata carried under `data.pagination`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_projects: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<u64>,
    pub limit: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub fn pagination(envelope: &Value) -> Option<Pagination> {
    let value = envelope.get("data")?.get("pagination")?;
    serde_json::from_value(value.clone()).ok()
}

/// The generic `{ success, message, data, errors, error }` envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// The most specific message the server gave, if any.
    pub fn server_message(&self) -> Option<&str> {
        [Some(self.message.as_str()), self.error.as_deref()]
            .into_iter()
            .flatten()
            .chain(self.errors.iter().map(String::as_str))
            .find(|m| !m.trim().is_empty())
    }
}

/// Extract a server-provided message from an arbitrary error body.
pub fn error_message(body: &Value) -> Option<String> {
    let envelope: ApiEnvelope<Value> = serde_json::from_value(body.clone()).ok()?;
    envelope.server_message().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, User};
    use serde_json::json;

    fn ids(values: &[Value]) -> Vec<&str> {
        values.iter().filter_map(|v| v["_id"].as_str()).collect()
    }

    #[test]
    fn test_domain_key_wins() {
        let envelope = json!({
            "success": true,
            "data": { "projects": [{ "_id": "p1" }], "items": [{ "_id": "x" }] },
            "items": [{ "_id": "y" }],
        });
        assert_eq!(ids(&normalize(&envelope, PROJECTS_KEY)), vec!["p1"]);
    }

    #[test]
    fn test_generic_items_under_data() {
        let envelope = json!({ "success": true, "data": { "items": [{ "_id": "t1" }, { "_id": "t2" }] } });
        assert_eq!(ids(&normalize(&envelope, TASKS_KEY)), vec!["t1", "t2"]);
    }

    #[test]
    fn test_top_level_items() {
        let envelope = json!({ "items": [{ "_id": "t1" }] });
        assert_eq!(ids(&normalize(&envelope, TASKS_KEY)), vec!["t1"]);
    }

    #[test]
    fn test_null_candidate_falls_through() {
        let envelope = json!({ "data": { "tasks": null, "items": [{ "_id": "t1" }] } });
        assert_eq!(ids(&normalize(&envelope, TASKS_KEY)), vec!["t1"]);
    }

    #[test]
    fn test_missing_and_malformed_shapes_are_empty() {
        for envelope in [
            json!({}),
            json!({ "success": true }),
            json!({ "data": "oops" }),
            json!({ "data": { "projects": { "_id": "p1" } } }),
            json!({ "data": { "projects": 7 } }),
            json!(null),
            json!("text"),
        ] {
            assert!(normalize(&envelope, PROJECTS_KEY).is_empty(), "{envelope}");
        }
    }

    #[test]
    fn test_unsuccessful_envelope_is_empty() {
        let envelope = json!({ "success": false, "data": { "projects": [{ "_id": "p1" }] } });
        assert!(normalize(&envelope, PROJECTS_KEY).is_empty());
    }

    #[test]
    fn test_data_array_for_users() {
        let envelope = json!({ "success": true, "data": [{ "_id": "u1" }] });
        assert_eq!(ids(&normalize(&envelope, USERS_KEY)), vec!["u1"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let envelope = json!({ "data": { "tasks": [{ "_id": "t1" }, { "_id": "t2" }] } });
        let once = normalize(&envelope, TASKS_KEY);
        let twice = normalize(&Value::Array(once.clone()), TASKS_KEY);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_decode_collection_drops_bad_entries() {
        let envelope = json!({
            "data": { "projects": [
                { "_id": "p1", "status": "planning" },
                { "_id": "p2", "status": "shelved" },
                "p3",
            ] }
        });
        let projects: Vec<Project> = decode_collection(&envelope, PROJECTS_KEY);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "p1");
    }

    #[test]
    fn test_decode_entity() {
        let envelope = json!({ "success": true, "data": { "user": { "_id": "u1", "role": "admin" } } });
        let user: User = decode_entity(&envelope, "user").unwrap();
        assert!(user.is_admin());

        let failed = json!({ "success": false, "data": { "user": { "_id": "u1" } } });
        assert!(decode_entity::<User>(&failed, "user").is_none());
    }

    #[test]
    fn test_pagination() {
        let envelope = json!({
            "data": { "tasks": [], "pagination": { "currentPage": 1, "totalPages": 3, "totalTasks": 25, "limit": 10 } }
        });
        let page = pagination(&envelope).unwrap();
        assert_eq!(page.total_tasks, Some(25));
        assert!(page.has_next());
        assert!(pagination(&json!({ "data": {} })).is_none());
    }

    #[test]
    fn test_error_message_prefers_message_then_error_then_errors() {
        assert_eq!(
            error_message(&json!({ "success": false, "message": "Invalid credentials" })),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(
            error_message(&json!({ "success": false, "message": "", "error": "Forbidden" })),
            Some("Forbidden".to_string())
        );
        assert_eq!(
            error_message(&json!({ "errors": ["Title is required"] })),
            Some("Title is required".to_string())
        );
        assert_eq!(error_message(&json!("oops")), None);
    }
}
