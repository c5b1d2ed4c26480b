//! Reference-or-embedded relations.
//!
//! The API populates relation fields inconsistently: the same `assignedTo` may arrive
//! as `"u1"` from one endpoint and as `{ "_id": "u1", "firstName": ... }` from another.
//! [`Relation`] makes the two shapes explicit so identity and display labels are
//! exhaustive matches.
//!
//! An embedded object keeps its `_id` even when its other fields do not decode as a
//! full entity: it falls back to a stub carrying the id and whatever label fields
//! are readable.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::{Project, Task, User};

/// A relation field holding either a bare identifier or the populated object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Reference(String),
    Embedded(Box<T>),
}

/// An entity that can be the target of a [`Relation`].
pub trait Related {
    /// Label used when the relation field is missing entirely.
    const ABSENT_LABEL: &'static str;

    fn relation_id(&self) -> &str;

    /// Human label from the embedded fields, if they carry one.
    fn relation_label(&self) -> Option<String>;

    /// Label for a bare identifier with nothing else to show.
    fn reference_label(id: &str) -> String;

    /// A minimal entity for an embedded object that does not decode in full.
    fn stub(id: String, fields: &Map<String, Value>) -> Self;
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl Related for User {
    const ABSENT_LABEL: &'static str = "Unassigned";

    fn relation_id(&self) -> &str {
        &self.id
    }

    fn relation_label(&self) -> Option<String> {
        self.full_name()
    }

    fn reference_label(_id: &str) -> String {
        "Unknown".to_string()
    }

    fn stub(id: String, fields: &Map<String, Value>) -> Self {
        User {
            id,
            email: text_field(fields, "email"),
            first_name: text_field(fields, "firstName"),
            last_name: text_field(fields, "lastName"),
            ..Default::default()
        }
    }
}

impl Related for Project {
    const ABSENT_LABEL: &'static str = "Unknown Project";

    fn relation_id(&self) -> &str {
        &self.id
    }

    fn relation_label(&self) -> Option<String> {
        let title = self.title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn reference_label(id: &str) -> String {
        id.to_string()
    }

    fn stub(id: String, fields: &Map<String, Value>) -> Self {
        Project {
            id,
            title: text_field(fields, "title"),
            ..Default::default()
        }
    }
}

impl Related for Task {
    const ABSENT_LABEL: &'static str = "Unknown Task";

    fn relation_id(&self) -> &str {
        &self.id
    }

    fn relation_label(&self) -> Option<String> {
        let title = self.title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn reference_label(id: &str) -> String {
        id.to_string()
    }

    fn stub(id: String, fields: &Map<String, Value>) -> Self {
        Task {
            id,
            title: text_field(fields, "title"),
            ..Default::default()
        }
    }
}

impl<'de, T: Related + DeserializeOwned> Deserialize<'de> for Relation<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(Relation::Reference(id)),
            Value::Object(fields) => {
                let Some(id) = fields.get("_id").and_then(Value::as_str).map(str::to_string) else {
                    return Err(D::Error::custom("embedded relation without a string `_id`"));
                };
                match serde_json::from_value::<T>(Value::Object(fields.clone())) {
                    Ok(target) => Ok(Relation::Embedded(Box::new(target))),
                    Err(e) => {
                        tracing::debug!(id = %id, "Keeping id of partially decodable relation: {e}");
                        Ok(Relation::Embedded(Box::new(T::stub(id, &fields))))
                    }
                }
            }
            other => Err(D::Error::custom(format!("expected an id or an object, got {other}"))),
        }
    }
}

impl<T: Related> Relation<T> {
    /// The identifier, whichever shape carries it.
    pub fn id(&self) -> &str {
        match self {
            Relation::Reference(id) => id,
            Relation::Embedded(target) => target.relation_id(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Relation::Reference(id) => T::reference_label(id),
            Relation::Embedded(target) => target
                .relation_label()
                .unwrap_or_else(|| T::reference_label(target.relation_id())),
        }
    }

    pub fn embedded(&self) -> Option<&T> {
        match self {
            Relation::Reference(_) => None,
            Relation::Embedded(target) => Some(target),
        }
    }
}

impl<T> From<String> for Relation<T> {
    fn from(id: String) -> Self {
        Relation::Reference(id)
    }
}

impl<T> From<&str> for Relation<T> {
    fn from(id: &str) -> Self {
        Relation::Reference(id.to_string())
    }
}

/// Identifier of an optional relation. Absent relations and blank ids are `None`,
/// so they never compare equal to anything.
pub fn extract_id<T: Related>(relation: Option<&Relation<T>>) -> Option<&str> {
    relation.map(Relation::id).filter(|id| !id.is_empty())
}

/// Display label of an optional relation, with the target's placeholder when absent.
pub fn extract_label<T: Related>(relation: Option<&Relation<T>>) -> String {
    extract_label_or(relation, T::ABSENT_LABEL)
}

/// Like [`extract_label`] with a caller-chosen placeholder for the absent case.
pub fn extract_label_or<T: Related>(relation: Option<&Relation<T>>, absent: &str) -> String {
    match relation {
        Some(relation) => relation.label(),
        None => absent.to_string(),
    }
}

/// Identifiers of every relation in a collection, skipping blank ones.
pub fn extract_ids<T: Related>(relations: &[Relation<T>]) -> impl Iterator<Item = &str> {
    relations
        .iter()
        .map(Relation::id)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn embedded_user(id: &str, first: &str, last: &str) -> Relation<User> {
        Relation::Embedded(Box::new(User {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }))
    }

    #[test]
    fn test_id_is_shape_independent() {
        let reference: Relation<User> = "u1".into();
        let embedded = embedded_user("u1", "Ada", "Lovelace");
        assert_eq!(extract_id(Some(&reference)), Some("u1"));
        assert_eq!(extract_id(Some(&reference)), extract_id(Some(&embedded)));
        assert_eq!(extract_id::<User>(None), None);
    }

    #[test]
    fn test_blank_embedded_id_is_none() {
        let embedded = embedded_user("", "Ada", "Lovelace");
        assert_eq!(extract_id(Some(&embedded)), None);
    }

    #[test]
    fn test_user_labels() {
        assert_eq!(extract_label(Some(&embedded_user("u1", "Ada", "Lovelace"))), "Ada Lovelace");
        assert_eq!(extract_label(Some(&Relation::<User>::from("u1"))), "Unknown");
        assert_eq!(extract_label::<User>(None), "Unassigned");
        assert_eq!(extract_label_or::<User>(None, "Unknown"), "Unknown");
    }

    #[test]
    fn test_project_labels() {
        let embedded = Relation::Embedded(Box::new(Project {
            id: "p1".into(),
            title: "Apollo".into(),
            ..Default::default()
        }));
        assert_eq!(extract_label(Some(&embedded)), "Apollo");
        assert_eq!(extract_label(Some(&Relation::<Project>::from("p1"))), "p1");
        assert_eq!(extract_label::<Project>(None), "Unknown Project");
    }

    #[test]
    fn test_object_without_label_fields_does_not_fail() {
        let user = embedded_user("u7", "", "");
        assert_eq!(user.label(), "Unknown");

        let project: Relation<Project> = Relation::Embedded(Box::default());
        assert_eq!(project.label(), "");
        assert_eq!(extract_id(Some(&project)), None);
    }

    #[test]
    fn test_decodes_both_shapes() {
        let reference: Relation<User> = serde_json::from_value(json!("u1")).unwrap();
        assert_eq!(reference, Relation::Reference("u1".into()));

        let embedded: Relation<User> =
            serde_json::from_value(json!({ "_id": "u2", "firstName": "Ada", "lastName": "Lovelace" }))
                .unwrap();
        assert_eq!(embedded.id(), "u2");
        assert_eq!(embedded.label(), "Ada Lovelace");
    }

    #[test]
    fn test_partially_decodable_object_keeps_id() {
        let user: Relation<User> =
            serde_json::from_value(json!({ "_id": "u1", "firstName": "Ada", "isActive": 1 })).unwrap();
        assert_eq!(extract_id(Some(&user)), Some("u1"));
        assert_eq!(user.label(), "Ada");

        let project: Relation<Project> =
            serde_json::from_value(json!({ "_id": "p1", "title": "Apollo", "status": "archived" }))
                .unwrap();
        assert_eq!(extract_id(Some(&project)), Some("p1"));
        assert_eq!(extract_label(Some(&project)), "Apollo");
    }

    #[test]
    fn test_object_without_id_is_rejected() {
        assert!(serde_json::from_value::<Relation<User>>(json!({ "firstName": "Ada" })).is_err());
        assert!(serde_json::from_value::<Relation<User>>(json!(42)).is_err());
    }

    #[test]
    fn test_missing_creator_reads_unknown() {
        let task: Task = serde_json::from_value(json!({ "_id": "t1", "title": "Ship" })).unwrap();
        assert_eq!(extract_label_or(task.created_by.as_ref(), "Unknown"), "Unknown");
        assert_eq!(extract_label(task.assigned_to.as_ref()), "Unassigned");
    }

    #[test]
    fn test_extract_ids_skips_blank() {
        let members = vec![
            Relation::from("u1"),
            embedded_user("u2", "B", "C"),
            embedded_user("", "No", "Id"),
        ];
        assert_eq!(extract_ids(&members).collect::<Vec<_>>(), vec!["u1", "u2"]);
    }
}
