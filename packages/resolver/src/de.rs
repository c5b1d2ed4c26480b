//! Lenient field deserializers for payloads whose shape is not fully trusted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept anything for a list field. Non-arrays become empty and elements that
/// fail to decode are skipped.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Accept anything for an optional field; values that do not decode become `None`.
pub(crate) fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "lenient_vec")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "lenient_option")]
        hours: Option<f64>,
    }

    #[test]
    fn test_null_and_missing_fields_default() {
        let sample: Sample = serde_json::from_value(json!({ "name": null })).unwrap();
        assert_eq!(sample.name, "");
        assert!(sample.tags.is_empty());
        assert!(sample.hours.is_none());
    }

    #[test]
    fn test_non_array_list_is_empty() {
        let sample: Sample = serde_json::from_value(json!({ "tags": "oops" })).unwrap();
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_bad_list_elements_are_skipped() {
        let sample: Sample = serde_json::from_value(json!({ "tags": ["a", 3, "b"] })).unwrap();
        assert_eq!(sample.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_undecodable_option_is_none() {
        let sample: Sample = serde_json::from_value(json!({ "hours": "lots" })).unwrap();
        assert!(sample.hours.is_none());
    }
}
