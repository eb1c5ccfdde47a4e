use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::OpaqueJson;

/// Rank assigned to endpoints that never declared one; sorts them last.
pub const DEFAULT_RANK: i64 = 9999;

/// Full documentation for one API endpoint, as edited and published.
///
/// This is the nested wire shape. The store flattens it into one parent row
/// plus a set of child tables and reassembles it on read; absent lists come
/// back empty and absent schema objects come back as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointDoc {
    pub key: String,
    pub name: String,
    pub endpoint_path: String,
    pub status: String,
    pub description: String,
    pub category: String,
    pub purpose: String,
    pub rank: i64,
    /// HTTP verbs in display order. Some hand-written endpoint data carries
    /// a bare string here; it deserializes as a one-element list.
    #[serde(deserialize_with = "string_or_list")]
    pub methods: Vec<String>,
    pub request_schema: OpaqueJson,
    pub response_schema: OpaqueJson,
    pub sample_request: OpaqueJson,
    #[serde(deserialize_with = "object_or_list")]
    pub sample_responses: Vec<OpaqueJson>,
    #[serde(deserialize_with = "object_or_list")]
    pub error_responses: Vec<OpaqueJson>,
    pub curl_example: String,
    pub validation_notes: Vec<String>,
    pub field_table: Vec<FieldRow>,
    pub products: Vec<String>,
    pub important_notes: Vec<String>,
    pub headers: Vec<HeaderRow>,
    pub additional_examples: Vec<AdditionalExample>,
}

impl Default for EndpointDoc {
    fn default() -> Self {
        Self {
            key: String::new(),
            name: String::new(),
            endpoint_path: String::new(),
            status: String::new(),
            description: String::new(),
            category: String::new(),
            purpose: String::new(),
            rank: DEFAULT_RANK,
            methods: Vec::new(),
            request_schema: OpaqueJson::default(),
            response_schema: OpaqueJson::default(),
            sample_request: OpaqueJson::default(),
            sample_responses: Vec::new(),
            error_responses: Vec::new(),
            curl_example: String::new(),
            validation_notes: Vec::new(),
            field_table: Vec::new(),
            products: Vec::new(),
            important_notes: Vec::new(),
            headers: Vec::new(),
            additional_examples: Vec::new(),
        }
    }
}

/// One row of the request/response field reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRow {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderRow {
    pub name: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalExample {
    pub title: String,
    pub data: OpaqueJson,
}

/// Parent-row fields plus products, for listing views that don't need the
/// full child graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    pub key: String,
    pub name: String,
    pub endpoint_path: String,
    pub status: String,
    pub description: String,
    pub category: String,
    pub purpose: String,
    pub rank: i64,
    pub methods: Vec<String>,
    pub products: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a best-effort bulk import.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<ImportFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportFailure {
    pub key: String,
    pub error: String,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

fn object_or_list<'de, D>(deserializer: D) -> Result<Vec<OpaqueJson>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(OpaqueJson).collect(),
        Value::Null => Vec::new(),
        other => vec![OpaqueJson(other)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_take_documented_defaults() {
        let doc: EndpointDoc = serde_json::from_value(json!({
            "key": "create-order",
            "name": "Create Order",
        }))
        .unwrap();

        assert_eq!(doc.rank, DEFAULT_RANK);
        assert!(doc.methods.is_empty());
        assert!(doc.request_schema.is_empty());
        assert_eq!(doc.headers, Vec::new());
        assert_eq!(doc.validation_notes, Vec::<String>::new());
    }

    #[test]
    fn test_bare_string_methods_become_one_element_list() {
        let doc: EndpointDoc = serde_json::from_value(json!({
            "key": "k",
            "methods": "GET",
        }))
        .unwrap();
        assert_eq!(doc.methods, vec!["GET"]);

        let doc: EndpointDoc = serde_json::from_value(json!({
            "key": "k",
            "methods": ["GET", "POST"],
        }))
        .unwrap();
        assert_eq!(doc.methods, vec!["GET", "POST"]);
    }

    #[test]
    fn test_bare_object_sample_responses_become_one_element_list() {
        let doc: EndpointDoc = serde_json::from_value(json!({
            "key": "k",
            "sampleResponses": {"status": "ok"},
        }))
        .unwrap();
        assert_eq!(doc.sample_responses, vec![OpaqueJson(json!({"status": "ok"}))]);

        let doc: EndpointDoc = serde_json::from_value(json!({
            "key": "k",
            "sampleResponses": null,
        }))
        .unwrap();
        assert!(doc.sample_responses.is_empty());
    }

    #[test]
    fn test_field_table_type_column_round_trips() {
        let doc: EndpointDoc = serde_json::from_value(json!({
            "key": "k",
            "fieldTable": [
                {"field": "amount", "type": "number", "required": true, "description": "cents"},
            ],
        }))
        .unwrap();
        assert_eq!(doc.field_table[0].field_type, "number");

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["fieldTable"][0]["type"], "number");
    }
}
