use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Caller-defined JSON carried through the store as a serialized blob.
///
/// The store never inspects the contents; the only contract is the
/// `to_stored`/`from_stored` pair here. An absent value reads back as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueJson(pub Value);

impl OpaqueJson {
    /// Null and `{}` both count as "nothing to store".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn to_stored(&self) -> Result<String> {
        serde_json::to_string(&self.0).map_err(|e| Error::MalformedPayload(e.to_string()))
    }

    pub fn from_stored(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map(OpaqueJson)
            .map_err(|e| Error::MalformedPayload(e.to_string()))
    }
}

impl Default for OpaqueJson {
    fn default() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for OpaqueJson {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
