use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ModelResult, ObjectId};

/// A record as returned by the object store.
///
/// Serializes flat, the way the store returns it: `_id` and `object` next to
/// the record's own fields. The remaining fields are arbitrary JSON and may
/// nest documents, arrays, reference objects, or raw ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Singular type name (e.g., "c_task").
    pub object: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Entity {
    /// Builds an entity from a store record.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// The value of the type's unique key field, if it is a string.
    pub fn key(&self, unique_key: &str) -> Option<&str> {
        self.get(unique_key).and_then(Value::as_str)
    }
}
