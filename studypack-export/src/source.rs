//! Entity source abstraction.
//!
//! The export pipeline never talks to a store directly. It asks an
//! [`EntitySource`] for schemas and records, one query at a time, so any
//! backend (a remote org client, a local snapshot) can feed it.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use studypack_model::{Node, TypeSchema};

use crate::error::{ExportError, ExportResult};

/// Record filter understood by every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Records whose `field` holds one of `values`: as a raw string, as the
    /// `_id` of a reference object, or inside an array of either.
    In { field: String, values: Vec<String> },
}

impl Filter {
    pub fn is_in(field: &str, values: Vec<String>) -> Self {
        Self::In {
            field: field.into(),
            values,
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Self::All => true,
            Self::In { field, values } => record
                .get(field)
                .is_some_and(|v| value_matches(v, values)),
        }
    }
}

fn value_matches(value: &Value, values: &[String]) -> bool {
    match value {
        Value::String(s) => values.contains(s),
        Value::Array(items) => items.iter().any(|item| value_matches(item, values)),
        Value::Object(_) => Node::classify(value)
            .referenced_id()
            .is_some_and(|id| values.iter().any(|v| v == id.as_str())),
        _ => false,
    }
}

/// Source of schemas and records for an export run.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Returns the schema of every object type in the org.
    async fn list_schemas(&self) -> ExportResult<Vec<TypeSchema>>;

    /// Returns the records of a collection matching `filter`, projected to
    /// `_id`, `object`, and `paths`.
    async fn find(&self, plural_name: &str, filter: &Filter, paths: &[String]) -> ExportResult<Vec<Value>>;

    /// Returns the first record of a collection, unprojected.
    async fn first(&self, plural_name: &str) -> ExportResult<Option<Value>>;
}

/// A local org snapshot: every schema and every record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    pub schemas: Vec<TypeSchema>,
    #[serde(default)]
    pub records: Vec<Value>,
}

/// [`EntitySource`] over an in-memory [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    schemas: Vec<TypeSchema>,
    /// Plural name -> records of that type.
    collections: HashMap<String, Vec<Value>>,
}

impl MemorySource {
    /// Builds a source, filing each record under its type's collection.
    /// Records of unknown types are unreachable and dropped.
    pub fn new(snapshot: Snapshot) -> Self {
        let plurals: HashMap<&str, &str> = snapshot
            .schemas
            .iter()
            .map(|s| (s.name.as_str(), s.plural_name.as_str()))
            .collect();

        let mut collections: HashMap<String, Vec<Value>> = HashMap::new();
        for record in snapshot.records {
            let plural = record
                .get("object")
                .and_then(Value::as_str)
                .and_then(|object| plurals.get(object));
            if let Some(plural) = plural {
                collections.entry(plural.to_string()).or_default().push(record);
            }
        }

        Self {
            schemas: snapshot.schemas,
            collections,
        }
    }

    fn collection(&self, plural_name: &str) -> ExportResult<&[Value]> {
        if !self.schemas.iter().any(|s| s.plural_name == plural_name) {
            return Err(ExportError::Source(format!("unknown collection {plural_name}")));
        }
        Ok(self
            .collections
            .get(plural_name)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }
}

#[async_trait]
impl EntitySource for MemorySource {
    async fn list_schemas(&self) -> ExportResult<Vec<TypeSchema>> {
        Ok(self.schemas.clone())
    }

    async fn find(&self, plural_name: &str, filter: &Filter, paths: &[String]) -> ExportResult<Vec<Value>> {
        Ok(self
            .collection(plural_name)?
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| project(record, paths))
            .collect())
    }

    async fn first(&self, plural_name: &str) -> ExportResult<Option<Value>> {
        Ok(self.collection(plural_name)?.first().cloned())
    }
}

/// Keeps `_id`, `object`, and the top-level field of every path.
fn project(record: &Value, paths: &[String]) -> Value {
    let Some(map) = record.as_object() else {
        return record.clone();
    };

    let projected: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| {
            key.as_str() == "_id"
                || key.as_str() == "object"
                || paths
                    .iter()
                    .any(|p| p.split('.').next() == Some(key.as_str()))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(projected)
}
