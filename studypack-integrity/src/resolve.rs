//! Reference resolution - extracts the ids an entity references.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use studypack_model::{Node, ObjectId, ReferenceSpec};

/// One referenced id, tagged with the field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceTarget {
    pub id: ObjectId,
    /// Innermost field holding the id (a document's sub-field, not the document).
    pub field_name: String,
    pub required: bool,
}

/// The ids found for one reference spec of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    pub field_name: String,
    pub required: bool,
    pub targets: Vec<ReferenceTarget>,
}

impl ResolvedReference {
    fn empty(spec: &ReferenceSpec) -> Self {
        Self {
            field_name: spec.name.clone(),
            required: spec.required,
            targets: Vec::new(),
        }
    }
}

/// Resolves `specs` against one record's fields.
///
/// Returns exactly one entry per spec, in spec order. An absent field yields
/// an entry with no targets so a missing required field can be told apart
/// from a present one.
pub fn resolve(record: &Map<String, Value>, specs: &[ReferenceSpec]) -> Vec<ResolvedReference> {
    specs.iter().map(|spec| resolve_spec(record, spec)).collect()
}

fn resolve_spec(record: &Map<String, Value>, spec: &ReferenceSpec) -> ResolvedReference {
    let mut resolved = ResolvedReference::empty(spec);
    let Some(value) = record.get(&spec.name) else {
        return resolved;
    };

    resolved.targets = match (spec.is_document(), spec.array) {
        (false, false) => target_of(value, spec).into_iter().collect(),
        (false, true) => elements(value)
            .iter()
            .filter_map(|item| target_of(item, spec))
            .collect(),
        (true, false) => match value.as_object() {
            Some(document) => dedup_by_id(
                resolve(document, &spec.nested)
                    .into_iter()
                    .flat_map(|r| r.targets),
            ),
            None => Vec::new(),
        },
        (true, true) => resolve_document_array(elements(value), spec),
    };

    resolved
}

/// Resolves each document independently, merges same-named results across
/// documents, then flattens with one target per id.
fn resolve_document_array(documents: &[Value], spec: &ReferenceSpec) -> Vec<ReferenceTarget> {
    let mut merged: Vec<ResolvedReference> = Vec::new();

    for document in documents.iter().filter_map(Value::as_object) {
        for found in resolve(document, &spec.nested) {
            if found.targets.is_empty() {
                continue;
            }
            match merged.iter_mut().find(|m| m.field_name == found.field_name) {
                Some(acc) => acc.targets.extend(found.targets),
                None => merged.push(found),
            }
        }
    }

    dedup_by_id(merged.into_iter().flat_map(|r| r.targets))
}

fn target_of(value: &Value, spec: &ReferenceSpec) -> Option<ReferenceTarget> {
    Node::classify(value)
        .referenced_id()
        .map(|id| ReferenceTarget {
            id,
            field_name: spec.name.clone(),
            required: spec.required,
        })
}

fn elements(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn dedup_by_id(targets: impl IntoIterator<Item = ReferenceTarget>) -> Vec<ReferenceTarget> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}
