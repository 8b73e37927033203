//! Caller-supplied manifests used to select what to export.

use serde_json::Value;

use crate::error::{ManifestError, ManifestResult};
use crate::manifest::MANIFEST_OBJECT;

/// Object types a manifest request may select.
pub const AVAILABLE_OBJECTS: &[&str] = &[
    "c_study",
    "c_task",
    "c_visit_schedule",
    "ec__document_template",
    "c_group",
    "c_anchor_date_template",
    "c_fault",
    "c_dmweb_report",
    "c_site",
    "c_task_assignment",
    "c_participant_schedule",
    "c_patient_flag",
    "c_looker_integration_record",
    "int__vendor_integration_record",
    "int__model_mapping",
    "int__pipeline",
    "orac__studies",
    "orac__sites",
    "orac__forms",
    "orac__form_questions",
    "orac__events",
];

/// A cleaned export request: per object type, the unique keys to start from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestRequest {
    selections: Vec<(String, Vec<String>)>,
}

impl ManifestRequest {
    /// Parses a request against [`AVAILABLE_OBJECTS`].
    pub fn parse(value: &Value) -> ManifestResult<Self> {
        Self::parse_with(value, AVAILABLE_OBJECTS)
    }

    /// Rejects anything that is not a manifest, then keeps only the keys
    /// naming one of `available`. Each kept key must hold an `includes`
    /// array of strings.
    pub fn parse_with(value: &Value, available: &[&str]) -> ManifestResult<Self> {
        let Some(map) = value.as_object() else {
            return Err(not_a_manifest());
        };
        if map.get("object").and_then(Value::as_str) != Some(MANIFEST_OBJECT) {
            return Err(not_a_manifest());
        }

        let mut selections = Vec::new();
        for (key, entry) in map {
            if !available.contains(&key.as_str()) {
                continue;
            }
            selections.push((key.clone(), parse_includes(key, entry)?));
        }

        Ok(Self { selections })
    }

    /// Selected object types, ordered by type name.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.selections.iter().map(|(t, _)| t.as_str())
    }

    /// Keys selected for `object`; empty if the type is not selected.
    pub fn includes(&self, object: &str) -> &[String] {
        self.selections
            .iter()
            .find(|(t, _)| t == object)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

fn not_a_manifest() -> ManifestError {
    ManifestError::InvalidArgument("The argument is not a valid manifest".into())
}

fn parse_includes(key: &str, entry: &Value) -> ManifestResult<Vec<String>> {
    let includes = entry
        .get("includes")
        .and_then(Value::as_array)
        .ok_or_else(|| ManifestError::InvalidArgument(format!("{key} has no includes array")))?;

    includes
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                ManifestError::InvalidArgument(format!("{key} includes a non-string key: {v}"))
            })
        })
        .collect()
}
