use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of the `object` key of every manifest.
pub const MANIFEST_OBJECT: &str = "manifest";

/// Root type of a study export.
pub const STUDY_TYPE: &str = "c_study";

/// Study fields whose values are environment specific and resolved at
/// import time instead of being carried by the bundle.
pub const STUDY_DEFER_PATHS: &[&str] = &[
    "c_public_group",
    "c_default_subject_site",
    "c_default_subject_visit_schedule",
    "c_default_subject_group",
    "c_default_participant_schedule",
    "c_menu_config.c_group_id",
];

/// The export manifest document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub object: String,
    #[serde(default)]
    pub dependencies: bool,
    #[serde(default)]
    pub export_owner: bool,
    #[serde(default)]
    pub import_owner: bool,
    /// One entry per included object type, keyed by type name.
    #[serde(flatten)]
    pub types: BTreeMap<String, ManifestEntry>,
}

/// The records of one type included in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer: Option<Vec<String>>,
}

impl Manifest {
    /// An empty manifest with every flag off.
    pub fn new() -> Self {
        Self {
            object: MANIFEST_OBJECT.into(),
            dependencies: false,
            export_owner: false,
            import_owner: false,
            types: BTreeMap::new(),
        }
    }

    pub fn entry(&self, object: &str) -> Option<&ManifestEntry> {
        self.types.get(object)
    }

    /// Included keys of a type; empty if the type is absent.
    pub fn includes(&self, object: &str) -> &[String] {
        self.types
            .get(object)
            .map(|e| e.includes.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_type(&self, object: &str) -> bool {
        self.types.contains_key(object)
    }

    /// Total number of included keys across all types.
    pub fn len(&self) -> usize {
        self.types.values().map(|e| e.includes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_manifest_serializes_header_only() {
        let value = serde_json::to_value(Manifest::new()).unwrap();
        assert_eq!(
            value,
            json!({
                "object": "manifest",
                "dependencies": false,
                "exportOwner": false,
                "importOwner": false
            })
        );
    }

    #[test]
    fn entry_without_defer_omits_the_key() {
        let mut manifest = Manifest::new();
        manifest.types.insert(
            "c_task".into(),
            ManifestEntry {
                includes: vec!["t1".into()],
                defer: None,
            },
        );
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["c_task"], json!({ "includes": ["t1"] }));
    }

    #[test]
    fn includes_of_absent_type_is_empty() {
        assert!(Manifest::new().includes("c_task").is_empty());
        assert!(Manifest::new().is_empty());
    }
}
